//! Filesystem adapters for bundle-handoff.
//!
//! - `fs`: read-only bundle storage rooted at a directory
//! - `apk`: package identity from an APK's binary `AndroidManifest.xml`
//! - `cache`: JSON identity cache

pub mod apk;
pub mod cache;
pub mod fs;

pub use apk::ApkManifestReader;
pub use cache::JsonIdentityCache;
pub use fs::DirectoryBundleStorage;
