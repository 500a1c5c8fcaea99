//! # bh-platform
//!
//! Platform-specific implementations for bundle-handoff.
//!
//! This crate holds the adapters that talk to the operating system: the
//! subprocess runner, the `pm`/`am` shell transports, the foreground surface
//! channel and the process runtime.

pub mod adapters;
pub mod app_dirs;
pub mod shell;

pub use app_dirs::DirsAppDirsAdapter;
pub use shell::TokioCommandRunner;
