//! Package identity domain.
//!
//! 包身份领域模型。

mod bundle;
mod identity;

pub use bundle::BundleRef;
pub use identity::{ComponentRef, PackageIdentity};
