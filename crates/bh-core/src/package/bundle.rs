use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Logical name of an entry in read-only bundle storage.
///
/// The name is fixed at build time (e.g. `plugin.apk`) and resolved by a
/// `BundleStoragePort` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleRef(String);

impl BundleRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BundleRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BundleRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
