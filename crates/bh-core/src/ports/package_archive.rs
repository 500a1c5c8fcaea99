use std::path::Path;

use crate::package::PackageIdentity;
use crate::ports::errors::ManifestError;

#[async_trait::async_trait]
pub trait PackageArchivePort: Send + Sync {
    /// Read package id and first entry component from the archive manifest.
    async fn read_identity(&self, archive: &Path) -> Result<PackageIdentity, ManifestError>;
}
