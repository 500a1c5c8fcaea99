use crate::package::PackageIdentity;
use crate::ports::errors::IdentityCacheError;

/// Persisted identity of the last staged artifact.
#[async_trait::async_trait]
pub trait IdentityCachePort: Send + Sync {
    async fn load(&self) -> Result<Option<PackageIdentity>, IdentityCacheError>;

    /// Store the identity. Must be idempotent (overwrite if exists).
    async fn store(&self, identity: &PackageIdentity) -> Result<(), IdentityCacheError>;

    /// Forget the cached identity. Clearing an empty cache succeeds.
    async fn clear(&self) -> Result<(), IdentityCacheError>;
}
