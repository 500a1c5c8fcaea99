use tokio::io::AsyncRead;

use crate::package::BundleRef;
use crate::ports::errors::BundleError;

pub type BundleReader = Box<dyn AsyncRead + Send + Unpin>;

/// Read-only byte source shipped inside the host bundle.
#[async_trait::async_trait]
pub trait BundleStoragePort: Send + Sync {
    /// Open a bundle entry. Absent entries yield [`BundleError::NotFound`].
    async fn open(&self, entry: &BundleRef) -> Result<BundleReader, BundleError>;
}
