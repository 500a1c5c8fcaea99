use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use bh_core::ports::{BundleError, BundleReader, BundleStoragePort};
use bh_core::BundleRef;

/// Bundle entries served from a read-only directory.
pub struct DirectoryBundleStorage {
    root: PathBuf,
}

impl DirectoryBundleStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entry names are relative and may not climb out of the root.
    fn resolve(&self, entry: &BundleRef) -> Option<PathBuf> {
        let relative = Path::new(entry.as_str());
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        (contained && !entry.as_str().is_empty()).then(|| self.root.join(relative))
    }
}

#[async_trait]
impl BundleStoragePort for DirectoryBundleStorage {
    async fn open(&self, entry: &BundleRef) -> Result<BundleReader, BundleError> {
        let path = self
            .resolve(entry)
            .ok_or_else(|| BundleError::NotFound(entry.to_string()))?;
        debug!(path = %path.display(), "opening bundle entry");

        match tokio::fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(BundleError::NotFound(entry.to_string()))
            }
            Err(err) => Err(BundleError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn open_reads_entry_bytes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("plugin.apk"), b"payload").unwrap();
        let storage = DirectoryBundleStorage::new(dir.path().to_path_buf());

        let mut reader = storage.open(&BundleRef::from("plugin.apk")).await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();

        assert_eq!(buf, b"payload");
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryBundleStorage::new(dir.path().to_path_buf());

        let err = storage
            .open(&BundleRef::from("plugin.apk"))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, BundleError::NotFound(name) if name == "plugin.apk"));
    }

    #[tokio::test]
    async fn escaping_entry_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryBundleStorage::new(dir.path().join("bundle"));

        for name in ["../secret", "/etc/passwd", ""] {
            let err = storage.open(&BundleRef::from(name)).await.err().unwrap();
            assert!(matches!(err, BundleError::NotFound(_)), "{name}");
        }
    }
}
