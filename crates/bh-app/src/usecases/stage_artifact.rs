use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use bh_core::ports::{BundleError, BundleStoragePort, PackageArchivePort};
use bh_core::{BundleRef, PackageIdentity, StageError};

/// Scratch file deleted when dropped.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "scratch file removed"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(
                path = %self.path.display(),
                error = %err,
                "failed to remove scratch file"
            ),
        }
    }
}

/// A staged copy of the bundled artifact plus the identity read from it.
///
/// Owns the scratch file; dropping the value deletes it.
#[derive(Debug)]
pub struct StagedArtifact {
    file: ScratchFile,
    size_bytes: u64,
    identity: PackageIdentity,
}

impl StagedArtifact {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn identity(&self) -> &PackageIdentity {
        &self.identity
    }
}

/// Use case copying the bundled artifact into scratch space and reading its identity.
pub struct StageArtifact {
    storage: Arc<dyn BundleStoragePort>,
    archive: Arc<dyn PackageArchivePort>,
    scratch_dir: PathBuf,
}

impl StageArtifact {
    pub fn new(
        storage: Arc<dyn BundleStoragePort>,
        archive: Arc<dyn PackageArchivePort>,
        scratch_dir: PathBuf,
    ) -> Self {
        Self {
            storage,
            archive,
            scratch_dir,
        }
    }

    pub async fn execute(&self, bundle: &BundleRef) -> Result<StagedArtifact, StageError> {
        let span = info_span!("usecase.stage_artifact.execute", bundle = %bundle);
        async {
            let mut reader = self.storage.open(bundle).await.map_err(|err| match err {
                BundleError::NotFound(name) => StageError::NotFound(name),
                BundleError::Io(source) => StageError::Io {
                    path: PathBuf::from(bundle.as_str()),
                    source,
                },
            })?;

            tokio::fs::create_dir_all(&self.scratch_dir)
                .await
                .map_err(|source| StageError::Io {
                    path: self.scratch_dir.clone(),
                    source,
                })?;

            let path = self.scratch_path(bundle);
            let scratch = ScratchFile::new(path.clone());
            let io_err = |source| StageError::Io {
                path: path.clone(),
                source,
            };

            let mut file = tokio::fs::File::create(&path).await.map_err(io_err)?;
            let size_bytes = tokio::io::copy(&mut reader, &mut file)
                .await
                .map_err(io_err)?;
            file.flush().await.map_err(io_err)?;
            drop(file);

            if size_bytes == 0 {
                return Err(StageError::EmptyArtifact(bundle.to_string()));
            }

            let identity = self
                .archive
                .read_identity(&path)
                .await
                .map_err(|err| StageError::ManifestUnreadable(err.to_string()))?;

            info!(
                size_bytes,
                package_id = %identity.package_id,
                entry_component = ?identity.entry_component,
                "artifact staged"
            );

            Ok(StagedArtifact {
                file: scratch,
                size_bytes,
                identity,
            })
        }
        .instrument(span)
        .await
    }

    /// Stage, read the identity, and discard the scratch copy.
    pub async fn peek_identity(&self, bundle: &BundleRef) -> Result<PackageIdentity, StageError> {
        let staged = self.execute(bundle).await?;
        Ok(staged.identity.clone())
    }

    fn scratch_path(&self, bundle: &BundleRef) -> PathBuf {
        let file_name = bundle
            .as_str()
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("artifact");
        self.scratch_dir
            .join(format!("{}-{}", Uuid::new_v4().simple(), file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bh_core::ports::{BundleReader, ManifestError};
    use std::collections::HashMap;
    use std::io::Cursor;

    struct MapStorage {
        entries: HashMap<String, Vec<u8>>,
    }

    #[async_trait::async_trait]
    impl BundleStoragePort for MapStorage {
        async fn open(&self, entry: &BundleRef) -> Result<BundleReader, BundleError> {
            self.entries
                .get(entry.as_str())
                .map(|bytes| Box::new(Cursor::new(bytes.clone())) as BundleReader)
                .ok_or_else(|| BundleError::NotFound(entry.to_string()))
        }
    }

    /// Reads `package|entry` text as the manifest.
    struct TextArchive;

    #[async_trait::async_trait]
    impl PackageArchivePort for TextArchive {
        async fn read_identity(&self, archive: &Path) -> Result<PackageIdentity, ManifestError> {
            let raw = tokio::fs::read_to_string(archive).await?;
            let (package, entry) = raw
                .split_once('|')
                .ok_or_else(|| ManifestError::Malformed(raw.clone()))?;
            Ok(PackageIdentity::new(
                package,
                Some(entry.to_string()).filter(|e| !e.is_empty()),
            ))
        }
    }

    fn stager(dir: &Path, entries: &[(&str, &[u8])]) -> StageArtifact {
        let storage = MapStorage {
            entries: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_vec()))
                .collect(),
        };
        StageArtifact::new(Arc::new(storage), Arc::new(TextArchive), dir.to_path_buf())
    }

    fn scratch_entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn stage_copies_bytes_and_reads_identity() {
        let dir = tempfile::tempdir().unwrap();
        let stager = stager(dir.path(), &[("plugin.apk", b"com.sample.app|.Main")]);

        let staged = stager.execute(&BundleRef::from("plugin.apk")).await.unwrap();

        assert_eq!(staged.size_bytes(), 20);
        assert_eq!(staged.identity().package_id, "com.sample.app");
        assert_eq!(
            staged.identity().entry_component.as_deref(),
            Some("com.sample.app.Main")
        );
        assert!(staged.path().exists());
        assert!(staged.path().starts_with(dir.path()));
    }

    #[tokio::test]
    async fn dropping_staged_artifact_removes_scratch_file() {
        let dir = tempfile::tempdir().unwrap();
        let stager = stager(dir.path(), &[("plugin.apk", b"com.sample.app|")]);

        let staged = stager.execute(&BundleRef::from("plugin.apk")).await.unwrap();
        let path = staged.path().to_path_buf();
        drop(staged);

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let stager = stager(dir.path(), &[]);

        let err = stager
            .execute(&BundleRef::from("plugin.apk"))
            .await
            .unwrap_err();

        assert!(matches!(err, StageError::NotFound(name) if name == "plugin.apk"));
        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn empty_artifact_is_rejected_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let stager = stager(dir.path(), &[("plugin.apk", b"")]);

        let err = stager
            .execute(&BundleRef::from("plugin.apk"))
            .await
            .unwrap_err();

        assert!(matches!(err, StageError::EmptyArtifact(_)));
        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn unreadable_manifest_is_reported_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let stager = stager(dir.path(), &[("plugin.apk", b"garbage")]);

        let err = stager
            .execute(&BundleRef::from("plugin.apk"))
            .await
            .unwrap_err();

        assert!(matches!(err, StageError::ManifestUnreadable(_)));
        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn peek_identity_leaves_no_scratch_file() {
        let dir = tempfile::tempdir().unwrap();
        let stager = stager(dir.path(), &[("plugin.apk", b"com.sample.app|Main")]);

        let identity = stager
            .peek_identity(&BundleRef::from("plugin.apk"))
            .await
            .unwrap();

        assert_eq!(identity.entry_component.as_deref(), Some("com.sample.app.Main"));
        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn staging_twice_yields_identical_identities() {
        let dir = tempfile::tempdir().unwrap();
        let stager = stager(dir.path(), &[("plugin.apk", b"com.sample.app|.Main")]);
        let bundle = BundleRef::from("plugin.apk");

        let first = stager.execute(&bundle).await.unwrap();
        let second = stager.execute(&bundle).await.unwrap();

        assert_eq!(first.identity(), second.identity());
        assert_ne!(first.path(), second.path());
    }
}
