//! Package identity from APK archives.

mod axml;
#[cfg(test)]
pub(crate) mod fixture;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use bh_core::ports::{ManifestError, PackageArchivePort};
use bh_core::PackageIdentity;

pub use axml::{decode_manifest, ManifestFacts};

const MANIFEST_ENTRY: &str = "AndroidManifest.xml";

/// Reads the binary manifest of an APK.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApkManifestReader;

impl ApkManifestReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_identity_blocking(archive: &Path) -> Result<PackageIdentity, ManifestError> {
        let file = File::open(archive)?;
        let mut zip =
            ZipArchive::new(file).map_err(|err| ManifestError::NotAnArchive(err.to_string()))?;
        let mut entry = zip.by_name(MANIFEST_ENTRY).map_err(|err| match err {
            ZipError::FileNotFound => ManifestError::MissingManifest,
            other => ManifestError::NotAnArchive(other.to_string()),
        })?;

        let mut bytes = Vec::with_capacity(entry.size().min(1 << 20) as usize);
        entry.read_to_end(&mut bytes)?;

        let facts = decode_manifest(&bytes)?;
        let package = facts
            .package
            .filter(|p| !p.trim().is_empty())
            .ok_or(ManifestError::MissingPackage)?;
        debug!(%package, first_activity = ?facts.first_activity, "manifest decoded");
        Ok(PackageIdentity::new(package.trim(), facts.first_activity))
    }
}

#[async_trait]
impl PackageArchivePort for ApkManifestReader {
    async fn read_identity(&self, archive: &Path) -> Result<PackageIdentity, ManifestError> {
        let archive: PathBuf = archive.to_path_buf();
        tokio::task::spawn_blocking(move || Self::read_identity_blocking(&archive))
            .await
            .map_err(|err| ManifestError::Io(std::io::Error::other(err)))?
    }
}

#[cfg(test)]
mod tests {
    use super::fixture::{apk_bytes, manifest_bytes};
    use super::*;

    fn write_apk(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[tokio::test]
    async fn reads_identity_and_qualifies_entry() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest_bytes("com.sample.app", &[".Main"], false);
        let path = write_apk(
            &dir,
            "plugin.apk",
            &apk_bytes(&[("classes.dex", b"dex"), ("AndroidManifest.xml", &manifest)]),
        );

        let identity = ApkManifestReader::new().read_identity(&path).await.unwrap();

        assert_eq!(identity.package_id, "com.sample.app");
        assert_eq!(
            identity.entry_component.as_deref(),
            Some("com.sample.app.Main")
        );
    }

    #[tokio::test]
    async fn same_archive_yields_identical_identity() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest_bytes("com.sample.app", &["Main"], true);
        let path = write_apk(&dir, "plugin.apk", &apk_bytes(&[("AndroidManifest.xml", &manifest)]));
        let reader = ApkManifestReader::new();

        let first = reader.read_identity(&path).await.unwrap();
        let second = reader.read_identity(&path).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_manifest_entry_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_apk(&dir, "plugin.apk", &apk_bytes(&[("classes.dex", b"dex")]));

        let err = ApkManifestReader::new()
            .read_identity(&path)
            .await
            .unwrap_err();

        assert!(matches!(err, ManifestError::MissingManifest));
    }

    #[tokio::test]
    async fn non_zip_is_not_an_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_apk(&dir, "plugin.apk", b"definitely not a zip");

        let err = ApkManifestReader::new()
            .read_identity(&path)
            .await
            .unwrap_err();

        assert!(matches!(err, ManifestError::NotAnArchive(_)));
    }

    #[tokio::test]
    async fn empty_package_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest_bytes("", &[".Main"], false);
        let path = write_apk(&dir, "plugin.apk", &apk_bytes(&[("AndroidManifest.xml", &manifest)]));

        let err = ApkManifestReader::new()
            .read_identity(&path)
            .await
            .unwrap_err();

        assert!(matches!(err, ManifestError::MissingPackage));
    }
}
