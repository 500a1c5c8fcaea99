use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data directory unavailable")]
    DataLocalDirUnavailable,

    #[error("system cache directory unavailable")]
    CacheDirUnavailable,
}

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("bundle entry not found: {0}")]
    NotFound(String),

    #[error("bundle io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("archive io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a package archive: {0}")]
    NotAnArchive(String),

    #[error("archive has no AndroidManifest.xml")]
    MissingManifest,

    #[error("malformed binary manifest: {0}")]
    Malformed(String),

    #[error("manifest declares no package id")]
    MissingPackage,
}

#[derive(Debug, Error)]
pub enum InstallerServiceError {
    /// The service answered but refused the request.
    #[error("installer rejected request: {0}")]
    Rejected(String),

    #[error("installer transport failed: {0}")]
    Transport(#[from] CommandError),

    #[error("unexpected installer response: {0}")]
    UnexpectedResponse(String),
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("component not found: {0}")]
    NotFound(String),

    #[error("platform refused launch: {0}")]
    Refused(String),

    #[error("launch transport failed: {0}")]
    Transport(#[from] CommandError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` timed out after {after:?}")]
    TimedOut { program: String, after: Duration },

    #[error("io error while running `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum IdentityCacheError {
    #[error("identity cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("identity cache corrupt: {0}")]
    Corrupt(String),
}
