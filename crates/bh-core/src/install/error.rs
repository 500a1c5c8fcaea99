use std::path::PathBuf;

use thiserror::Error;

use crate::ids::SessionId;
use crate::install::session::SessionTransitionError;

/// Errors raised while staging the bundled artifact.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("bundle entry not found: {0}")]
    NotFound(String),

    #[error("io error while staging {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("staged artifact is empty: {0}")]
    EmptyArtifact(String),

    #[error("package manifest unreadable: {0}")]
    ManifestUnreadable(String),
}

/// Errors raised while driving an install session up to commit.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("an install session is already in progress")]
    AlreadyInProgress,

    #[error("failed to create install session: {0}")]
    SessionCreateFailed(String),

    #[error("failed to write session {session_id}: {message}")]
    WriteFailed {
        session_id: SessionId,
        message: String,
    },

    #[error("failed to commit session {session_id}: {message}")]
    CommitFailed {
        session_id: SessionId,
        message: String,
    },

    #[error(transparent)]
    Lifecycle(#[from] SessionTransitionError),
}
