//! Install session lifecycle.
//!
//! ```text
//! Created ──► Writing ──► Committed ──► Succeeded
//!    │           │            ├───────► Failed
//!    └───────────┴────────────┴───────► Abandoned
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::ids::SessionId;

/// Session lifecycle state.
///
/// 安装会话生命周期状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Granted by the installation service, nothing written yet.
    Created,
    /// Artifact bytes are being streamed into the session.
    Writing,
    /// Committed; waiting for the out-of-band completion event.
    Committed,
    Succeeded,
    Failed,
    Abandoned,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Succeeded | SessionState::Failed | SessionState::Abandoned
        )
    }

    /// Whether a session in this state blocks a new install request.
    pub fn is_in_flight(&self) -> bool {
        !self.is_terminal()
    }

    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Created, Writing)
                | (Writing, Committed)
                | (Committed, Succeeded)
                | (Committed, Failed)
                | (Created, Abandoned)
                | (Writing, Abandoned)
                | (Committed, Abandoned)
        )
    }
}

/// Terminal states a committed session can be resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Succeeded,
    Failed,
    Abandoned,
}

impl From<TerminalState> for SessionState {
    fn from(value: TerminalState) -> Self {
        match value {
            TerminalState::Succeeded => SessionState::Succeeded,
            TerminalState::Failed => SessionState::Failed,
            TerminalState::Abandoned => SessionState::Abandoned,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal session transition {from:?} -> {to:?} for session {session_id}")]
pub struct SessionTransitionError {
    pub session_id: SessionId,
    pub from: SessionState,
    pub to: SessionState,
}

/// One staged install session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSession {
    session_id: SessionId,
    state: SessionState,
    artifact_path: PathBuf,
}

impl InstallSession {
    /// A freshly created session owning the staged artifact path.
    pub fn created(session_id: SessionId, artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            session_id,
            state: SessionState::Created,
            artifact_path: artifact_path.into(),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn begin_writing(&mut self) -> Result<(), SessionTransitionError> {
        self.transition(SessionState::Writing)
    }

    pub fn mark_committed(&mut self) -> Result<(), SessionTransitionError> {
        self.transition(SessionState::Committed)
    }

    pub fn abandon(&mut self) -> Result<(), SessionTransitionError> {
        self.transition(SessionState::Abandoned)
    }

    pub fn resolve(&mut self, terminal: TerminalState) -> Result<(), SessionTransitionError> {
        self.transition(terminal.into())
    }

    fn transition(&mut self, next: SessionState) -> Result<(), SessionTransitionError> {
        if !self.state.can_transition_to(next) {
            return Err(SessionTransitionError {
                session_id: self.session_id,
                from: self.state,
                to: next,
            });
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            session_id = %self.session_id,
            from = ?self.state,
            to = ?next,
            "install session transition"
        );
        self.state = next;
        Ok(())
    }
}
