//! Install session manager.
//!
//! Drives one staged install session from creation to commit and keeps the
//! single session slot. Completion is resolved later through [`finish`].
//!
//! [`finish`]: InstallSessionManager::finish

use std::sync::Arc;

use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, info_span, warn, Instrument};

use bh_core::install::TerminalState;
use bh_core::ports::InstallerServicePort;
use bh_core::{CompletionOutcome, InstallError, InstallSession, SessionId, SessionParams};

use crate::usecases::completion_listener::CompletionListener;
use crate::usecases::stage_artifact::StagedArtifact;

/// A committed session and the channel its outcome arrives on.
#[derive(Debug)]
pub struct SessionHandle {
    pub session_id: SessionId,
    pub completion: oneshot::Receiver<CompletionOutcome>,
}

#[derive(Debug)]
enum SessionSlot {
    Vacant,
    /// Claimed by a caller that has not been granted a session yet.
    Reserved,
    Active(InstallSession),
}

pub struct InstallSessionManager {
    installer: Arc<dyn InstallerServicePort>,
    listener: Arc<CompletionListener>,
    slot: Mutex<SessionSlot>,
}

impl InstallSessionManager {
    pub fn new(installer: Arc<dyn InstallerServicePort>, listener: Arc<CompletionListener>) -> Self {
        Self {
            installer,
            listener,
            slot: Mutex::new(SessionSlot::Vacant),
        }
    }

    /// The session currently held in the slot, if any.
    pub async fn current_session(&self) -> Option<InstallSession> {
        match &*self.slot.lock().await {
            SessionSlot::Active(session) => Some(session.clone()),
            _ => None,
        }
    }

    /// Create, write and commit a session for the staged artifact.
    ///
    /// Returns as soon as the commit is accepted.
    pub async fn run_install(&self, staged: &StagedArtifact) -> Result<SessionHandle, InstallError> {
        self.reserve().await?;

        let span = info_span!(
            "usecase.install_session.run_install",
            package_id = %staged.identity().package_id,
            size_bytes = staged.size_bytes()
        );
        let result = self.drive(staged).instrument(span).await;
        if result.is_err() {
            *self.slot.lock().await = SessionSlot::Vacant;
        }
        result
    }

    /// Resolve the committed session and free the slot. Unknown ids are ignored.
    pub async fn finish(&self, session_id: SessionId, terminal: TerminalState) -> bool {
        let mut slot = self.slot.lock().await;
        match &mut *slot {
            SessionSlot::Active(session) if session.session_id() == session_id => {
                if let Err(err) = session.resolve(terminal) {
                    warn!(%session_id, error = %err, "session already resolved");
                }
                info!(%session_id, state = ?session.state(), "install session finished");
                *slot = SessionSlot::Vacant;
                true
            }
            _ => {
                debug!(%session_id, "finish for unknown session ignored");
                false
            }
        }
    }

    /// Abandon the session with the service (best effort) and free the slot.
    pub async fn abandon(&self, session_id: SessionId) -> bool {
        self.listener.disarm(session_id).await;
        if let Err(err) = self.installer.abandon(session_id).await {
            warn!(%session_id, error = %err, "installer refused to abandon session");
        }
        self.finish(session_id, TerminalState::Abandoned).await
    }

    async fn reserve(&self) -> Result<(), InstallError> {
        let mut slot = self.slot.lock().await;
        match &*slot {
            SessionSlot::Vacant => {}
            SessionSlot::Active(session) if session.state().is_terminal() => {}
            SessionSlot::Reserved => return Err(InstallError::AlreadyInProgress),
            SessionSlot::Active(session) => {
                debug!(
                    session_id = %session.session_id(),
                    state = ?session.state(),
                    "install rejected, session in flight"
                );
                return Err(InstallError::AlreadyInProgress);
            }
        }
        *slot = SessionSlot::Reserved;
        Ok(())
    }

    async fn store(&self, session: &InstallSession) {
        *self.slot.lock().await = SessionSlot::Active(session.clone());
    }

    async fn drive(&self, staged: &StagedArtifact) -> Result<SessionHandle, InstallError> {
        let params = SessionParams::user_initiated(Some(staged.size_bytes()));
        let session_id = self
            .installer
            .create_session(&params)
            .await
            .map_err(|err| InstallError::SessionCreateFailed(err.to_string()))?;
        info!(%session_id, "install session created");

        let mut session = InstallSession::created(session_id, staged.path());
        self.store(&session).await;

        session.begin_writing()?;
        self.store(&session).await;
        if let Err(err) = self
            .installer
            .write_session(session_id, staged.path(), staged.size_bytes())
            .await
        {
            self.abandon_with_service(&mut session).await;
            return Err(InstallError::WriteFailed {
                session_id,
                message: err.to_string(),
            });
        }
        debug!(%session_id, "artifact written to session");

        let completion = self.listener.arm(session_id).await;
        session.mark_committed()?;
        self.store(&session).await;
        if let Err(err) = self
            .installer
            .commit(session_id, self.listener.completion_action())
            .await
        {
            self.listener.disarm(session_id).await;
            self.abandon_with_service(&mut session).await;
            return Err(InstallError::CommitFailed {
                session_id,
                message: err.to_string(),
            });
        }
        info!(%session_id, "install session committed");

        Ok(SessionHandle {
            session_id,
            completion,
        })
    }

    async fn abandon_with_service(&self, session: &mut InstallSession) {
        let session_id = session.session_id();
        if let Err(err) = self.installer.abandon(session_id).await {
            warn!(%session_id, error = %err, "installer refused to abandon session");
        }
        if let Err(err) = session.abandon() {
            warn!(%session_id, error = %err, "session could not be abandoned");
        }
    }
}
