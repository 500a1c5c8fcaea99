use std::path::Path;

use crate::ids::SessionId;
use crate::install::SessionParams;
use crate::ports::errors::InstallerServiceError;

/// The platform's privileged installation service.
///
/// Completion is reported out of band: adapters are constructed with an
/// `mpsc::Sender<CompletionEvent>` and push one or more events per committed
/// session, tagged with the correlation action given to [`commit`].
///
/// [`commit`]: InstallerServicePort::commit
#[async_trait::async_trait]
pub trait InstallerServicePort: Send + Sync {
    /// Open a new session. Hints the platform cannot honour are dropped.
    async fn create_session(&self, params: &SessionParams)
        -> Result<SessionId, InstallerServiceError>;

    /// Stream the whole artifact into the session.
    async fn write_session(
        &self,
        session_id: SessionId,
        artifact: &Path,
        size_bytes: u64,
    ) -> Result<(), InstallerServiceError>;

    /// Commit the session. Returns once the commit is accepted, before the
    /// install outcome is known.
    async fn commit(
        &self,
        session_id: SessionId,
        completion_action: &str,
    ) -> Result<(), InstallerServiceError>;

    async fn abandon(&self, session_id: SessionId) -> Result<(), InstallerServiceError>;
}
