use anyhow::Result;

use crate::handoff::{Notice, ViewState};
use crate::install::UserActionPrompt;

/// The single foreground surface. Implementations marshal every call onto
/// the foreground loop; callers may be on any task.
#[async_trait::async_trait]
pub trait ForegroundSurfacePort: Send + Sync {
    async fn show(&self, view: ViewState) -> Result<()>;

    async fn notify(&self, notice: Notice) -> Result<()>;

    /// Present the platform's install confirmation to the user.
    async fn forward_user_action(&self, prompt: UserActionPrompt) -> Result<()>;
}
