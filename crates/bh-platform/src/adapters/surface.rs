use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;

use bh_core::ports::ForegroundSurfacePort;
use bh_core::{Notice, UserActionPrompt, ViewState};

/// Work item for the foreground loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum SurfaceCommand {
    Show(ViewState),
    Notify(Notice),
    ForwardUserAction(UserActionPrompt),
}

/// Forwards surface calls to the single foreground loop.
#[derive(Debug, Clone)]
pub struct ChannelSurface {
    tx: mpsc::Sender<SurfaceCommand>,
}

impl ChannelSurface {
    pub fn new(tx: mpsc::Sender<SurfaceCommand>) -> Self {
        Self { tx }
    }

    /// A surface and the receiving end for the foreground loop.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SurfaceCommand>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    async fn send(&self, command: SurfaceCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| anyhow!("foreground loop has stopped"))
    }
}

#[async_trait]
impl ForegroundSurfacePort for ChannelSurface {
    async fn show(&self, view: ViewState) -> Result<()> {
        self.send(SurfaceCommand::Show(view)).await
    }

    async fn notify(&self, notice: Notice) -> Result<()> {
        self.send(SurfaceCommand::Notify(notice)).await
    }

    async fn forward_user_action(&self, prompt: UserActionPrompt) -> Result<()> {
        self.send(SurfaceCommand::ForwardUserAction(prompt)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bh_core::SessionId;

    #[tokio::test]
    async fn commands_arrive_in_order() {
        let (surface, mut rx) = ChannelSurface::channel(8);

        surface.show(ViewState::Installing).await.unwrap();
        surface.notify(Notice::Installed).await.unwrap();
        surface
            .forward_user_action(UserActionPrompt {
                session_id: SessionId::new(3),
                detail: None,
            })
            .await
            .unwrap();

        assert_eq!(rx.recv().await, Some(SurfaceCommand::Show(ViewState::Installing)));
        assert_eq!(rx.recv().await, Some(SurfaceCommand::Notify(Notice::Installed)));
        assert!(matches!(
            rx.recv().await,
            Some(SurfaceCommand::ForwardUserAction(prompt)) if prompt.session_id == SessionId::new(3)
        ));
    }

    #[tokio::test]
    async fn closed_loop_is_an_error() {
        let (surface, rx) = ChannelSurface::channel(1);
        drop(rx);

        assert!(surface.show(ViewState::Idle).await.is_err());
    }
}
