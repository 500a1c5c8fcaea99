//! Completion listener.
//!
//! Correlates out-of-band completion events to the armed session and
//! delivers the terminal outcome exactly once on a oneshot channel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use bh_core::ports::ForegroundSurfacePort;
use bh_core::{
    CompletionEvent, CompletionOutcome, CompletionStatus, SessionId, UserActionPrompt, ViewState,
};

/// What the listener did with one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Foreign action, unknown or already resolved session.
    Ignored,
    /// Pending user action forwarded to the foreground; session stays armed.
    PromptForwarded,
    /// Terminal outcome delivered; session disarmed.
    Delivered,
}

pub struct CompletionListener {
    completion_action: String,
    surface: Arc<dyn ForegroundSurfacePort>,
    armed: Mutex<HashMap<SessionId, oneshot::Sender<CompletionOutcome>>>,
}

impl CompletionListener {
    pub fn new(completion_action: impl Into<String>, surface: Arc<dyn ForegroundSurfacePort>) -> Self {
        Self {
            completion_action: completion_action.into(),
            surface,
            armed: Mutex::new(HashMap::new()),
        }
    }

    pub fn completion_action(&self) -> &str {
        &self.completion_action
    }

    /// Register interest in `session_id`. Must happen before commit.
    pub async fn arm(&self, session_id: SessionId) -> oneshot::Receiver<CompletionOutcome> {
        let (tx, rx) = oneshot::channel();
        if self.armed.lock().await.insert(session_id, tx).is_some() {
            warn!(%session_id, "session re-armed; previous receiver dropped");
        }
        debug!(%session_id, "completion listener armed");
        rx
    }

    /// Returns whether the session was armed.
    pub async fn disarm(&self, session_id: SessionId) -> bool {
        let removed = self.armed.lock().await.remove(&session_id).is_some();
        if removed {
            debug!(%session_id, "completion listener disarmed");
        }
        removed
    }

    pub async fn is_armed(&self, session_id: SessionId) -> bool {
        self.armed.lock().await.contains_key(&session_id)
    }

    pub async fn handle_event(&self, event: CompletionEvent) -> EventDisposition {
        if event.action != self.completion_action {
            debug!(action = %event.action, "ignoring completion event for foreign action");
            return EventDisposition::Ignored;
        }

        let session_id = event.session_id;
        match event.status {
            CompletionStatus::PendingUserAction { prompt } => {
                if !self.is_armed(session_id).await {
                    debug!(%session_id, "ignoring user-action request for unarmed session");
                    return EventDisposition::Ignored;
                }
                self.forward_prompt(prompt).await;
                EventDisposition::PromptForwarded
            }
            CompletionStatus::Success => {
                self.deliver(session_id, CompletionOutcome::Succeeded).await
            }
            CompletionStatus::Failure(status) => {
                self.deliver(session_id, CompletionOutcome::Failed(status))
                    .await
            }
        }
    }

    /// Drain the installation service's event channel until it closes.
    pub fn spawn_pump(self: &Arc<Self>, mut rx: mpsc::Receiver<CompletionEvent>) -> JoinHandle<()> {
        let listener = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let session_id = event.session_id;
                let disposition = listener.handle_event(event).await;
                debug!(%session_id, ?disposition, "completion event handled");
            }
            debug!("completion event channel closed");
        })
    }

    async fn forward_prompt(&self, prompt: UserActionPrompt) {
        let session_id = prompt.session_id;
        info!(%session_id, "install requires user confirmation");
        if let Err(err) = self.surface.show(ViewState::UserActionRequired).await {
            warn!(%session_id, error = %err, "failed to push user-action view");
        }
        if let Err(err) = self.surface.forward_user_action(prompt).await {
            warn!(%session_id, error = %err, "failed to forward user-action prompt");
        }
    }

    async fn deliver(&self, session_id: SessionId, outcome: CompletionOutcome) -> EventDisposition {
        let Some(tx) = self.armed.lock().await.remove(&session_id) else {
            debug!(%session_id, "ignoring completion for unarmed session");
            return EventDisposition::Ignored;
        };
        info!(%session_id, %outcome, "install session completed");
        if tx.send(outcome).is_err() {
            warn!(%session_id, "completion receiver dropped before delivery");
        }
        EventDisposition::Delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bh_core::{FailureStatus, Notice};
    use std::sync::Mutex as StdMutex;

    const ACTION: &str = "test.INSTALL_COMPLETE";

    #[derive(Default)]
    struct RecordingSurface {
        views: StdMutex<Vec<ViewState>>,
        prompts: StdMutex<Vec<UserActionPrompt>>,
    }

    #[async_trait::async_trait]
    impl ForegroundSurfacePort for RecordingSurface {
        async fn show(&self, view: ViewState) -> anyhow::Result<()> {
            self.views.lock().unwrap().push(view);
            Ok(())
        }

        async fn notify(&self, _notice: Notice) -> anyhow::Result<()> {
            Ok(())
        }

        async fn forward_user_action(&self, prompt: UserActionPrompt) -> anyhow::Result<()> {
            self.prompts.lock().unwrap().push(prompt);
            Ok(())
        }
    }

    fn listener() -> (CompletionListener, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        (CompletionListener::new(ACTION, surface.clone()), surface)
    }

    fn event(id: i64, status: CompletionStatus) -> CompletionEvent {
        CompletionEvent::new(ACTION, SessionId::new(id), status)
    }

    fn pending(id: i64) -> CompletionStatus {
        CompletionStatus::from_platform(SessionId::new(id), -1, None, None)
    }

    #[tokio::test]
    async fn success_is_delivered_exactly_once() {
        let (listener, _) = listener();
        let rx = listener.arm(SessionId::new(1)).await;

        assert_eq!(
            listener.handle_event(event(1, CompletionStatus::Success)).await,
            EventDisposition::Delivered
        );
        assert_eq!(
            listener.handle_event(event(1, CompletionStatus::Success)).await,
            EventDisposition::Ignored
        );
        assert_eq!(rx.await.unwrap(), CompletionOutcome::Succeeded);
    }

    #[tokio::test]
    async fn failure_carries_status() {
        let (listener, _) = listener();
        let rx = listener.arm(SessionId::new(2)).await;
        let status = FailureStatus::new(5, "INSTALL_FAILED_UPDATE_INCOMPATIBLE");

        listener
            .handle_event(event(2, CompletionStatus::Failure(status.clone())))
            .await;

        assert_eq!(rx.await.unwrap(), CompletionOutcome::Failed(status));
        assert!(!listener.is_armed(SessionId::new(2)).await);
    }

    #[tokio::test]
    async fn foreign_action_and_unknown_session_are_ignored() {
        let (listener, _) = listener();
        let mut rx = listener.arm(SessionId::new(3)).await;

        let foreign = CompletionEvent::new("other.ACTION", SessionId::new(3), CompletionStatus::Success);
        assert_eq!(listener.handle_event(foreign).await, EventDisposition::Ignored);
        assert_eq!(
            listener.handle_event(event(4, CompletionStatus::Success)).await,
            EventDisposition::Ignored
        );

        assert!(rx.try_recv().is_err());
        assert!(listener.is_armed(SessionId::new(3)).await);
    }

    #[tokio::test]
    async fn pending_user_action_is_forwarded_and_may_recur() {
        let (listener, surface) = listener();
        let mut rx = listener.arm(SessionId::new(5)).await;

        for _ in 0..2 {
            assert_eq!(
                listener.handle_event(event(5, pending(5))).await,
                EventDisposition::PromptForwarded
            );
        }

        assert_eq!(surface.prompts.lock().unwrap().len(), 2);
        assert_eq!(
            surface.views.lock().unwrap().as_slice(),
            &[ViewState::UserActionRequired, ViewState::UserActionRequired]
        );
        assert!(rx.try_recv().is_err());

        listener.handle_event(event(5, CompletionStatus::Success)).await;
        assert_eq!(rx.await.unwrap(), CompletionOutcome::Succeeded);
    }

    #[tokio::test]
    async fn pending_user_action_for_unarmed_session_is_ignored() {
        let (listener, surface) = listener();

        assert_eq!(
            listener.handle_event(event(6, pending(6))).await,
            EventDisposition::Ignored
        );
        assert!(surface.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn disarm_drops_the_sender() {
        let (listener, _) = listener();
        let rx = listener.arm(SessionId::new(7)).await;

        assert!(listener.disarm(SessionId::new(7)).await);
        assert!(!listener.disarm(SessionId::new(7)).await);
        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn pump_routes_channel_events() {
        let (listener, _) = listener();
        let listener = Arc::new(listener);
        let rx = listener.arm(SessionId::new(8)).await;
        let (tx, events) = mpsc::channel(4);
        let pump = listener.spawn_pump(events);

        tx.send(event(8, CompletionStatus::Success)).await.unwrap();
        assert_eq!(rx.await.unwrap(), CompletionOutcome::Succeeded);

        drop(tx);
        pump.await.unwrap();
    }
}
