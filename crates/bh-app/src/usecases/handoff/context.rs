use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use bh_core::HandoffState;

/// Shared handoff context containing state and dispatch lock.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `state`.
/// - `dispatch_lock`: held for one transition plus its action batch.
/// - `state`: used for both reading (`get_state`) and writing (during dispatch).
pub struct HandoffContext {
    state: Mutex<HandoffState>,
    dispatch_lock: Mutex<()>,
    watch_tx: watch::Sender<HandoffState>,
}

impl HandoffContext {
    pub fn new(initial_state: HandoffState) -> Self {
        let (watch_tx, _) = watch::channel(initial_state.clone());
        Self {
            state: Mutex::new(initial_state),
            dispatch_lock: Mutex::new(()),
            watch_tx,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Lightweight read; does NOT acquire `dispatch_lock`.
    pub async fn get_state(&self) -> HandoffState {
        self.state.lock().await.clone()
    }

    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Update the state and publish it to subscribers.
    ///
    /// This should only be called after acquiring `dispatch_lock`.
    pub async fn set_state(&self, state: HandoffState) {
        let mut guard = self.state.lock().await;
        *guard = state.clone();
        self.watch_tx.send_replace(state);
    }

    pub fn subscribe(&self) -> watch::Receiver<HandoffState> {
        self.watch_tx.subscribe()
    }
}

impl Default for HandoffContext {
    fn default() -> Self {
        Self::new(HandoffState::Idle)
    }
}
