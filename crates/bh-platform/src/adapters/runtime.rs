use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use bh_core::ports::AppRuntimePort;

/// Ends the hosting process by cancelling the root token.
#[derive(Debug, Clone)]
pub struct TokenAppRuntime {
    token: CancellationToken,
}

impl TokenAppRuntime {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AppRuntimePort for TokenAppRuntime {
    async fn terminate(&self) {
        info!("terminating hosting process");
        self.token.cancel();
    }
}
