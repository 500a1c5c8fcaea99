/// Lifecycle of the hosting process.
#[async_trait::async_trait]
pub trait AppRuntimePort: Send + Sync {
    /// Request shutdown of the hosting process. Idempotent.
    async fn terminate(&self);
}
