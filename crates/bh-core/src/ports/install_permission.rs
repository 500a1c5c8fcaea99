/// Gate on the host's right to request package installs.
#[async_trait::async_trait]
pub trait InstallPermissionPort: Send + Sync {
    async fn can_request_installs(&self) -> bool;

    /// Route the user to the platform's permission settings.
    async fn request_permission(&self);
}
