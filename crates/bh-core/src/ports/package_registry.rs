use crate::package::ComponentRef;
use crate::ports::errors::LaunchError;

/// Read-only view of installed packages.
#[async_trait::async_trait]
pub trait PackageRegistryPort: Send + Sync {
    async fn is_installed(&self, package_id: &str) -> Result<bool, LaunchError>;

    /// The entry the platform would use to launch `package_id`, if any.
    async fn resolve_launch_entry(
        &self,
        package_id: &str,
    ) -> Result<Option<ComponentRef>, LaunchError>;
}
