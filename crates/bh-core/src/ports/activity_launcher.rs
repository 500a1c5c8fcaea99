use crate::package::ComponentRef;
use crate::ports::errors::LaunchError;

#[async_trait::async_trait]
pub trait ActivityLauncherPort: Send + Sync {
    /// Start the given component in a new task and bring it to the foreground.
    async fn start_component(&self, component: &ComponentRef) -> Result<(), LaunchError>;
}
