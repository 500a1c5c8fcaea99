use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use bh_core::ports::{ActivityLauncherPort, CommandRunnerPort, CommandSpec, LaunchError};
use bh_core::ComponentRef;

/// Starts components with `am start -W -n`.
pub struct AmActivityLauncher {
    runner: Arc<dyn CommandRunnerPort>,
}

impl AmActivityLauncher {
    pub fn new(runner: Arc<dyn CommandRunnerPort>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl ActivityLauncherPort for AmActivityLauncher {
    async fn start_component(&self, component: &ComponentRef) -> Result<(), LaunchError> {
        let spec = CommandSpec::new("am").args(["start", "-W", "-n", component.flatten().as_str()]);
        let output = self.runner.run(&spec).await?;
        debug!(%component, stdout = %output.stdout.trim(), "am start finished");

        // `am` exits 0 even when it prints an error, so the text decides.
        let text = format!("{}\n{}", output.stdout, output.stderr);
        let errors: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| l.starts_with("Error"))
            .collect();
        if errors.iter().any(|l| l.contains("does not exist")) {
            return Err(LaunchError::NotFound(component.flatten()));
        }
        // `Error type N` only announces the message lines that follow it.
        if let Some(error) = errors
            .iter()
            .find(|l| !l.starts_with("Error type"))
            .or(errors.first())
        {
            return Err(LaunchError::Refused(error.to_string()));
        }
        if !output.success() {
            return Err(LaunchError::Refused(format!(
                "am exited with {:?}",
                output.exit_code
            )));
        }
        Ok(())
    }
}
