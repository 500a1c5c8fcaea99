use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use bh_core::ports::{CommandRunnerPort, CommandSpec, LaunchError, PackageRegistryPort};
use bh_core::ComponentRef;

const LAUNCHER_CATEGORY: &str = "android.intent.category.LAUNCHER";

/// Package queries through `pm` and `cmd package`.
pub struct PmPackageRegistry {
    runner: Arc<dyn CommandRunnerPort>,
}

impl PmPackageRegistry {
    pub fn new(runner: Arc<dyn CommandRunnerPort>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl PackageRegistryPort for PmPackageRegistry {
    async fn is_installed(&self, package_id: &str) -> Result<bool, LaunchError> {
        let output = self
            .runner
            .run(&CommandSpec::new("pm").args(["path", package_id]))
            .await?;
        let installed =
            output.success() && output.stdout.lines().any(|l| l.trim().starts_with("package:"));
        debug!(package_id, installed, "package lookup");
        Ok(installed)
    }

    async fn resolve_launch_entry(
        &self,
        package_id: &str,
    ) -> Result<Option<ComponentRef>, LaunchError> {
        let spec = CommandSpec::new("cmd").args([
            "package",
            "resolve-activity",
            "--brief",
            "-c",
            LAUNCHER_CATEGORY,
            package_id,
        ]);
        let output = self.runner.run(&spec).await?;
        if !output.success() {
            return Err(LaunchError::Refused(output.stderr.trim().to_string()));
        }

        // `--brief` prints the priority line, then `package/class`.
        let entry = output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .and_then(ComponentRef::parse_flattened)
            .filter(|c| c.package_id == package_id);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::{exit, ok, MockRunner};

    #[tokio::test]
    async fn installed_when_pm_prints_a_path() {
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .withf(|spec| spec.display() == "pm path com.sample.app")
            .returning(|_| ok("package:/data/app/com.sample.app-1/base.apk\n"));

        assert!(PmPackageRegistry::new(Arc::new(runner))
            .is_installed("com.sample.app")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn not_installed_on_empty_output() {
        let mut runner = MockRunner::new();
        runner.expect_run().returning(|_| exit(1, "", ""));

        assert!(!PmPackageRegistry::new(Arc::new(runner))
            .is_installed("com.sample.app")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn resolves_relative_launcher_entry() {
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .returning(|_| ok("priority=0 preferredOrder=0 match=0x108000 specificIndex=-1 isDefault=false\ncom.sample.app/.Main\n"));

        let entry = PmPackageRegistry::new(Arc::new(runner))
            .resolve_launch_entry("com.sample.app")
            .await
            .unwrap();

        assert_eq!(
            entry,
            Some(ComponentRef::new("com.sample.app", "com.sample.app.Main"))
        );
    }

    #[tokio::test]
    async fn no_activity_found_resolves_to_none() {
        let mut runner = MockRunner::new();
        runner.expect_run().returning(|_| ok("No activity found\n"));

        let entry = PmPackageRegistry::new(Arc::new(runner))
            .resolve_launch_entry("com.sample.app")
            .await
            .unwrap();

        assert_eq!(entry, None);
    }
}
