use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use bh_core::ports::{ActivityLauncherPort, CommandRunnerPort, CommandSpec, PackageRegistryPort};
use bh_core::{AttemptOutcome, LaunchStrategyKind, PackageIdentity};

/// One way of bringing the installed package to the foreground.
///
/// Failures are reported as [`AttemptOutcome::Failed`], never as errors.
#[async_trait]
pub trait LaunchStrategy: Send + Sync {
    fn kind(&self) -> LaunchStrategyKind;

    /// Whether the identity carries what this strategy needs.
    /// Inapplicable strategies are recorded as skipped without running.
    fn is_applicable(&self, identity: &PackageIdentity) -> bool {
        !identity.package_id.is_empty()
    }

    async fn attempt(&self, identity: &PackageIdentity) -> AttemptOutcome;
}

pub struct DirectComponentStrategy {
    launcher: Arc<dyn ActivityLauncherPort>,
}

impl DirectComponentStrategy {
    pub fn new(launcher: Arc<dyn ActivityLauncherPort>) -> Self {
        Self { launcher }
    }
}

#[async_trait]
impl LaunchStrategy for DirectComponentStrategy {
    fn kind(&self) -> LaunchStrategyKind {
        LaunchStrategyKind::DirectComponent
    }

    fn is_applicable(&self, identity: &PackageIdentity) -> bool {
        identity.component().is_some()
    }

    async fn attempt(&self, identity: &PackageIdentity) -> AttemptOutcome {
        let Some(component) = identity.component() else {
            return AttemptOutcome::Skipped;
        };
        match self.launcher.start_component(&component).await {
            Ok(()) => AttemptOutcome::Succeeded,
            Err(err) => AttemptOutcome::failed(err.to_string()),
        }
    }
}

pub struct ResolvedEntryIntentStrategy {
    registry: Arc<dyn PackageRegistryPort>,
    launcher: Arc<dyn ActivityLauncherPort>,
}

impl ResolvedEntryIntentStrategy {
    pub fn new(registry: Arc<dyn PackageRegistryPort>, launcher: Arc<dyn ActivityLauncherPort>) -> Self {
        Self { registry, launcher }
    }
}

#[async_trait]
impl LaunchStrategy for ResolvedEntryIntentStrategy {
    fn kind(&self) -> LaunchStrategyKind {
        LaunchStrategyKind::ResolvedEntryIntent
    }

    async fn attempt(&self, identity: &PackageIdentity) -> AttemptOutcome {
        let entry = match self.registry.resolve_launch_entry(&identity.package_id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return AttemptOutcome::failed("no launch entry resolved"),
            Err(err) => return AttemptOutcome::failed(err.to_string()),
        };
        debug!(component = %entry, "launch entry resolved");
        match self.launcher.start_component(&entry).await {
            Ok(()) => AttemptOutcome::Succeeded,
            Err(err) => AttemptOutcome::failed(err.to_string()),
        }
    }
}

pub struct ShellMonkeyStrategy {
    runner: Arc<dyn CommandRunnerPort>,
}

impl ShellMonkeyStrategy {
    pub fn new(runner: Arc<dyn CommandRunnerPort>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl LaunchStrategy for ShellMonkeyStrategy {
    fn kind(&self) -> LaunchStrategyKind {
        LaunchStrategyKind::ShellMonkey
    }

    async fn attempt(&self, identity: &PackageIdentity) -> AttemptOutcome {
        let spec = CommandSpec::new("monkey")
            .args(["-p", identity.package_id.as_str(), "1"]);
        run_shell(self.runner.as_ref(), &spec).await
    }
}

pub struct ShellAmStartStrategy {
    runner: Arc<dyn CommandRunnerPort>,
}

impl ShellAmStartStrategy {
    pub fn new(runner: Arc<dyn CommandRunnerPort>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl LaunchStrategy for ShellAmStartStrategy {
    fn kind(&self) -> LaunchStrategyKind {
        LaunchStrategyKind::ShellAmStart
    }

    fn is_applicable(&self, identity: &PackageIdentity) -> bool {
        identity.component().is_some()
    }

    async fn attempt(&self, identity: &PackageIdentity) -> AttemptOutcome {
        let Some(component) = identity.component() else {
            return AttemptOutcome::Skipped;
        };
        let spec = CommandSpec::new("am")
            .args(["start", "-n"])
            .arg(component.flatten());
        run_shell(self.runner.as_ref(), &spec).await
    }
}

async fn run_shell(runner: &dyn CommandRunnerPort, spec: &CommandSpec) -> AttemptOutcome {
    match runner.run(spec).await {
        Ok(output) if output.success() => AttemptOutcome::Succeeded,
        Ok(output) => AttemptOutcome::failed(format!(
            "`{}` exited with {:?}: {}",
            spec.display(),
            output.exit_code,
            output.stderr.trim()
        )),
        Err(err) => AttemptOutcome::failed(err.to_string()),
    }
}

/// The canonical ladder over the given ports.
pub(crate) fn standard_ladder(
    launcher: Arc<dyn ActivityLauncherPort>,
    registry: Arc<dyn PackageRegistryPort>,
    runner: Arc<dyn CommandRunnerPort>,
) -> Vec<Arc<dyn LaunchStrategy>> {
    vec![
        Arc::new(DirectComponentStrategy::new(launcher.clone())),
        Arc::new(ResolvedEntryIntentStrategy::new(registry, launcher)),
        Arc::new(ShellMonkeyStrategy::new(runner.clone())),
        Arc::new(ShellAmStartStrategy::new(runner)),
    ]
}
