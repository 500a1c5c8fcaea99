use std::sync::Arc;
use std::time::Duration;

use tracing::{info, info_span, warn, Instrument};

use bh_core::ports::{ActivityLauncherPort, CommandRunnerPort, PackageRegistryPort};
use bh_core::{AttemptOutcome, LaunchReport, PackageIdentity};

use super::strategies::{standard_ladder, LaunchStrategy};

/// Runs launch strategies in order and stops at the first success.
pub struct LaunchFallbackOrchestrator {
    strategies: Vec<Arc<dyn LaunchStrategy>>,
    inter_attempt_delay: Duration,
}

impl LaunchFallbackOrchestrator {
    pub fn new(strategies: Vec<Arc<dyn LaunchStrategy>>, inter_attempt_delay: Duration) -> Self {
        Self {
            strategies,
            inter_attempt_delay,
        }
    }

    /// Direct component, resolved entry, `monkey`, `am start`.
    pub fn standard(
        launcher: Arc<dyn ActivityLauncherPort>,
        registry: Arc<dyn PackageRegistryPort>,
        runner: Arc<dyn CommandRunnerPort>,
        inter_attempt_delay: Duration,
    ) -> Self {
        Self::new(
            standard_ladder(launcher, registry, runner),
            inter_attempt_delay,
        )
    }

    pub async fn force_launch(&self, identity: &PackageIdentity) -> LaunchReport {
        let span = info_span!(
            "usecase.launch_fallback.force_launch",
            package_id = %identity.package_id
        );
        async {
            let mut report = LaunchReport::default();
            let mut attempted_any = false;

            for strategy in &self.strategies {
                let kind = strategy.kind();
                if !strategy.is_applicable(identity) {
                    info!(strategy = %kind, "launch strategy skipped");
                    report.record(kind, AttemptOutcome::Skipped);
                    continue;
                }

                if attempted_any && !self.inter_attempt_delay.is_zero() {
                    tokio::time::sleep(self.inter_attempt_delay).await;
                }
                attempted_any = true;

                let outcome = strategy.attempt(identity).await;
                match &outcome {
                    AttemptOutcome::Succeeded => info!(strategy = %kind, "package launched"),
                    AttemptOutcome::Failed { reason } => {
                        warn!(strategy = %kind, %reason, "launch strategy failed")
                    }
                    AttemptOutcome::Skipped => info!(strategy = %kind, "launch strategy skipped"),
                }
                let launched = outcome.is_success();
                report.record(kind, outcome);
                if launched {
                    return report;
                }
            }

            warn!("every launch strategy failed");
            report
        }
        .instrument(span)
        .await
    }
}
