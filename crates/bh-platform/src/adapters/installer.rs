//! Staged install sessions over the `pm` shell interface.
//!
//! `pm install-commit` blocks until the package manager has decided, so the
//! commit runs on its own task and its result is delivered as a
//! [`CompletionEvent`] on the channel handed to the adapter.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, OnceCell};
use tracing::{debug, info, info_span, warn, Instrument};

use bh_core::ports::{CommandRunnerPort, CommandSpec, InstallerServiceError, InstallerServicePort};
use bh_core::{CompletionEvent, CompletionStatus, FailureKind, SessionId, SessionParams};

use crate::shell::{parse_created_session, PmResult};

/// Writes and commits can take far longer than a query.
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(120);
/// Split name of the single APK written into a session.
const SPLIT_NAME: &str = "base.apk";

pub struct PmShellInstaller {
    runner: Arc<dyn CommandRunnerPort>,
    events: mpsc::Sender<CompletionEvent>,
    configured_level: Option<u32>,
    platform_level: OnceCell<u32>,
}

impl PmShellInstaller {
    pub fn new(
        runner: Arc<dyn CommandRunnerPort>,
        events: mpsc::Sender<CompletionEvent>,
        platform_level: Option<u32>,
    ) -> Self {
        Self {
            runner,
            events,
            configured_level: platform_level,
            platform_level: OnceCell::new(),
        }
    }

    /// Configured level, else `ro.build.version.sdk`, else 0 (no hints).
    async fn platform_level(&self) -> u32 {
        *self
            .platform_level
            .get_or_init(|| async {
                if let Some(level) = self.configured_level {
                    return level;
                }
                let query = CommandSpec::new("getprop").arg("ro.build.version.sdk");
                match self.runner.run(&query).await {
                    Ok(output) if output.success() => match output.stdout.trim().parse() {
                        Ok(level) => {
                            debug!(level, "platform level queried");
                            level
                        }
                        Err(_) => {
                            warn!(raw = %output.stdout.trim(), "unparsable platform level");
                            0
                        }
                    },
                    Ok(output) => {
                        warn!(exit_code = ?output.exit_code, "platform level query failed");
                        0
                    }
                    Err(err) => {
                        warn!(error = %err, "platform level query failed");
                        0
                    }
                }
            })
            .await
    }

    async fn run_pm(&self, spec: CommandSpec) -> Result<PmResult, InstallerServiceError> {
        let output = self.runner.run(&spec).await?;
        Ok(PmResult::from_output(&output))
    }
}

fn into_error(result: PmResult) -> InstallerServiceError {
    match result {
        PmResult::Failure { token, message } if message.is_empty() => {
            InstallerServiceError::Rejected(token)
        }
        PmResult::Failure { token, message } => {
            InstallerServiceError::Rejected(format!("{token}: {message}"))
        }
        PmResult::Unrecognized(raw) => InstallerServiceError::UnexpectedResponse(raw),
        PmResult::Success => InstallerServiceError::UnexpectedResponse("Success".into()),
    }
}

#[async_trait]
impl InstallerServicePort for PmShellInstaller {
    async fn create_session(
        &self,
        params: &SessionParams,
    ) -> Result<SessionId, InstallerServiceError> {
        let level = self.platform_level().await;
        let params = params.clone().gated_for(level);

        let mut spec = CommandSpec::new("pm").args(["install-create", "-r"]);
        if let Some(size) = params.size_bytes {
            spec = spec.args(["-S".to_string(), size.to_string()]);
        }
        if let Some(reason) = params.install_reason {
            spec = spec.args([
                "--install-reason".to_string(),
                reason.platform_code().to_string(),
            ]);
        }
        // Shell sessions never prompt, so the user-action hint has no flag.

        let output = self.runner.run(&spec).await?;
        match parse_created_session(&output.stdout) {
            Some(session_id) => {
                info!(%session_id, level, "install session created");
                Ok(session_id)
            }
            None => Err(into_error(PmResult::from_output(&output))),
        }
    }

    async fn write_session(
        &self,
        session_id: SessionId,
        artifact: &Path,
        size_bytes: u64,
    ) -> Result<(), InstallerServiceError> {
        let spec = CommandSpec::new("pm")
            .args([
                "install-write".to_string(),
                "-S".to_string(),
                size_bytes.to_string(),
                session_id.to_string(),
                SPLIT_NAME.to_string(),
                "-".to_string(),
            ])
            .stdin_file(artifact)
            .timeout(TRANSFER_TIMEOUT);
        match self.run_pm(spec).await? {
            PmResult::Success => {
                debug!(%session_id, size_bytes, "artifact streamed into session");
                Ok(())
            }
            other => Err(into_error(other)),
        }
    }

    async fn commit(
        &self,
        session_id: SessionId,
        completion_action: &str,
    ) -> Result<(), InstallerServiceError> {
        let runner = self.runner.clone();
        let events = self.events.clone();
        let action = completion_action.to_string();
        let spec = CommandSpec::new("pm")
            .args(["install-commit".to_string(), session_id.to_string()])
            .timeout(TRANSFER_TIMEOUT);

        tokio::spawn(
            async move {
                let (code, message) = match runner.run(&spec).await {
                    Ok(output) => PmResult::from_output(&output).platform_status(),
                    Err(err) => (FailureKind::Generic.code(), Some(err.to_string())),
                };
                // Shell commits never wait on the user, so no prompt detail.
                let status = CompletionStatus::from_platform(session_id, code, message, None);
                info!(?status, "install commit finished");
                if events
                    .send(CompletionEvent::new(action, session_id, status))
                    .await
                    .is_err()
                {
                    warn!("completion channel closed; event dropped");
                }
            }
            .instrument(info_span!("platform.pm.commit", session_id = %session_id)),
        );

        Ok(())
    }

    async fn abandon(&self, session_id: SessionId) -> Result<(), InstallerServiceError> {
        let spec = CommandSpec::new("pm").args(["install-abandon".to_string(), session_id.to_string()]);
        match self.run_pm(spec).await? {
            PmResult::Success => {
                info!(%session_id, "install session abandoned");
                Ok(())
            }
            other => Err(into_error(other)),
        }
    }
}
