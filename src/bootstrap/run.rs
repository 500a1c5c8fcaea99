//! Foreground loop of the headless host.
//!
//! Surface commands are logged, the install is triggered once on start-up,
//! and the loop ends when the runtime is terminated after a successful
//! launch or when the flow lands on a failed view.

use anyhow::{bail, Context};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use bh_app::AppPaths;
use bh_core::{HandoffConfig, HandoffState, ViewState};
use bh_platform::adapters::SurfaceCommand;

use super::wiring::{wire_dependencies, WiredHandoff};

/// Wire everything and drive one handoff to completion.
pub async fn run_app(config: HandoffConfig, paths: AppPaths) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let wired = wire_dependencies(&config, &paths, shutdown.clone())
        .context("Failed to wire dependencies")?;
    run_handoff(wired, shutdown).await
}

pub async fn run_handoff(wired: WiredHandoff, shutdown: CancellationToken) -> anyhow::Result<()> {
    let WiredHandoff {
        orchestrator,
        mut surface_rx,
        completion_rx,
    } = wired;
    let pump = orchestrator.spawn_completion_pump(completion_rx);

    let state = orchestrator.start().await?;
    if state == HandoffState::Idle {
        orchestrator.install_plugin().await?;
    }

    let outcome = foreground_loop(&mut surface_rx, &shutdown).await;
    pump.abort();
    outcome
}

async fn foreground_loop(
    surface_rx: &mut mpsc::Receiver<SurfaceCommand>,
    shutdown: &CancellationToken,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("handoff complete, shutting down");
                return Ok(());
            }
            command = surface_rx.recv() => {
                let Some(command) = command else {
                    return Ok(());
                };
                handle_surface_command(command)?;
            }
        }
    }
}

fn handle_surface_command(command: SurfaceCommand) -> anyhow::Result<()> {
    match command {
        SurfaceCommand::Show(ViewState::Failed { reason }) => {
            error!(%reason, "handoff failed");
            bail!("handoff failed: {reason}");
        }
        SurfaceCommand::Show(view) => info!(?view, "view changed"),
        SurfaceCommand::Notify(notice) => info!(notice = notice.message(), "notice"),
        SurfaceCommand::ForwardUserAction(prompt) => warn!(
            session_id = %prompt.session_id,
            detail = ?prompt.detail,
            "installer is waiting for confirmation on the device"
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bh_core::{FailureReason, Notice};

    #[tokio::test]
    async fn test_loop_ends_on_shutdown() {
        let (tx, mut rx) = mpsc::channel(4);
        let shutdown = CancellationToken::new();
        tx.send(SurfaceCommand::Show(ViewState::Installing)).await.unwrap();
        tx.send(SurfaceCommand::Notify(Notice::Installed)).await.unwrap();
        shutdown.cancel();

        assert!(foreground_loop(&mut rx, &shutdown).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_view_ends_loop_with_error() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(SurfaceCommand::Show(ViewState::Failed {
            reason: FailureReason::TimedOut,
        }))
        .await
        .unwrap();

        let err = foreground_loop(&mut rx, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("handoff failed"));
    }

    #[tokio::test]
    async fn test_closed_surface_channel_ends_loop() {
        let (tx, mut rx) = mpsc::channel::<SurfaceCommand>(1);
        drop(tx);

        assert!(foreground_loop(&mut rx, &CancellationToken::new()).await.is_ok());
    }
}
