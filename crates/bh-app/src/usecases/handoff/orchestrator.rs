//! Handoff orchestrator.
//!
//! This module coordinates the handoff state machine and its side effects:
//! the install worker, the launch worker and process termination.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};

use bh_core::install::TerminalState;
use bh_core::ports::{
    AppRuntimePort, ForegroundSurfacePort, IdentityCachePort, InstallPermissionPort,
    PackageRegistryPort,
};
use bh_core::{
    BundleRef, CompletionEvent, CompletionOutcome, FailureKind, FailureStatus, HandoffAction,
    HandoffConfig, HandoffEvent, HandoffState, HandoffStateMachine, PackageIdentity, ViewState,
};

use crate::deps::HandoffDeps;
use crate::usecases::completion_listener::CompletionListener;
use crate::usecases::handoff::context::HandoffContext;
use crate::usecases::install_session::InstallSessionManager;
use crate::usecases::launch::LaunchFallbackOrchestrator;
use crate::usecases::stage_artifact::StageArtifact;

/// Errors produced by the handoff orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("foreground surface failed: {0}")]
    Surface(#[source] anyhow::Error),
}

/// Runtime knobs of one handoff flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffOptions {
    pub bundle: BundleRef,
    pub scratch_dir: PathBuf,
    pub completion_action: String,
    /// `None` waits for the completion event forever.
    pub completion_timeout: Option<Duration>,
    pub settle_delay: Duration,
    pub inter_attempt_delay: Duration,
    pub termination_grace: Duration,
}

impl HandoffOptions {
    pub fn from_config(config: &HandoffConfig, scratch_dir: PathBuf) -> Self {
        Self {
            bundle: BundleRef::new(config.bundle.artifact.clone()),
            scratch_dir,
            completion_action: config.install.completion_action.clone(),
            completion_timeout: config.completion_timeout(),
            settle_delay: config.launch.settle_delay(),
            inter_attempt_delay: config.launch.inter_attempt_delay(),
            termination_grace: config.launch.termination_grace(),
        }
    }
}

/// Orchestrator that drives handoff state and side effects.
pub struct HandoffOrchestrator {
    context: Arc<HandoffContext>,
    options: HandoffOptions,
    /// Identity of the artifact handled in this cycle.
    identity: Mutex<Option<PackageIdentity>>,

    stage_artifact: Arc<StageArtifact>,
    sessions: Arc<InstallSessionManager>,
    listener: Arc<CompletionListener>,
    launcher: Arc<LaunchFallbackOrchestrator>,

    surface: Arc<dyn ForegroundSurfacePort>,
    install_permission: Arc<dyn InstallPermissionPort>,
    identity_cache: Arc<dyn IdentityCachePort>,
    package_registry: Arc<dyn PackageRegistryPort>,
    app_runtime: Arc<dyn AppRuntimePort>,
}

impl HandoffOrchestrator {
    pub fn new(deps: HandoffDeps, options: HandoffOptions) -> Self {
        let listener = Arc::new(CompletionListener::new(
            options.completion_action.clone(),
            deps.surface.clone(),
        ));
        let sessions = Arc::new(InstallSessionManager::new(deps.installer, listener.clone()));
        let stage_artifact = Arc::new(StageArtifact::new(
            deps.bundle_storage,
            deps.package_archive,
            options.scratch_dir.clone(),
        ));
        let launcher = Arc::new(LaunchFallbackOrchestrator::standard(
            deps.activity_launcher,
            deps.package_registry.clone(),
            deps.command_runner,
            options.inter_attempt_delay,
        ));

        Self {
            context: HandoffContext::default().arc(),
            options,
            identity: Mutex::new(None),
            stage_artifact,
            sessions,
            listener,
            launcher,
            surface: deps.surface,
            install_permission: deps.install_permission,
            identity_cache: deps.identity_cache,
            package_registry: deps.package_registry,
            app_runtime: deps.app_runtime,
        }
    }

    /// Route the installation service's completion events into the listener.
    pub fn spawn_completion_pump(&self, events: mpsc::Receiver<CompletionEvent>) -> JoinHandle<()> {
        self.listener.spawn_pump(events)
    }

    /// Start-up: launch right away when the bundled package is already installed.
    pub async fn start(self: &Arc<Self>) -> Result<HandoffState, HandoffError> {
        let span = info_span!("usecase.handoff.start", bundle = %self.options.bundle);
        async {
            if let Some(identity) = self.resolve_identity().await {
                *self.identity.lock().await = Some(identity.clone());
                match self.package_registry.is_installed(&identity.package_id).await {
                    Ok(true) => {
                        info!(package_id = %identity.package_id, "package already installed");
                        return self.dispatch(HandoffEvent::AlreadyInstalled).await;
                    }
                    Ok(false) => debug!(package_id = %identity.package_id, "package not installed"),
                    Err(err) => warn!(error = %err, "install check failed"),
                }
            }

            self.surface
                .show(ViewState::Idle)
                .await
                .map_err(HandoffError::Surface)?;
            Ok(self.context.get_state().await)
        }
        .instrument(span)
        .await
    }

    /// Foreground trigger: stage and install the bundled artifact.
    pub async fn install_plugin(self: &Arc<Self>) -> Result<HandoffState, HandoffError> {
        self.dispatch(HandoffEvent::InstallRequested).await
    }

    pub async fn state(&self) -> HandoffState {
        self.context.get_state().await
    }

    pub fn subscribe(&self) -> watch::Receiver<HandoffState> {
        self.context.subscribe()
    }

    fn dispatch(
        self: &Arc<Self>,
        event: HandoffEvent,
    ) -> BoxFuture<'_, Result<HandoffState, HandoffError>> {
        async move {
            let _dispatch_guard = self.context.acquire_dispatch_lock().await;

            let span = info_span!("usecase.handoff.dispatch", event = ?event);
            async {
                let from = self.context.get_state().await;
                let event_name = format!("{:?}", event);
                let (next, actions) = HandoffStateMachine::transition(from.clone(), event);
                info!(from = ?from, to = ?next, event = %event_name, "handoff state transition");
                self.context.set_state(next.clone()).await;
                self.execute_actions(actions).await?;
                Ok(next)
            }
            .instrument(span)
            .await
        }
        .boxed()
    }

    async fn dispatch_logged(self: &Arc<Self>, event: HandoffEvent) {
        if let Err(err) = self.dispatch(event).await {
            warn!(error = %err, "handoff dispatch failed");
        }
    }

    async fn execute_actions(self: &Arc<Self>, actions: Vec<HandoffAction>) -> Result<(), HandoffError> {
        let mut first_error = None;
        for action in actions {
            debug!(?action, "handoff executing action");
            let result = match action {
                HandoffAction::PushView(view) => self.surface.show(view).await,
                HandoffAction::Notify(notice) => self.surface.notify(notice).await,
                HandoffAction::BeginInstall => {
                    self.spawn_install_worker();
                    Ok(())
                }
                HandoffAction::ScheduleLaunch { settle } => {
                    self.spawn_launch_worker(settle);
                    Ok(())
                }
                HandoffAction::ScheduleTermination => {
                    self.spawn_termination();
                    Ok(())
                }
            };
            if let Err(err) = result {
                warn!(error = %err, "foreground surface rejected action");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(HandoffError::Surface(err)),
            None => Ok(()),
        }
    }

    fn spawn_install_worker(self: &Arc<Self>) {
        let this = Arc::clone(self);
        tokio::spawn(
            async move { this.run_install_worker().await }
                .instrument(info_span!("usecase.handoff.install_worker")),
        );
    }

    fn spawn_launch_worker(self: &Arc<Self>, settle: bool) {
        let this = Arc::clone(self);
        tokio::spawn(
            async move { this.run_launch_worker(settle).await }
                .instrument(info_span!("usecase.handoff.launch_worker")),
        );
    }

    fn spawn_termination(self: &Arc<Self>) {
        let runtime = Arc::clone(&self.app_runtime);
        let grace = self.options.termination_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            info!("terminating hosting process");
            runtime.terminate().await;
        });
    }

    async fn run_install_worker(self: &Arc<Self>) {
        if !self.install_permission.can_request_installs().await {
            warn!("install permission missing; routing user to settings");
            self.install_permission.request_permission().await;
            self.dispatch_logged(HandoffEvent::PermissionDenied).await;
            return;
        }

        let staged = match self.stage_artifact.execute(&self.options.bundle).await {
            Ok(staged) => staged,
            Err(err) => {
                error!(error = %err, "staging failed");
                self.dispatch_logged(HandoffEvent::StageFailed {
                    reason: err.to_string(),
                })
                .await;
                return;
            }
        };
        self.remember_identity(staged.identity()).await;

        let handle = match self.sessions.run_install(&staged).await {
            Ok(handle) => handle,
            Err(err) => {
                error!(error = %err, "install session failed");
                self.dispatch_logged(HandoffEvent::InstallFailed {
                    reason: err.to_string(),
                })
                .await;
                return;
            }
        };
        drop(staged);

        let session_id = handle.session_id;
        self.dispatch_logged(HandoffEvent::Committed { session_id })
            .await;

        let received = match self.options.completion_timeout {
            Some(limit) => match tokio::time::timeout(limit, handle.completion).await {
                Ok(received) => received,
                Err(_) => {
                    warn!(%session_id, ?limit, "install completion timed out; abandoning");
                    self.sessions.abandon(session_id).await;
                    self.dispatch_logged(HandoffEvent::CompletionTimedOut { session_id })
                        .await;
                    return;
                }
            },
            None => handle.completion.await,
        };

        let outcome = received.unwrap_or_else(|_| {
            warn!(%session_id, "completion channel closed without outcome");
            CompletionOutcome::Failed(FailureStatus::new(
                FailureKind::Generic.code(),
                "completion channel closed",
            ))
        });

        match outcome {
            CompletionOutcome::Succeeded => {
                self.sessions
                    .finish(session_id, TerminalState::Succeeded)
                    .await;
                self.dispatch_logged(HandoffEvent::CompletionSucceeded { session_id })
                    .await;
            }
            CompletionOutcome::Failed(status) => {
                error!(%session_id, code = status.code, message = %status.message, "install failed");
                self.sessions.finish(session_id, TerminalState::Failed).await;
                self.dispatch_logged(HandoffEvent::CompletionFailed { session_id, status })
                    .await;
            }
        }
    }

    async fn run_launch_worker(self: &Arc<Self>, settle: bool) {
        if settle && !self.options.settle_delay.is_zero() {
            tokio::time::sleep(self.options.settle_delay).await;
        }

        let launched = match self.current_identity().await {
            Some(identity) => self.launcher.force_launch(&identity).await.launched(),
            None => {
                warn!("no package identity known; nothing to launch");
                false
            }
        };
        self.dispatch_logged(HandoffEvent::LaunchFinished { launched })
            .await;
    }

    async fn resolve_identity(&self) -> Option<PackageIdentity> {
        match self.identity_cache.load().await {
            Ok(Some(identity)) => {
                debug!(package_id = %identity.package_id, "identity loaded from cache");
                return Some(identity);
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "identity cache unreadable, clearing it");
                if let Err(err) = self.identity_cache.clear().await {
                    warn!(error = %err, "failed to clear identity cache");
                }
            }
        }

        match self.stage_artifact.peek_identity(&self.options.bundle).await {
            Ok(identity) => {
                if let Err(err) = self.identity_cache.store(&identity).await {
                    warn!(error = %err, "failed to cache package identity");
                }
                Some(identity)
            }
            Err(err) => {
                warn!(error = %err, "could not read bundled package identity");
                None
            }
        }
    }

    async fn remember_identity(&self, identity: &PackageIdentity) {
        *self.identity.lock().await = Some(identity.clone());
        if let Err(err) = self.identity_cache.store(identity).await {
            warn!(error = %err, "failed to cache package identity");
        }
    }

    async fn current_identity(&self) -> Option<PackageIdentity> {
        if let Some(identity) = self.identity.lock().await.clone() {
            return Some(identity);
        }
        self.identity_cache.load().await.ok().flatten()
    }
}
