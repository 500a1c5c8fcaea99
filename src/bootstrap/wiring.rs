//! # Dependency Injection / 依赖注入模块
//!
//! The only place that depends on bh-infra, bh-platform and bh-app at once.
//! It assembles adapters behind their ports and makes no decisions.
//! 唯一同时依赖 bh-infra、bh-platform 与 bh-app 的地方；仅负责组装。

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use bh_app::{AppPaths, HandoffDeps, HandoffOptions, HandoffOrchestrator};
use bh_core::{CompletionEvent, HandoffConfig};
use bh_infra::{ApkManifestReader, DirectoryBundleStorage, JsonIdentityCache};
use bh_platform::adapters::{
    AmActivityLauncher, ChannelSurface, PmPackageRegistry, PmShellInstaller,
    StaticInstallPermission, SurfaceCommand, TokenAppRuntime,
};
use bh_platform::TokioCommandRunner;

const SURFACE_CHANNEL_CAPACITY: usize = 32;
const COMPLETION_CHANNEL_CAPACITY: usize = 16;

pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Scratch directory initialization failed: {path}: {source}")]
    ScratchDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shell prefix has an empty program")]
    EmptyShellPrefix,
}

/// Everything the run loop needs after assembly.
pub struct WiredHandoff {
    pub orchestrator: Arc<HandoffOrchestrator>,
    pub surface_rx: mpsc::Receiver<SurfaceCommand>,
    pub completion_rx: mpsc::Receiver<CompletionEvent>,
}

fn bundle_root(config: &HandoffConfig, paths: &AppPaths) -> PathBuf {
    if config.bundle.root.as_os_str().is_empty() {
        paths.bundle_dir.clone()
    } else {
        config.bundle.root.clone()
    }
}

fn scratch_dir(config: &HandoffConfig, paths: &AppPaths) -> WiringResult<PathBuf> {
    let dir = config
        .paths
        .scratch_dir
        .clone()
        .unwrap_or_else(|| paths.scratch_dir.clone());
    std::fs::create_dir_all(&dir).map_err(|source| WiringError::ScratchDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Assemble the orchestrator and its channels.
pub fn wire_dependencies(
    config: &HandoffConfig,
    paths: &AppPaths,
    shutdown: CancellationToken,
) -> WiringResult<WiredHandoff> {
    if config.shell.prefix.first().is_some_and(|p| p.trim().is_empty()) {
        return Err(WiringError::EmptyShellPrefix);
    }
    let scratch_dir = scratch_dir(config, paths)?;

    let runner = Arc::new(TokioCommandRunner::new(
        config.shell.prefix.clone(),
        config.shell.timeout(),
    ));
    let (surface, surface_rx) = ChannelSurface::channel(SURFACE_CHANNEL_CAPACITY);
    let (completion_tx, completion_rx) = mpsc::channel(COMPLETION_CHANNEL_CAPACITY);

    let deps = HandoffDeps {
        surface: Arc::new(surface),
        install_permission: Arc::new(StaticInstallPermission::default()),
        bundle_storage: Arc::new(DirectoryBundleStorage::new(bundle_root(config, paths))),
        package_archive: Arc::new(ApkManifestReader::new()),
        identity_cache: Arc::new(JsonIdentityCache::new(paths.identity_cache_path.clone())),
        installer: Arc::new(PmShellInstaller::new(
            runner.clone(),
            completion_tx,
            config.install.platform_level,
        )),
        package_registry: Arc::new(PmPackageRegistry::new(runner.clone())),
        activity_launcher: Arc::new(AmActivityLauncher::new(runner.clone())),
        command_runner: runner,
        app_runtime: Arc::new(TokenAppRuntime::new(shutdown)),
    };

    let options = HandoffOptions::from_config(config, scratch_dir);
    Ok(WiredHandoff {
        orchestrator: Arc::new(HandoffOrchestrator::new(deps, options)),
        surface_rx,
        completion_rx,
    })
}
