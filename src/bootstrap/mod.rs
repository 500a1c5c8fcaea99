pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

use bh_app::AppPaths;
use bh_core::ports::AppDirsPort;
use bh_platform::DirsAppDirsAdapter;

pub use config::load_config;
pub use run::run_app;
pub use wiring::{wire_dependencies, WiredHandoff, WiringError};

/// Concrete application paths from the platform directories.
pub fn resolve_app_paths() -> anyhow::Result<AppPaths> {
    let dirs = DirsAppDirsAdapter::new().get_app_dirs()?;
    Ok(AppPaths::from_app_dirs(&dirs))
}
