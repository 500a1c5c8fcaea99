use std::path::PathBuf;

use bh_core::app_dirs::AppDirs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_path: PathBuf,
    pub bundle_dir: PathBuf,
    pub identity_cache_path: PathBuf,
    pub scratch_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_app_dirs(dirs: &AppDirs) -> Self {
        Self {
            config_path: dirs.app_data_root.join("config.toml"),
            bundle_dir: dirs.app_data_root.join("bundle"),
            identity_cache_path: dirs.app_data_root.join("identity.json"),
            scratch_dir: dirs.app_cache_root.join("staging"),
            logs_dir: dirs.app_data_root.join("logs"),
        }
    }
}
