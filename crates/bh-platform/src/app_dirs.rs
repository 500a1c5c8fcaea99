use std::path::PathBuf;

use bh_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "bundle-handoff";
const PROFILE_ENV: &str = "BUNDLE_HANDOFF_PROFILE";

/// `bundle-handoff`, or `bundle-handoff-<profile>` when a profile is set.
fn resolved_app_dir_name() -> String {
    match std::env::var(PROFILE_ENV) {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

/// Application directories from the `dirs` crate.
#[derive(Debug, Default)]
pub struct DirsAppDirsAdapter {
    base_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_override: None,
        }
    }

    /// Resolve both roots under `base` instead of the system directories.
    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            base_override: Some(base),
        }
    }

    fn base_data_dir(&self) -> Option<PathBuf> {
        self.base_override.clone().or_else(dirs::data_local_dir)
    }

    fn base_cache_dir(&self) -> Option<PathBuf> {
        self.base_override.clone().or_else(dirs::cache_dir)
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base_data = self
            .base_data_dir()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;
        let base_cache = self
            .base_cache_dir()
            .ok_or(AppDirsError::CacheDirUnavailable)?;
        let name = resolved_app_dir_name();

        Ok(AppDirs {
            app_data_root: base_data.join(&name),
            app_cache_root: base_cache.join(&name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static PROFILE_ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_profile<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let _guard = PROFILE_ENV_LOCK.lock().unwrap();
        let previous = std::env::var(PROFILE_ENV).ok();

        match value {
            Some(profile) => std::env::set_var(PROFILE_ENV, profile),
            None => std::env::remove_var(PROFILE_ENV),
        }
        let result = f();
        match previous {
            Some(profile) => std::env::set_var(PROFILE_ENV, profile),
            None => std::env::remove_var(PROFILE_ENV),
        }

        result
    }

    #[test]
    fn adapter_appends_app_dir_name() {
        with_profile(None, || {
            let adapter = DirsAppDirsAdapter::with_base_dir(PathBuf::from("/tmp"));
            let dirs = adapter.get_app_dirs().unwrap();
            assert_eq!(dirs.app_data_root, PathBuf::from("/tmp/bundle-handoff"));
            assert_eq!(dirs.app_cache_root, PathBuf::from("/tmp/bundle-handoff"));
        });
    }

    #[test]
    fn profile_gets_its_own_dirs() {
        let dirs = with_profile(Some("staging"), || {
            DirsAppDirsAdapter::with_base_dir(PathBuf::from("/tmp"))
                .get_app_dirs()
                .unwrap()
        });

        assert_eq!(
            dirs.app_data_root,
            PathBuf::from("/tmp/bundle-handoff-staging")
        );
    }
}
