use std::path::PathBuf;

use super::*;
use crate::install::DEFAULT_COMPLETION_ACTION;

pub const DEFAULT_ARTIFACT_NAME: &str = "plugin.apk";
pub const DEFAULT_SHELL_TIMEOUT_SECS: u64 = 15;

impl Default for BundleSection {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            artifact: DEFAULT_ARTIFACT_NAME.to_string(),
        }
    }
}

impl Default for InstallSection {
    fn default() -> Self {
        Self {
            completion_action: DEFAULT_COMPLETION_ACTION.to_string(),
            platform_level: None,
            completion_timeout_secs: 0,
        }
    }
}

impl Default for LaunchSection {
    fn default() -> Self {
        Self {
            settle_delay_ms: 500,
            inter_attempt_delay_ms: 300,
            termination_grace_ms: 1000,
        }
    }
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            prefix: Vec::new(),
            timeout_secs: DEFAULT_SHELL_TIMEOUT_SECS,
        }
    }
}
