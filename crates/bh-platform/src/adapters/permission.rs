use async_trait::async_trait;
use tracing::warn;

use bh_core::ports::InstallPermissionPort;

/// Install permission decided by configuration.
///
/// A shell-driven installer runs with the shell's privileges, so there is
/// nothing to request at runtime.
#[derive(Debug)]
pub struct StaticInstallPermission {
    granted: bool,
}

impl StaticInstallPermission {
    pub fn new(granted: bool) -> Self {
        Self { granted }
    }
}

impl Default for StaticInstallPermission {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl InstallPermissionPort for StaticInstallPermission {
    async fn can_request_installs(&self) -> bool {
        self.granted
    }

    async fn request_permission(&self) {
        warn!("install permission must be granted outside the application");
    }
}
