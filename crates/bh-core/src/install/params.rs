//! Session parameters handed to the installation service.
//!
//! Every optional hint records the lowest platform level that honours it.
//! Adapters drop hints the running platform cannot honour; that is never an
//! error.

use serde::Serialize;

/// Lowest platform level honouring the user-action hint.
pub const USER_ACTION_HINT_MIN_LEVEL: u32 = 31;
/// Lowest platform level honouring the install-reason tag.
pub const INSTALL_REASON_MIN_LEVEL: u32 = 33;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstallMode {
    /// Replace the whole package.
    FullInstall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstallReason {
    /// Install was initiated by the user.
    User,
}

impl InstallReason {
    /// Numeric value understood by the platform installer.
    pub fn platform_code(&self) -> u32 {
        match self {
            InstallReason::User => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UserActionHint {
    /// Ask the platform to skip the confirmation prompt when it allows it.
    NotRequired,
}

/// Parameters of a new install session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionParams {
    pub mode: InstallMode,
    pub install_reason: Option<InstallReason>,
    pub user_action: Option<UserActionHint>,
    /// Size of the artifact in bytes, when known up front.
    pub size_bytes: Option<u64>,
}

impl SessionParams {
    /// The best-effort hints used for a user-initiated install.
    pub fn user_initiated(size_bytes: Option<u64>) -> Self {
        Self {
            mode: InstallMode::FullInstall,
            install_reason: Some(InstallReason::User),
            user_action: Some(UserActionHint::NotRequired),
            size_bytes,
        }
    }

    /// Drop every hint the given platform level does not honour.
    pub fn gated_for(mut self, platform_level: u32) -> Self {
        if platform_level < USER_ACTION_HINT_MIN_LEVEL {
            self.user_action = None;
        }
        if platform_level < INSTALL_REASON_MIN_LEVEL {
            self.install_reason = None;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gating_keeps_all_hints_on_recent_platforms() {
        let params = SessionParams::user_initiated(Some(10)).gated_for(34);
        assert_eq!(params.install_reason, Some(InstallReason::User));
        assert_eq!(params.user_action, Some(UserActionHint::NotRequired));
    }

    #[test]
    fn gating_drops_hints_by_level() {
        let params = SessionParams::user_initiated(None).gated_for(32);
        assert_eq!(params.install_reason, None);
        assert_eq!(params.user_action, Some(UserActionHint::NotRequired));

        let params = SessionParams::user_initiated(None).gated_for(26);
        assert_eq!(params.install_reason, None);
        assert_eq!(params.user_action, None);
        assert_eq!(params.mode, InstallMode::FullInstall);
    }
}
