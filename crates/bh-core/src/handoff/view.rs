use serde::Serialize;

use super::state_machine::FailureReason;

/// What the foreground surface should currently display.
///
/// 前台界面应显示的视图。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ViewState {
    /// Ready; the install trigger is actionable.
    Idle,
    Installing,
    Failed { reason: FailureReason },
    /// The platform is asking the user to confirm the install.
    UserActionRequired,
}

/// Transient, non-blocking message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Notice {
    InstallInProgress,
    Installed,
    InstallFailed,
    PermissionRequired,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::InstallInProgress => "Installation already in progress",
            Notice::Installed => "Installed",
            Notice::InstallFailed => "Installation failed",
            Notice::PermissionRequired => "Permission to install packages is required",
        }
    }
}
