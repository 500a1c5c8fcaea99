//! Out-of-band completion events delivered by the installation service.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::ids::SessionId;

/// Platform status code: the user must confirm the install.
pub const STATUS_PENDING_USER_ACTION: i32 = -1;
/// Platform status code: install succeeded.
pub const STATUS_SUCCESS: i32 = 0;

/// Default correlation action attached to every committed session.
pub const DEFAULT_COMPLETION_ACTION: &str = "bundle_handoff.INSTALL_COMPLETE";

/// Coarse failure category reported by the installation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Generic,
    Blocked,
    Aborted,
    Invalid,
    Conflict,
    Storage,
    Incompatible,
}

impl FailureKind {
    /// Map a raw platform status code (1..=7) to its category.
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => FailureKind::Blocked,
            3 => FailureKind::Aborted,
            4 => FailureKind::Invalid,
            5 => FailureKind::Conflict,
            6 => FailureKind::Storage,
            7 => FailureKind::Incompatible,
            _ => FailureKind::Generic,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            FailureKind::Generic => 1,
            FailureKind::Blocked => 2,
            FailureKind::Aborted => 3,
            FailureKind::Invalid => 4,
            FailureKind::Conflict => 5,
            FailureKind::Storage => 6,
            FailureKind::Incompatible => 7,
        }
    }

    /// Classify an `INSTALL_FAILED_*` / `INSTALL_PARSE_FAILED_*` token.
    pub fn from_failure_token(token: &str) -> Self {
        let token = token.trim();
        if token.starts_with("INSTALL_PARSE_FAILED_") {
            return FailureKind::Invalid;
        }
        match token.strip_prefix("INSTALL_FAILED_").unwrap_or(token) {
            "INSUFFICIENT_STORAGE" => FailureKind::Storage,
            "UPDATE_INCOMPATIBLE"
            | "CONFLICTING_PROVIDER"
            | "DUPLICATE_PERMISSION"
            | "ALREADY_EXISTS" => FailureKind::Conflict,
            "OLDER_SDK" | "NO_MATCHING_ABIS" | "VERSION_DOWNGRADE" => FailureKind::Incompatible,
            "INVALID_APK" => FailureKind::Invalid,
            "ABORTED" => FailureKind::Aborted,
            "USER_RESTRICTED" | "VERIFICATION_FAILURE" => FailureKind::Blocked,
            _ => FailureKind::Generic,
        }
    }
}

/// Failure code and human readable message of an asynchronous install failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("install failed with status {code}: {message}")]
pub struct FailureStatus {
    pub code: i32,
    pub message: String,
}

impl FailureStatus {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        FailureKind::from_code(self.code)
    }
}

/// Confirmation request the platform wants shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActionPrompt {
    pub session_id: SessionId,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionStatus {
    PendingUserAction { prompt: UserActionPrompt },
    Success,
    Failure(FailureStatus),
}

impl CompletionStatus {
    /// Build a status from the platform's raw integer code.
    ///
    /// Unknown codes are treated as generic failures.
    pub fn from_platform(
        session_id: SessionId,
        code: i32,
        message: Option<String>,
        prompt_detail: Option<String>,
    ) -> Self {
        match code {
            STATUS_PENDING_USER_ACTION => CompletionStatus::PendingUserAction {
                prompt: UserActionPrompt {
                    session_id,
                    detail: prompt_detail,
                },
            },
            STATUS_SUCCESS => CompletionStatus::Success,
            other => CompletionStatus::Failure(FailureStatus::new(
                other,
                message.unwrap_or_else(|| format!("status {other}")),
            )),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, CompletionStatus::PendingUserAction { .. })
    }
}

/// One completion notification correlated to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Correlation action; events for other actions are not ours.
    pub action: String,
    pub session_id: SessionId,
    pub status: CompletionStatus,
}

impl CompletionEvent {
    pub fn new(action: impl Into<String>, session_id: SessionId, status: CompletionStatus) -> Self {
        Self {
            action: action.into(),
            session_id,
            status,
        }
    }
}

/// Terminal result delivered once per session on its completion channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Succeeded,
    Failed(FailureStatus),
}

impl Display for CompletionOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionOutcome::Succeeded => write!(f, "succeeded"),
            CompletionOutcome::Failed(status) => write!(f, "failed: {status}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_platform_maps_known_codes() {
        let id = SessionId::new(3);
        assert_eq!(
            CompletionStatus::from_platform(id, 0, None, None),
            CompletionStatus::Success
        );
        match CompletionStatus::from_platform(id, -1, None, Some("confirm".into())) {
            CompletionStatus::PendingUserAction { prompt } => {
                assert_eq!(prompt.session_id, id);
                assert_eq!(prompt.detail.as_deref(), Some("confirm"));
            }
            other => panic!("unexpected status {other:?}"),
        }
        match CompletionStatus::from_platform(id, 6, Some("no space".into()), None) {
            CompletionStatus::Failure(status) => {
                assert_eq!(status.kind(), FailureKind::Storage);
                assert_eq!(status.message, "no space");
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn failure_tokens_are_classified() {
        assert_eq!(
            FailureKind::from_failure_token("INSTALL_FAILED_INSUFFICIENT_STORAGE"),
            FailureKind::Storage
        );
        assert_eq!(
            FailureKind::from_failure_token("INSTALL_FAILED_UPDATE_INCOMPATIBLE"),
            FailureKind::Conflict
        );
        assert_eq!(
            FailureKind::from_failure_token("INSTALL_FAILED_OLDER_SDK"),
            FailureKind::Incompatible
        );
        assert_eq!(
            FailureKind::from_failure_token("INSTALL_PARSE_FAILED_NOT_APK"),
            FailureKind::Invalid
        );
        assert_eq!(
            FailureKind::from_failure_token("INSTALL_FAILED_USER_RESTRICTED"),
            FailureKind::Blocked
        );
        assert_eq!(
            FailureKind::from_failure_token("INSTALL_FAILED_INTERNAL_ERROR"),
            FailureKind::Generic
        );
    }

    #[test]
    fn unknown_code_is_generic() {
        assert_eq!(FailureKind::from_code(42), FailureKind::Generic);
        assert_eq!(FailureKind::Conflict.code(), 5);
    }

    #[test]
    fn pending_user_action_is_not_terminal() {
        let status =
            CompletionStatus::from_platform(SessionId::new(1), STATUS_PENDING_USER_ACTION, None, None);
        assert!(!status.is_terminal());
        assert!(CompletionStatus::Success.is_terminal());
    }
}
