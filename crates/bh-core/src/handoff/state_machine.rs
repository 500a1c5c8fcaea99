//! Handoff state machine.
//!
//! Defines a pure state transition function for the stage, install and
//! launch flow. The orchestrator in `bh-app` executes the returned actions.

use serde::Serialize;
use std::fmt::{Display, Formatter};

use super::view::{Notice, ViewState};
use crate::ids::SessionId;
use crate::install::FailureStatus;

/// Handoff flow state.
///
/// 交付流程状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HandoffState {
    /// Nothing in flight.
    ///
    /// 空闲。
    Idle,
    /// Permission gate, staging and session commit are running.
    ///
    /// 正在准备（权限、暂存、提交）。
    Preparing,
    /// Session committed, waiting for its completion event.
    ///
    /// 等待安装完成事件。
    AwaitingCompletion { session_id: SessionId },
    /// Launch ladder is running.
    ///
    /// 正在启动已安装应用。
    Launching,
    /// Last attempt failed; a new install may be requested.
    ///
    /// 上次尝试失败。
    Failed { reason: FailureReason },
    /// Ladder done, process termination scheduled.
    ///
    /// 即将退出。
    Finishing,
}

impl HandoffState {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            HandoffState::Preparing | HandoffState::AwaitingCompletion { .. }
        )
    }

    fn accepts_new_install(&self) -> bool {
        matches!(self, HandoffState::Idle | HandoffState::Failed { .. })
    }
}

/// Why the last attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    PermissionDenied,
    Stage(String),
    Install(String),
    Completion(FailureStatus),
    TimedOut,
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::PermissionDenied => write!(f, "install permission denied"),
            FailureReason::Stage(msg) => write!(f, "staging failed: {msg}"),
            FailureReason::Install(msg) => write!(f, "install failed: {msg}"),
            FailureReason::Completion(status) => write!(f, "{status}"),
            FailureReason::TimedOut => write!(f, "install completion timed out"),
        }
    }
}

/// Events that drive the handoff flow.
///
/// 驱动交付流程的事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffEvent {
    /// Foreground trigger asked for an install.
    InstallRequested,
    PermissionDenied,
    StageFailed { reason: String },
    InstallFailed { reason: String },
    Committed { session_id: SessionId },
    CompletionSucceeded { session_id: SessionId },
    CompletionFailed {
        session_id: SessionId,
        status: FailureStatus,
    },
    CompletionTimedOut { session_id: SessionId },
    /// Start-up found the package already installed.
    AlreadyInstalled,
    LaunchFinished { launched: bool },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffAction {
    PushView(ViewState),
    Notify(Notice),
    /// Spawn the install worker (permission, stage, commit).
    BeginInstall,
    /// Run the launch ladder, after the settle delay when `settle` is set.
    ScheduleLaunch { settle: bool },
    /// Terminate the hosting process after the grace delay.
    ScheduleTermination,
}

/// Pure handoff state machine.
///
/// 纯状态机：不包含副作用。
pub struct HandoffStateMachine;

impl HandoffStateMachine {
    pub fn transition(
        state: HandoffState,
        event: HandoffEvent,
    ) -> (HandoffState, Vec<HandoffAction>) {
        match (state, event) {
            (state, HandoffEvent::InstallRequested) if state.accepts_new_install() => (
                HandoffState::Preparing,
                vec![
                    HandoffAction::PushView(ViewState::Installing),
                    HandoffAction::BeginInstall,
                ],
            ),
            (state, HandoffEvent::InstallRequested) => {
                (state, vec![HandoffAction::Notify(Notice::InstallInProgress)])
            }
            (HandoffState::Preparing, HandoffEvent::PermissionDenied) => {
                Self::fail(FailureReason::PermissionDenied, Notice::PermissionRequired)
            }
            (HandoffState::Preparing, HandoffEvent::StageFailed { reason }) => {
                Self::fail(FailureReason::Stage(reason), Notice::InstallFailed)
            }
            (HandoffState::Preparing, HandoffEvent::InstallFailed { reason }) => {
                Self::fail(FailureReason::Install(reason), Notice::InstallFailed)
            }
            (HandoffState::Preparing, HandoffEvent::Committed { session_id }) => {
                (HandoffState::AwaitingCompletion { session_id }, Vec::new())
            }
            (
                HandoffState::AwaitingCompletion { session_id },
                HandoffEvent::CompletionSucceeded { session_id: got },
            ) if session_id == got => (
                HandoffState::Launching,
                vec![
                    HandoffAction::Notify(Notice::Installed),
                    HandoffAction::ScheduleLaunch { settle: true },
                ],
            ),
            (
                HandoffState::AwaitingCompletion { session_id },
                HandoffEvent::CompletionFailed {
                    session_id: got,
                    status,
                },
            ) if session_id == got => {
                Self::fail(FailureReason::Completion(status), Notice::InstallFailed)
            }
            (
                HandoffState::AwaitingCompletion { session_id },
                HandoffEvent::CompletionTimedOut { session_id: got },
            ) if session_id == got => Self::fail(FailureReason::TimedOut, Notice::InstallFailed),
            (state, HandoffEvent::AlreadyInstalled) if state.accepts_new_install() => {
                (
                    HandoffState::Launching,
                    vec![HandoffAction::ScheduleLaunch { settle: false }],
                )
            }
            (HandoffState::Launching, HandoffEvent::LaunchFinished { .. }) => (
                HandoffState::Finishing,
                vec![HandoffAction::ScheduleTermination],
            ),
            (state, _event) => (state, Vec::new()),
        }
    }

    fn fail(reason: FailureReason, notice: Notice) -> (HandoffState, Vec<HandoffAction>) {
        (
            HandoffState::Failed {
                reason: reason.clone(),
            },
            vec![
                HandoffAction::Notify(notice),
                HandoffAction::PushView(ViewState::Failed { reason }),
            ],
        )
    }
}
