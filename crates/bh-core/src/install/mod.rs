//! Install domain module.
//!
//! This module defines the staged install session lifecycle, the session
//! parameters handed to the installation service, completion events and the
//! error taxonomy of staging and installing.

pub mod completion;
pub mod error;
pub mod params;
pub mod session;

pub use completion::{
    CompletionEvent, CompletionOutcome, CompletionStatus, FailureKind, FailureStatus,
    UserActionPrompt, DEFAULT_COMPLETION_ACTION,
};
pub use error::{InstallError, StageError};
pub use params::{InstallMode, InstallReason, SessionParams, UserActionHint};
pub use session::{InstallSession, SessionState, SessionTransitionError, TerminalState};
