//! # bh-core
//!
//! Core domain models and business logic for bundle-handoff.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the install session lifecycle, completion events, the launch ladder vocabulary,
//! the handoff state machine and the ports implemented by `bh-infra` / `bh-platform`.

pub mod app_dirs;
pub mod config;
pub mod handoff;
pub mod ids;
pub mod install;
pub mod launch;
pub mod package;
pub mod ports;

// Re-export commonly used types at the crate root
pub use config::HandoffConfig;
pub use handoff::{
    FailureReason, HandoffAction, HandoffEvent, HandoffState, HandoffStateMachine, Notice,
    ViewState,
};
pub use ids::SessionId;
pub use install::{
    CompletionEvent, CompletionOutcome, CompletionStatus, FailureKind, FailureStatus, InstallError,
    InstallSession, SessionParams, SessionState, StageError, UserActionPrompt,
};
pub use launch::{AttemptOutcome, LaunchAttempt, LaunchReport, LaunchStrategyKind};
pub use package::{BundleRef, ComponentRef, PackageIdentity};
