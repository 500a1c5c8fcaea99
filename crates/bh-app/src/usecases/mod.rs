//! Use cases, leaves first:
//!
//! ```text
//! StageArtifact ─► InstallSessionManager ─► (async) CompletionListener
//!                                                    │
//!                       LaunchFallbackOrchestrator ◄─┘ ─► termination
//! ```
//!
//! `HandoffOrchestrator` owns the flow state and wires the four together.

pub mod completion_listener;
pub mod handoff;
pub mod install_session;
pub mod launch;
pub mod stage_artifact;

pub use completion_listener::{CompletionListener, EventDisposition};
pub use install_session::{InstallSessionManager, SessionHandle};
pub use launch::LaunchFallbackOrchestrator;
pub use stage_artifact::{ScratchFile, StageArtifact, StagedArtifact};
