//! Handoff orchestration: explicit flow state over the install and launch use cases.

mod context;
mod orchestrator;

pub use context::HandoffContext;
pub use orchestrator::{HandoffError, HandoffOptions, HandoffOrchestrator};
