//! Handoff flow: explicit orchestrator state and the views it pushes.

pub mod state_machine;
pub mod view;

pub use state_machine::{
    FailureReason, HandoffAction, HandoffEvent, HandoffState, HandoffStateMachine,
};
pub use view::{Notice, ViewState};
