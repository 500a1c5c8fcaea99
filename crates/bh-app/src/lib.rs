//! bundle-handoff application orchestration layer
//!
//! This crate contains the staging, install session, completion and launch
//! use cases, plus the handoff orchestrator that drives them.

pub mod app_paths;
pub mod deps;
pub mod usecases;

pub use app_paths::AppPaths;
pub use deps::HandoffDeps;
pub use usecases::handoff::{HandoffError, HandoffOptions, HandoffOrchestrator};
