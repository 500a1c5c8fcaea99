//! Subprocess plumbing and `pm` output parsing.

pub mod pm_output;
mod runner;

pub use pm_output::{parse_created_session, PmResult};
pub use runner::TokioCommandRunner;
