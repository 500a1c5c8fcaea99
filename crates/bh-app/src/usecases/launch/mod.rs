//! Launch fallback ladder.

mod ladder;
mod strategies;

pub use ladder::LaunchFallbackOrchestrator;
pub use strategies::{
    DirectComponentStrategy, LaunchStrategy, ResolvedEntryIntentStrategy, ShellAmStartStrategy,
    ShellMonkeyStrategy,
};
