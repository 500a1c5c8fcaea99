//! Launch ladder vocabulary.
//!
//! The ladder order is fixed: a direct component start, then the entry the
//! package registry resolves, then the two shell fallbacks. No strategy is
//! retried within one run.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// One rung of the launch ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LaunchStrategyKind {
    DirectComponent,
    ResolvedEntryIntent,
    ShellMonkey,
    ShellAmStart,
}

impl LaunchStrategyKind {
    /// Canonical ladder order.
    pub const LADDER: [LaunchStrategyKind; 4] = [
        LaunchStrategyKind::DirectComponent,
        LaunchStrategyKind::ResolvedEntryIntent,
        LaunchStrategyKind::ShellMonkey,
        LaunchStrategyKind::ShellAmStart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchStrategyKind::DirectComponent => "direct_component",
            LaunchStrategyKind::ResolvedEntryIntent => "resolved_entry_intent",
            LaunchStrategyKind::ShellMonkey => "shell_monkey",
            LaunchStrategyKind::ShellAmStart => "shell_am_start",
        }
    }
}

impl Display for LaunchStrategyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttemptOutcome {
    Succeeded,
    Failed { reason: String },
    /// Preconditions missing; the strategy never ran.
    Skipped,
}

impl AttemptOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        AttemptOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Succeeded)
    }

    pub fn was_attempted(&self) -> bool {
        !matches!(self, AttemptOutcome::Skipped)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchAttempt {
    pub strategy: LaunchStrategyKind,
    pub outcome: AttemptOutcome,
}

/// Attempts of one ladder run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LaunchReport {
    pub attempts: Vec<LaunchAttempt>,
}

impl LaunchReport {
    pub fn record(&mut self, strategy: LaunchStrategyKind, outcome: AttemptOutcome) {
        self.attempts.push(LaunchAttempt { strategy, outcome });
    }

    pub fn launched(&self) -> bool {
        self.attempts.iter().any(|a| a.outcome.is_success())
    }

    /// Strategy that brought the package to the foreground, if any.
    pub fn winner(&self) -> Option<LaunchStrategyKind> {
        self.attempts
            .iter()
            .find(|a| a.outcome.is_success())
            .map(|a| a.strategy)
    }

    pub fn outcome_of(&self, strategy: LaunchStrategyKind) -> Option<&AttemptOutcome> {
        self.attempts
            .iter()
            .find(|a| a.strategy == strategy)
            .map(|a| &a.outcome)
    }
}
