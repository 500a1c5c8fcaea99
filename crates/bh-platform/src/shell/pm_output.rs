//! Parsing of `pm` session command output.
//!
//! `pm` reports on stdout (older releases use stderr for failures):
//!
//! ```text
//! Success: created install session [1234]
//! Success: streamed 4096 bytes
//! Success
//! Failure [INSTALL_FAILED_INSUFFICIENT_STORAGE: not enough space]
//! ```

use bh_core::install::completion::STATUS_SUCCESS;
use bh_core::ports::CommandOutput;
use bh_core::{FailureKind, FailureStatus, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PmResult {
    Success,
    Failure { token: String, message: String },
    /// Neither marker was found.
    Unrecognized(String),
}

impl PmResult {
    pub fn from_output(output: &CommandOutput) -> Self {
        let combined = format!("{}\n{}", output.stdout, output.stderr);
        for line in combined.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("Failure") {
                return parse_failure(rest);
            }
            if line.starts_with("Success") {
                return PmResult::Success;
            }
        }
        PmResult::Unrecognized(combined.trim().to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PmResult::Success)
    }

    /// Raw status code and message, the shape a completion broadcast carries.
    pub fn platform_status(&self) -> (i32, Option<String>) {
        match self.failure_status() {
            None => (STATUS_SUCCESS, None),
            Some(failure) => (failure.code, Some(failure.message)),
        }
    }

    /// Platform status for a failed result; `None` for success.
    pub fn failure_status(&self) -> Option<FailureStatus> {
        match self {
            PmResult::Success => None,
            PmResult::Failure { token, message } => {
                let kind = FailureKind::from_failure_token(token);
                let message = if message.is_empty() {
                    token.clone()
                } else {
                    format!("{token}: {message}")
                };
                Some(FailureStatus::new(kind.code(), message))
            }
            PmResult::Unrecognized(raw) => Some(FailureStatus::new(
                FailureKind::Generic.code(),
                if raw.is_empty() {
                    "no output from pm".to_string()
                } else {
                    raw.clone()
                },
            )),
        }
    }
}

/// `[TOKEN: message]`, `[TOKEN]` or nothing at all.
fn parse_failure(rest: &str) -> PmResult {
    let inner = rest
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.rsplit_once(']').map(|(inner, _)| inner))
        .unwrap_or(rest)
        .trim();
    let (token, message) = match inner.split_once(':') {
        Some((token, message)) => (token.trim(), message.trim()),
        None => (inner, ""),
    };
    PmResult::Failure {
        token: token.to_string(),
        message: message.to_string(),
    }
}

/// Session id from `Success: created install session [N]`.
pub fn parse_created_session(stdout: &str) -> Option<SessionId> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("Success"))
        .and_then(|line| {
            let start = line.find('[')?;
            let end = line[start..].find(']')? + start;
            line[start + 1..end].parse().ok()
        })
}
