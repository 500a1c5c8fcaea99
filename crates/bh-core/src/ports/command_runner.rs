use std::path::PathBuf;
use std::time::Duration;

use crate::ports::errors::CommandError;

/// A program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// File streamed into the child's stdin.
    pub stdin_file: Option<PathBuf>,
    /// Overrides the runner's default timeout.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin_file: None,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin_file = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Shell-like rendering for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the child was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[async_trait::async_trait]
pub trait CommandRunnerPort: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_builder_collects_args() {
        let spec = CommandSpec::new("pm")
            .arg("install-write")
            .args(["-S", "42"])
            .stdin_file("/tmp/a.apk");
        assert_eq!(spec.display(), "pm install-write -S 42");
        assert_eq!(spec.stdin_file, Some(PathBuf::from("/tmp/a.apk")));
        assert_eq!(spec.timeout, None);
    }

    #[test]
    fn signal_exit_is_not_success() {
        let output = CommandOutput {
            exit_code: None,
            ..Default::default()
        };
        assert!(!output.success());
        assert!(CommandOutput {
            exit_code: Some(0),
            ..Default::default()
        }
        .success());
    }
}
