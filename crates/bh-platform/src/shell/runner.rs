use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use bh_core::ports::{CommandError, CommandOutput, CommandRunnerPort, CommandSpec};

/// Runs programs with `tokio::process`.
///
/// A non-empty `prefix` is prepended to every invocation, e.g. `["adb", "shell"]`
/// to drive a device from a host.
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    prefix: Vec<String>,
    default_timeout: Duration,
}

impl TokioCommandRunner {
    pub fn new(prefix: Vec<String>, default_timeout: Duration) -> Self {
        Self {
            prefix,
            default_timeout,
        }
    }

    /// Program and argv after applying the prefix.
    fn argv(&self, spec: &CommandSpec) -> (String, Vec<String>) {
        match self.prefix.split_first() {
            Some((program, rest)) => {
                let mut args = rest.to_vec();
                args.push(spec.program.clone());
                args.extend(spec.args.iter().cloned());
                (program.clone(), args)
            }
            None => (spec.program.clone(), spec.args.clone()),
        }
    }
}

#[async_trait]
impl CommandRunnerPort for TokioCommandRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        let (program, args) = self.argv(spec);
        let timeout = spec.timeout.unwrap_or(self.default_timeout);

        let stdin = match &spec.stdin_file {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|source| CommandError::Io {
                        program: program.clone(),
                        source,
                    })?;
                Stdio::from(file.into_std().await)
            }
            None => Stdio::null(),
        };

        let child = Command::new(&program)
            .args(&args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: program.clone(),
                source,
            })?;

        debug!(command = %spec.display(), ?timeout, "command spawned");

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| CommandError::Io {
                program: program.clone(),
                source,
            })?,
            Err(_) => {
                warn!(command = %spec.display(), ?timeout, "command timed out");
                return Err(CommandError::TimedOut {
                    program,
                    after: timeout,
                });
            }
        };

        let output = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            command = %spec.display(),
            exit_code = ?output.exit_code,
            "command finished"
        );
        Ok(output)
    }
}
