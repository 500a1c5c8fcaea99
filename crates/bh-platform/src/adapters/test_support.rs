use async_trait::async_trait;

use bh_core::ports::{CommandError, CommandOutput, CommandRunnerPort, CommandSpec};

mockall::mock! {
    pub Runner {}

    #[async_trait]
    impl CommandRunnerPort for Runner {
        async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;
    }
}

pub fn ok(stdout: &str) -> Result<CommandOutput, CommandError> {
    Ok(CommandOutput {
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    })
}

pub fn exit(code: i32, stdout: &str, stderr: &str) -> Result<CommandOutput, CommandError> {
    Ok(CommandOutput {
        exit_code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    })
}

