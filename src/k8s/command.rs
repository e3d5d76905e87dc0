//! External command execution
//!
//! Runs the cluster CLI and captures its trimmed standard output.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::SmokeError;

/// Executes external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program args...`, returning trimmed stdout on a zero exit status
    async fn execute(&self, program: &str, args: &[&str]) -> Result<String, SmokeError>;

    /// Run a command, optionally turning any failure into an empty string
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        ignore_failure: bool,
    ) -> Result<String, SmokeError> {
        match self.execute(program, args).await {
            Ok(stdout) => Ok(stdout),
            Err(e) if ignore_failure => {
                debug!("Ignoring failure: {}", e);
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Render a command line for diagnostics
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs commands as child processes
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn execute(&self, program: &str, args: &[&str]) -> Result<String, SmokeError> {
        let command = command_line(program, args);
        debug!("Executing {}", command);

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| SmokeError::Command {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("exited with {}", output.status),
                stderr => stderr.to_string(),
            };
            Err(SmokeError::Command { command, message })
        }
    }
}
