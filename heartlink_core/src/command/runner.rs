//! Bounded execution of external commands.
//!
//! Probes call [`CommandRunner::run`] unconditionally: every fault (missing
//! binary, spawn failure, timeout) comes back as a failed [`CommandOutcome`]
//! rather than an error.

use async_trait::async_trait;
use std::process::{Output, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("empty command line")]
    EmptyCommand,

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` timed out after {timeout:?}")]
    TimedOut { program: String, timeout: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub succeeded: bool,
    pub output: String,
}

impl CommandOutcome {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            output: output.into(),
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            output: output.into(),
        }
    }

    fn from_output(output: &Output) -> Self {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = stdout.trim();

        let text = if stdout.is_empty() {
            stderr.trim().to_string()
        } else {
            stdout.to_string()
        };

        Self {
            succeeded: output.status.success(),
            output: text,
        }
    }
}

impl From<Result<Output, CommandError>> for CommandOutcome {
    fn from(result: Result<Output, CommandError>) -> Self {
        match result {
            Ok(output) => CommandOutcome::from_output(&output),
            Err(e) => CommandOutcome::failure(e.to_string()),
        }
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, argv: &[String], timeout: Duration) -> CommandOutcome;
}

/// Spawns real processes through tokio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }

    async fn execute(argv: &[String], timeout: Duration) -> Result<Output, CommandError> {
        let (program, args) = argv.split_first().ok_or(CommandError::EmptyCommand)?;

        debug!("Executing `{}` with timeout {:?}", argv.join(" "), timeout);

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Dropping the output future on timeout kills and reaps the child.
        match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(source)) => Err(CommandError::Spawn {
                program: program.clone(),
                source,
            }),
            Err(_) => Err(CommandError::TimedOut {
                program: program.clone(),
                timeout,
            }),
        }
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, argv: &[String], timeout: Duration) -> CommandOutcome {
        let result = Self::execute(argv, timeout).await;

        match &result {
            Ok(output) => debug!(
                "Command `{}` exited with {:?}",
                argv.join(" "),
                output.status.code()
            ),
            Err(e @ CommandError::TimedOut { .. }) => info!("{}", e),
            Err(e) => debug!("{}", e),
        }

        result.into()
    }
}

/// Builds an owned argv from string slices.
pub fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}
