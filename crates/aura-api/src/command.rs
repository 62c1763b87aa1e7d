// ── CLI subprocess abstraction ──
//
// CLI-delegated providers (`gh`, `az`) run through a `CommandRunner` so the
// parsing logic can be exercised against scripted output in tests.

use std::io;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::Error;

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput>;
}

/// Runs real subprocesses via `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        debug!(program, ?args, "spawning");
        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Run a command and return stdout, mapping spawn failures and non-zero
/// exits into [`Error`].
pub(crate) async fn run_checked(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
) -> Result<String, Error> {
    let output = runner
        .run(program, args)
        .await
        .map_err(|e| Error::CliUnavailable {
            program: program.to_owned(),
            reason: e.to_string(),
        })?;

    if !output.success {
        return Err(Error::CliFailed {
            program: program.to_owned(),
            command: args.iter().take(2).copied().collect::<Vec<_>>().join(" "),
            stderr: output.stderr.trim().to_owned(),
        });
    }
    Ok(output.stdout)
}

/// Whether the program can be spawned and exits cleanly.
pub(crate) async fn probe(runner: &dyn CommandRunner, program: &str, args: &[&str]) -> bool {
    runner
        .run(program, args)
        .await
        .is_ok_and(|output| output.success)
}
