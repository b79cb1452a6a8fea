// SPDX-License-Identifier: MIT

//! Timeout-bounded subprocess execution. Every git invocation in this crate
//! goes through `run_with_timeout` rather than calling `Command::output`
//! directly, so a hung `git` process can never wedge a job forever.

use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

pub const GIT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);
pub const GIT_PUSH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum SubprocessError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

/// Run `git <args>` in `cwd`, bounded by `timeout`. Never panics; spawn
/// failures and timeouts are reported as [`SubprocessError`].
pub async fn run_git(
    cwd: &Path,
    args: &[&str],
    timeout: Duration,
) -> Result<std::process::Output, SubprocessError> {
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(cwd);
    let label = format!("git {}", args.join(" "));
    run_with_timeout(cmd, timeout, &label).await
}

pub(crate) async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &str,
) -> Result<std::process::Output, SubprocessError> {
    let fut = cmd.output();
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(SubprocessError::Spawn {
            command: label.to_string(),
            source,
        }),
        Err(_) => Err(SubprocessError::Timeout {
            command: label.to_string(),
            timeout,
        }),
    }
}

/// `stdout` trimmed and lossily decoded, for output we expect to be a
/// single line (commit sha, branch name, remote url).
pub fn stdout_trimmed(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
