//! Helpers for running provisioning commands.
//!
//! Commands inherit the terminal so that installers can prompt (e.g. `sudo`
//! asking for a password). Each call blocks until the child exits.

use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument, warn};

use crate::error::BootstrapError;

/// What to do when a command exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Fail the action (and therefore the run).
    Abort,
    /// Log a warning and keep going.
    Continue,
}

/// Render a command as a single shell-like line for logs.
pub fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|arg| arg.to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Run a command to completion with inherited stdio.
///
/// A non-zero exit becomes [`BootstrapError::SubprocessFailure`] unless
/// `on_failure` is [`OnFailure::Continue`].
#[instrument(skip_all)]
pub fn run_command(mut cmd: Command, on_failure: OnFailure) -> Result<()> {
    let line = describe(&cmd);
    if cmd.get_program() == "sudo" {
        // Printed rather than logged so it shows before the password prompt
        // regardless of verbosity.
        println!("running: {line}");
    } else {
        info!("Running: {line}");
    }

    let status = cmd
        .status()
        .with_context(|| format!("spawn {line}"))?;
    if status.success() {
        debug!(command = %line, "command finished");
        return Ok(());
    }

    let code = status.code().unwrap_or(1);
    match on_failure {
        OnFailure::Continue => {
            warn!("WARNING: Command returned non-zero return value {code}");
            Ok(())
        }
        OnFailure::Abort => {
            error!("ERROR: Command returned non-zero return value {code}");
            Err(BootstrapError::SubprocessFailure {
                command: line,
                code,
            }
            .into())
        }
    }
}

/// Run a command and return its stdout. Stderr passes through to the terminal.
#[instrument(skip_all)]
pub fn capture_stdout(mut cmd: Command) -> Result<Vec<u8>> {
    let line = describe(&cmd);
    debug!(command = %line, "capturing command output");
    let output = cmd
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .with_context(|| format!("spawn {line}"))?;
    if !output.status.success() {
        let code = output.status.code().unwrap_or(1);
        error!("ERROR: Command returned non-zero return value {code}");
        return Err(BootstrapError::SubprocessFailure {
            command: line,
            code,
        }
        .into());
    }
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn describe_joins_program_and_args() {
        let mut cmd = Command::new("git");
        cmd.args(["submodule", "foreach", "git", "checkout", "master"]);
        assert_eq!(describe(&cmd), "git submodule foreach git checkout master");
    }

    #[test]
    fn failing_command_aborts_with_child_code() {
        let err = run_command(sh("exit 3"), OnFailure::Abort).unwrap_err();
        match err.downcast_ref::<BootstrapError>() {
            Some(BootstrapError::SubprocessFailure { code, command }) => {
                assert_eq!(*code, 3);
                assert_eq!(command, "sh -c exit 3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn tolerant_command_continues() {
        run_command(sh("exit 4"), OnFailure::Continue).expect("tolerated");
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = run_command(
            Command::new("definitely-not-a-real-program-xyz"),
            OnFailure::Continue,
        )
        .unwrap_err();
        assert!(err.downcast_ref::<BootstrapError>().is_none());
        assert!(err.to_string().contains("spawn"));
    }

    #[test]
    fn capture_returns_stdout() {
        let out = capture_stdout(sh("printf 'A=1\\n'")).expect("capture");
        assert_eq!(out, b"A=1\n");
    }
}
