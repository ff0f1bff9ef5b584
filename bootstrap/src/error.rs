//! Domain errors that map onto distinct exit behavior.
//!
//! Everything else travels as `anyhow::Error` with context attached.

use thiserror::Error;

use crate::exit_codes;

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A requested action name is not in the catalog.
    #[error("there is no action {name}")]
    UnknownAction {
        name: String,
        available: Vec<&'static str>,
    },

    /// An external command exited non-zero and was not marked tolerant.
    #[error("command `{command}` returned non-zero status {code}")]
    SubprocessFailure { command: String, code: i32 },
}

impl BootstrapError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownAction { .. } => exit_codes::FAILURE,
            // A zero here would report success for a failed run.
            Self::SubprocessFailure { code, .. } if *code != 0 => *code,
            Self::SubprocessFailure { .. } => exit_codes::FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subprocess_failure_propagates_child_code() {
        let err = BootstrapError::SubprocessFailure {
            command: "git submodule init".to_string(),
            code: 128,
        };
        assert_eq!(err.exit_code(), 128);
        assert!(err.to_string().contains("git submodule init"));
    }

    #[test]
    fn unknown_action_is_usage_failure() {
        let err = BootstrapError::UnknownAction {
            name: "bogus".to_string(),
            available: vec!["gitInitSubmodules"],
        };
        assert_eq!(err.exit_code(), exit_codes::FAILURE);
        assert_eq!(err.to_string(), "there is no action bogus");
    }
}
