//! Git adapter for submodule provisioning.
//!
//! Thin wrapper so every git call runs in the site directory and goes through
//! the same logging and failure handling as other provisioning commands.

use std::path::PathBuf;
use std::process::Command;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::io::process::{OnFailure, run_command};

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Register submodules from `.gitmodules` and check out their recorded commits.
    #[instrument(skip_all)]
    pub fn init_submodules(&self) -> Result<()> {
        self.run(&["submodule", "init"])?;
        self.run(&["submodule", "update"])?;
        Ok(())
    }

    /// Put every submodule on `branch` instead of a detached HEAD.
    #[instrument(skip_all, fields(branch))]
    pub fn checkout_submodules_branch(&self, branch: &str) -> Result<()> {
        debug!(branch, "checking out branch in submodules");
        self.run(&["submodule", "foreach", "git", "checkout", branch])
    }

    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.workdir);
        cmd
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        run_command(self.command(args), OnFailure::Abort)
    }
}
