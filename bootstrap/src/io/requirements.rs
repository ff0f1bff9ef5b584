//! Installing Python requirement lists with pip.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info};

use crate::io::process::{OnFailure, run_command};

static BLANK_OR_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(#.*)?$").expect("valid requirements regex"));

/// True if `contents` names at least one package (any line that is not blank
/// or a comment).
pub fn has_requirements(contents: &str) -> bool {
    contents.lines().any(|line| !BLANK_OR_COMMENT.is_match(line))
}

/// How pip is invoked for a site.
#[derive(Debug, Clone)]
pub struct Installer {
    pip: String,
    use_sudo: bool,
    workdir: PathBuf,
}

impl Installer {
    pub fn new(pip: impl Into<String>, use_sudo: bool, workdir: impl Into<PathBuf>) -> Self {
        Self {
            pip: pip.into(),
            use_sudo,
            workdir: workdir.into(),
        }
    }

    /// Installer for the current environment: outside a virtualenv
    /// (`VIRTUAL_ENV` unset) packages go to the system site and need `sudo`.
    pub fn from_env(pip: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        let use_sudo = std::env::var_os("VIRTUAL_ENV").is_none();
        Self::new(pip, use_sudo, workdir)
    }

    /// Command that installs `reqs_file`.
    pub fn command(&self, reqs_file: &Path) -> Command {
        let mut cmd = if self.use_sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg(&self.pip);
            cmd
        } else {
            Command::new(&self.pip)
        };
        cmd.arg("install")
            .arg("-r")
            .arg(reqs_file)
            .current_dir(&self.workdir);
        cmd
    }

    /// Install the packages listed in `reqs_file`. Files with nothing but
    /// blanks and comments are skipped without running pip.
    pub fn install(&self, reqs_file: &Path) -> Result<()> {
        let contents = fs::read_to_string(reqs_file)
            .with_context(|| format!("read requirements {}", reqs_file.display()))?;
        if !has_requirements(&contents) {
            info!("requirements file {} is empty", reqs_file.display());
            return Ok(());
        }
        run_command(self.command(reqs_file), OnFailure::Abort)
    }
}

/// `requirements.txt` of every submodule checkout under `submodules_dir`,
/// sorted by path. A missing submodules directory yields nothing.
pub fn submodule_requirement_files(submodules_dir: &Path) -> Result<Vec<PathBuf>> {
    if !submodules_dir.is_dir() {
        debug!(dir = %submodules_dir.display(), "no submodules directory");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(submodules_dir)
        .with_context(|| format!("read {}", submodules_dir.display()))?
    {
        let entry = entry.context("read submodule entry")?;
        let candidate = entry.path().join("requirements.txt");
        if candidate.is_file() {
            files.push(candidate);
        }
    }
    files.sort();
    Ok(files)
}
