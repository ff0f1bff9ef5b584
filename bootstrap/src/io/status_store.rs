//! Status files under `build/management/bootstrap/`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::status::Status;

/// Read a status file. A missing file means the action was never attempted.
pub fn read_status(path: &Path) -> Result<Option<Status>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read status {}", path.display()))?;
    let status = Status::parse(&contents);
    debug!(path = %path.display(), status = %status, "status loaded");
    Ok(Some(status))
}

/// Atomically write a status file (temp file + rename), creating parent dirs.
pub fn write_status(path: &Path, status: &Status) -> Result<()> {
    debug!(path = %path.display(), status = %status, "writing status");
    write_atomic(path, &format!("{}\n", status.label()))
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("status path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("txt.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp status {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace status {}", path.display()))?;
    Ok(())
}
