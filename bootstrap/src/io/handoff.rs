//! Post-bootstrap handoff to site setup code.
//!
//! After a successful run the environment described by `sourceme.sh` is
//! derived by sourcing it in a child shell, and the site's configured setup
//! command (if any) is started with that environment. The bootstrap
//! process's own environment is left unchanged.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::context::RunContext;
use crate::io::process::{OnFailure, capture_stdout, run_command};

/// Final step of a completed bootstrap.
pub trait Handoff {
    fn handoff(&self, ctx: &RunContext) -> Result<()>;
}

/// Sources `sourceme.sh` and runs `[handoff] command` with the result.
pub struct SourcemeHandoff;

impl Handoff for SourcemeHandoff {
    #[instrument(skip_all)]
    fn handoff(&self, ctx: &RunContext) -> Result<()> {
        let sourceme = &ctx.paths.sourceme_path;
        if !sourceme.is_file() {
            warn!(
                "WARNING: {} not found, skipping environment handoff",
                sourceme.display()
            );
            return Ok(());
        }

        let derived = derive_environment(&ctx.paths.root, sourceme)?;
        for (key, value) in changed_vars(&derived) {
            debug!("  {key}={value}");
        }

        let Some((program, args)) = ctx.config.handoff.command.split_first() else {
            debug!(vars = derived.len(), "environment derived, no handoff command configured");
            return Ok(());
        };
        info!("Handing off to {}", ctx.config.handoff.command.join(" "));
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&ctx.paths.root)
            .env_clear()
            .envs(&derived);
        run_command(cmd, OnFailure::Abort).context("handoff command")
    }
}

/// Environment after sourcing `script` in a child `sh` started in `workdir`.
pub fn derive_environment(workdir: &Path, script: &Path) -> Result<BTreeMap<String, String>> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(". \"$1\" >/dev/null && env")
        .arg("sh")
        .arg(script)
        .current_dir(workdir);
    let stdout = capture_stdout(cmd)
        .with_context(|| format!("source {}", script.display()))?;
    Ok(parse_env_output(&String::from_utf8_lossy(&stdout)))
}

/// Parse `env` output. Lines without `=` (continuations of multi-line
/// values) are dropped.
pub fn parse_env_output(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn changed_vars(derived: &BTreeMap<String, String>) -> Vec<(&str, &str)> {
    derived
        .iter()
        .filter(|(key, value)| std::env::var(key).ok().as_deref() != Some(value.as_str()))
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}
