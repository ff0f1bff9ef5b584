//! Per-invocation settings shared by every action.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::io::config::{BootstrapConfig, load_config};
use crate::io::paths::SitePaths;

/// Options captured once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Answer yes to every confirmation.
    pub yes: bool,
    /// Site directory to operate in.
    pub site_dir: PathBuf,
    /// Net verbosity (`1 + verbose - quiet`).
    pub verbosity: i32,
    /// Re-offer every action, including ones already done or declined.
    pub retry: bool,
}

impl RunOptions {
    pub fn new(site_dir: impl Into<PathBuf>) -> Self {
        Self {
            yes: false,
            site_dir: site_dir.into(),
            verbosity: 1,
            retry: false,
        }
    }
}

/// Everything an action routine may consult. Built once per run and only
/// borrowed afterwards.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub options: RunOptions,
    pub paths: SitePaths,
    pub config: BootstrapConfig,
}

impl RunContext {
    /// Resolve paths for `options.site_dir` and load its bootstrap config.
    ///
    /// The site root is made absolute here; child processes run with the
    /// root as their working directory and receive paths built from it.
    pub fn load(options: RunOptions) -> Result<Self> {
        let root = std::path::absolute(&options.site_dir)
            .with_context(|| format!("resolve site dir {}", options.site_dir.display()))?;
        let paths = SitePaths::new(root);
        let config = load_config(&paths.config_path)?;
        Ok(Self {
            options,
            paths,
            config,
        })
    }
}
