//! Bootstrap configuration stored at `management/bootstrap.toml`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Site-level bootstrap configuration (TOML).
///
/// The file is optional and every field has a default, so a site only lists
/// what it changes. Relative paths are resolved against the site directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Directory holding site-provided templates for generated files.
    pub templates_dir: PathBuf,

    /// Site-level Python requirements list.
    pub site_requirements: PathBuf,

    /// Directory containing one checkout per submodule.
    pub submodules_dir: PathBuf,

    /// Directory where submodule apps are symlinked.
    pub apps_dir: PathBuf,

    /// Branch checked out in every submodule for development.
    pub submodule_branch: String,

    /// Package installer program.
    pub pip: String,

    pub site: SiteConfig,

    pub handoff: HandoffConfig,
}

/// Values substituted into the generated environment script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    /// URL prefix the site is served under (`DJANGO_SCRIPT_NAME`).
    pub script_name: String,
    /// Python module name of the generated settings file.
    pub settings_module: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            script_name: "/".to_string(),
            settings_module: "settings".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HandoffConfig {
    /// Command run after bootstrapping with the environment from
    /// `sourceme.sh` (e.g. `["python", "manage.py", "syncdb"]`). Empty means
    /// the handoff only derives and reports the environment.
    pub command: Vec<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("management/templates"),
            site_requirements: PathBuf::from("management/siteRequirements.txt"),
            submodules_dir: PathBuf::from("submodules"),
            apps_dir: PathBuf::from("apps"),
            submodule_branch: "master".to_string(),
            pip: "pip".to_string(),
            site: SiteConfig::default(),
            handoff: HandoffConfig::default(),
        }
    }
}

impl BootstrapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.submodule_branch.trim().is_empty() {
            return Err(anyhow!("submodule_branch must be non-empty"));
        }
        if self.pip.trim().is_empty() {
            return Err(anyhow!("pip must be non-empty"));
        }
        if self.site.settings_module.trim().is_empty() {
            return Err(anyhow!("site.settings_module must be non-empty"));
        }
        for (key, path) in [
            ("templates_dir", &self.templates_dir),
            ("site_requirements", &self.site_requirements),
            ("submodules_dir", &self.submodules_dir),
            ("apps_dir", &self.apps_dir),
        ] {
            ensure_within_site(key, path)?;
        }
        if let Some(program) = self.handoff.command.first()
            && program.trim().is_empty()
        {
            return Err(anyhow!("handoff.command must start with a program name"));
        }
        Ok(())
    }
}

/// Site paths must be relative and must not climb out of the site.
fn ensure_within_site(key: &str, path: &Path) -> Result<()> {
    let mut normal = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(anyhow!(
                    "{key} must be a path inside the site directory, got {}",
                    path.display()
                ));
            }
        }
    }
    if normal == 0 {
        return Err(anyhow!("{key} must name a path inside the site directory"));
    }
    Ok(())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `BootstrapConfig::default()`.
pub fn load_config(path: &Path) -> Result<BootstrapConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no bootstrap config, using defaults");
        let cfg = BootstrapConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: BootstrapConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), "bootstrap config loaded");
    Ok(cfg)
}
