//! The provisioning action catalog.
//!
//! Each [`ActionId`] is bound to its routines here, once, at startup: an
//! execute function and, for actions whose necessity depends on the
//! filesystem rather than a status file, a needed check.

use std::path::Path;

use anyhow::Result;
use minijinja::context;
use rand::Rng;
use tracing::info;

use crate::context::RunContext;
use crate::core::action::ActionId;
use crate::core::status::Necessity;
use crate::io::git::Git;
use crate::io::link::link_submodule_apps;
use crate::io::paths::{SETTINGS_NAME, SOURCEME_NAME};
use crate::io::requirements::{Installer, submodule_requirement_files};
use crate::io::template::fill_template;

/// Performs an action. Failure aborts the run.
pub type ExecuteFn = fn(&RunContext) -> Result<()>;
/// Decides necessity from live state instead of a status file.
pub type NeededFn = fn(&RunContext) -> Result<Necessity>;

const SECRET_KEY_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*(-_=+)";
const SECRET_KEY_LEN: usize = 50;

/// A provisioning step bound to its routines.
#[derive(Debug, Clone, Copy)]
pub struct Action {
    pub id: ActionId,
    pub description: &'static str,
    pub requires_confirmation: bool,
    pub execute: ExecuteFn,
    pub needed: Option<NeededFn>,
}

impl Action {
    /// Action with the id's description and confirmation policy whose
    /// completion is tracked by a status file.
    pub fn new(id: ActionId, execute: ExecuteFn) -> Self {
        Self {
            id,
            description: id.description(),
            requires_confirmation: id.requires_confirmation(),
            execute,
            needed: None,
        }
    }

    /// Replace status-file tracking with a custom needed check.
    pub fn with_needed(mut self, needed: NeededFn) -> Self {
        self.needed = Some(needed);
        self
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }
}

/// The full ordered catalog.
pub fn catalog() -> Vec<Action> {
    ActionId::ALL.into_iter().map(bind).collect()
}

fn bind(id: ActionId) -> Action {
    match id {
        ActionId::GitInitSubmodules => Action::new(id, git_init_submodules),
        ActionId::GitSubmodulesMasterBranch => Action::new(id, git_submodules_master_branch),
        ActionId::LinkSubmodules => Action::new(id, link_submodules),
        ActionId::InstallSubModuleRequirements => {
            Action::new(id, install_submodule_requirements)
        }
        ActionId::InstallSiteRequirements => Action::new(id, install_site_requirements),
        ActionId::GenSourceme => Action::new(id, gen_sourceme).with_needed(need_sourceme),
        ActionId::GenSettings => Action::new(id, gen_settings).with_needed(need_settings),
    }
}

fn git_init_submodules(ctx: &RunContext) -> Result<()> {
    Git::new(&ctx.paths.root).init_submodules()
}

fn git_submodules_master_branch(ctx: &RunContext) -> Result<()> {
    // Submodule update leaves each checkout on a detached HEAD.
    Git::new(&ctx.paths.root).checkout_submodules_branch(&ctx.config.submodule_branch)
}

fn link_submodules(ctx: &RunContext) -> Result<()> {
    let created = link_submodule_apps(
        &ctx.paths.root,
        &ctx.config.submodules_dir,
        &ctx.config.apps_dir,
    )?;
    info!(links = created.len(), "linked submodule apps");
    Ok(())
}

fn install_submodule_requirements(ctx: &RunContext) -> Result<()> {
    let installer = Installer::from_env(&ctx.config.pip, &ctx.paths.root);
    for reqs in submodule_requirement_files(&ctx.paths.resolve(&ctx.config.submodules_dir))? {
        installer.install(&reqs)?;
    }
    Ok(())
}

fn install_site_requirements(ctx: &RunContext) -> Result<()> {
    let installer = Installer::from_env(&ctx.config.pip, &ctx.paths.root);
    installer.install(&ctx.paths.resolve(&ctx.config.site_requirements))
}

fn need_sourceme(ctx: &RunContext) -> Result<Necessity> {
    Ok(Necessity::from_needed(!ctx.paths.sourceme_path.exists()))
}

fn gen_sourceme(ctx: &RunContext) -> Result<()> {
    let site_dir = &ctx.paths.root;
    let parent_dir = site_dir.parent().unwrap_or(Path::new("/"));
    let apps_dir = site_dir.join(&ctx.config.apps_dir);
    let virtual_env = std::env::var("VIRTUAL_ENV").ok();

    fill_template(
        &ctx.paths.resolve(&ctx.config.templates_dir),
        SOURCEME_NAME,
        &ctx.paths.sourceme_path,
        context! {
            virtualEnvDir => virtual_env,
            parentDir => parent_dir.display().to_string(),
            appsDir => apps_dir.display().to_string(),
            siteDir => site_dir.display().to_string(),
            scriptName => ctx.config.site.script_name.as_str(),
            settingsModule => ctx.config.site.settings_module.as_str(),
        },
    )?;
    Ok(())
}

fn need_settings(ctx: &RunContext) -> Result<Necessity> {
    Ok(Necessity::from_needed(!ctx.paths.settings_path.exists()))
}

fn gen_settings(ctx: &RunContext) -> Result<()> {
    fill_template(
        &ctx.paths.resolve(&ctx.config.templates_dir),
        SETTINGS_NAME,
        &ctx.paths.settings_path,
        context! { secretKey => generate_secret_key() },
    )?;
    Ok(())
}

/// Random key for the web framework's signing (`SECRET_KEY`).
pub fn generate_secret_key() -> String {
    let mut rng = rand::thread_rng();
    std::iter::repeat_with(|| SECRET_KEY_CHARS[rng.gen_range(0..SECRET_KEY_CHARS.len())])
        .map(char::from)
        .take(SECRET_KEY_LEN)
        .collect()
}
