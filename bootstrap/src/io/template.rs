//! One-shot generation of files from templates.
//!
//! Generated files are owned by the operator once written: if the output
//! already exists it is left alone, so manual edits survive re-runs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use minijinja::Environment;
use serde::Serialize;
use tracing::{debug, info, warn};

const BUILTIN_SOURCEME: &str = include_str!("../templates/sourceme.sh");
const BUILTIN_SETTINGS: &str = include_str!("../templates/settings.py");

/// Result of [`fill_template`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    Written,
    /// Output already existed and was not touched.
    Kept,
}

/// Source text of template `name`: `<templates_dir>/<name>` when the site
/// provides one, otherwise the built-in default.
pub fn load_template(templates_dir: &Path, name: &str) -> Result<String> {
    let site_template = templates_dir.join(name);
    if site_template.is_file() {
        debug!(path = %site_template.display(), "using site template");
        return fs::read_to_string(&site_template)
            .with_context(|| format!("read template {}", site_template.display()));
    }
    let builtin = match name {
        "sourceme.sh" => BUILTIN_SOURCEME,
        "settings.py" => BUILTIN_SETTINGS,
        _ => anyhow::bail!(
            "template {} not found and no built-in default exists",
            site_template.display()
        ),
    };
    debug!(name, "using built-in template");
    Ok(builtin.to_string())
}

/// Render template `name` into `output` unless `output` already exists.
pub fn fill_template<C: Serialize>(
    templates_dir: &Path,
    name: &str,
    output: &Path,
    context: C,
) -> Result<FillOutcome> {
    if output.exists() {
        warn!(
            "WARNING: File {} exists, not overwriting. Move current version out of the way to regenerate",
            output.display()
        );
        return Ok(FillOutcome::Kept);
    }

    info!("generating {}", output.display());
    let source = load_template(templates_dir, name)?;
    let text = render(&source, context).with_context(|| format!("render template {name}"))?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(output, text).with_context(|| format!("write {}", output.display()))?;
    Ok(FillOutcome::Written)
}

fn render<C: Serialize>(source: &str, context: C) -> Result<String> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    Ok(env.render_str(source, context)?)
}
