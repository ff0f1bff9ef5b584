//! Symlinking submodule apps into a single import directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// One app found inside a submodule checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleApp {
    /// Directory name, also the link name under the apps dir.
    pub name: String,
    /// App directory relative to the site root (`submodules/<sub>/<app>`).
    pub relative_dir: PathBuf,
}

/// Find app directories two levels below `submodules_dir` that contain a
/// `models*` entry (a `models/` package or a `models.py` module).
pub fn find_submodule_apps(site_root: &Path, submodules_dir: &Path) -> Result<Vec<SubmoduleApp>> {
    let abs_submodules = site_root.join(submodules_dir);
    let mut apps = Vec::new();
    for submodule in sorted_subdirs(&abs_submodules)? {
        for app_dir in sorted_subdirs(&submodule)? {
            if !has_models_entry(&app_dir)? {
                continue;
            }
            let Some(name) = app_dir.file_name().map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };
            let relative_dir = app_dir
                .strip_prefix(site_root)
                .with_context(|| format!("app dir {} outside site", app_dir.display()))?
                .to_path_buf();
            apps.push(SubmoduleApp { name, relative_dir });
        }
    }
    Ok(apps)
}

/// Create `<apps_dir>/<app>` -> `../<submodules>/<sub>/<app>` for each app.
/// Link targets are relative so the site directory can be moved.
///
/// Existing entries (including dangling links) are left as they are.
/// Returns the links created.
pub fn link_submodule_apps(
    site_root: &Path,
    submodules_dir: &Path,
    apps_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let abs_apps = site_root.join(apps_dir);
    fs::create_dir_all(&abs_apps)
        .with_context(|| format!("create directory {}", abs_apps.display()))?;

    let up_to_root: PathBuf = apps_dir
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .map(|_| "..")
        .collect();
    let mut created = Vec::new();
    for app in find_submodule_apps(site_root, submodules_dir)? {
        let target = up_to_root.join(&app.relative_dir);
        let dst = abs_apps.join(&app.name);
        if dst.symlink_metadata().is_ok() {
            debug!(
                "  {} -> {} skipped (already exists)",
                dst.display(),
                target.display()
            );
            continue;
        }
        debug!("  {} -> {}", dst.display(), target.display());
        symlink_dir(&target, &dst)
            .with_context(|| format!("link {} -> {}", dst.display(), target.display()))?;
        created.push(dst);
    }
    Ok(created)
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.context("read directory entry")?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn has_models_entry(dir: &Path) -> Result<bool> {
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.context("read directory entry")?;
        if entry.file_name().to_string_lossy().starts_with("models") {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, "").expect("write");
    }

    fn sample_site(root: &Path) {
        touch(&root.join("submodules/geocamUtil/geocamUtil/models.py"));
        fs::create_dir_all(root.join("submodules/mapSet/geocamMapSet/models")).expect("mkdir");
        touch(&root.join("submodules/mapSet/docs/index.txt"));
    }

    #[test]
    fn finds_only_dirs_with_models() {
        let temp = tempfile::tempdir().expect("tempdir");
        sample_site(temp.path());

        let apps = find_submodule_apps(temp.path(), Path::new("submodules")).expect("find");
        let names: Vec<&str> = apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["geocamUtil", "geocamMapSet"]);
        assert_eq!(
            apps[1].relative_dir,
            PathBuf::from("submodules/mapSet/geocamMapSet")
        );
    }

    #[cfg(unix)]
    #[test]
    fn links_are_relative_and_idempotent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        sample_site(root);

        let created = link_submodule_apps(root, Path::new("submodules"), Path::new("apps"))
            .expect("link");
        assert_eq!(created.len(), 2);

        let target = fs::read_link(root.join("apps/geocamUtil")).expect("read link");
        assert_eq!(target, PathBuf::from("../submodules/geocamUtil/geocamUtil"));
        assert!(root.join("apps/geocamUtil/models.py").is_file());

        let again = link_submodule_apps(root, Path::new("submodules"), Path::new("apps"))
            .expect("relink");
        assert!(again.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_is_left_alone() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        sample_site(root);
        fs::create_dir_all(root.join("apps")).expect("mkdir");
        std::os::unix::fs::symlink("../nowhere", root.join("apps/geocamUtil")).expect("symlink");

        let created = link_submodule_apps(root, Path::new("submodules"), Path::new("apps"))
            .expect("link");
        assert_eq!(created, vec![root.join("apps/geocamMapSet")]);
        assert_eq!(
            fs::read_link(root.join("apps/geocamUtil")).expect("read link"),
            PathBuf::from("../nowhere")
        );
    }

    #[cfg(unix)]
    #[test]
    fn dotted_apps_dir_links_back_into_the_site() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        sample_site(root);

        link_submodule_apps(root, Path::new("submodules"), Path::new("./apps/")).expect("link");
        let target = fs::read_link(root.join("apps/geocamUtil")).expect("read link");
        assert_eq!(target, PathBuf::from("../submodules/geocamUtil/geocamUtil"));
        assert!(root.join("apps/geocamUtil/models.py").is_file());

        link_submodule_apps(root, Path::new("submodules"), Path::new("lib/apps")).expect("link");
        let target = fs::read_link(root.join("lib/apps/geocamUtil")).expect("read link");
        assert_eq!(
            target,
            PathBuf::from("../../submodules/geocamUtil/geocamUtil")
        );
        assert!(root.join("lib/apps/geocamMapSet/models").is_dir());
    }

    #[test]
    fn missing_submodules_dir_links_nothing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let created = link_submodule_apps(temp.path(), Path::new("submodules"), Path::new("apps"))
            .expect("link");
        assert!(created.is_empty());
        assert!(temp.path().join("apps").is_dir());
    }
}
