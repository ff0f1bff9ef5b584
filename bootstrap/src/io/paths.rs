//! Canonical paths within a site directory.

use std::path::{Path, PathBuf};

use crate::core::action::ActionId;

pub const SOURCEME_NAME: &str = "sourceme.sh";
pub const SETTINGS_NAME: &str = "settings.py";

/// Key of the whole-run completion marker in the status directory.
const OVERALL_STATUS_KEY: &str = "bootstrap";

/// All fixed paths the bootstrap reads or writes for a site.
#[derive(Debug, Clone)]
pub struct SitePaths {
    pub root: PathBuf,
    status_dir: PathBuf,
    pub overall_status_path: PathBuf,
    pub config_path: PathBuf,
    pub sourceme_path: PathBuf,
    pub settings_path: PathBuf,
}

impl SitePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let management_dir = root.join("management");
        let status_dir = root.join("build").join("management").join("bootstrap");
        Self {
            overall_status_path: status_dir.join(status_file_name(OVERALL_STATUS_KEY)),
            config_path: management_dir.join("bootstrap.toml"),
            sourceme_path: root.join(SOURCEME_NAME),
            settings_path: root.join(SETTINGS_NAME),
            root,
            status_dir,
        }
    }

    /// Status file for one action: `<status_dir>/<actionName>Status.txt`.
    pub fn status_path(&self, id: ActionId) -> PathBuf {
        self.status_dir.join(status_file_name(id.name()))
    }

    /// Resolve a config-relative path against the site root.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}

fn status_file_name(key: &str) -> String {
    format!("{key}Status.txt")
}

/// Default site directory: the nearest ancestor of the running executable
/// that contains a `management/` directory, else the current directory.
pub fn default_site_dir() -> PathBuf {
    let from_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| find_site_root(&exe));
    match from_exe {
        Some(dir) => dir,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn find_site_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .skip(1)
        .find(|dir| dir.join("management").is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_layout_matches_action_names() {
        let paths = SitePaths::new("/site");
        assert_eq!(
            paths.status_path(ActionId::GitInitSubmodules),
            PathBuf::from("/site/build/management/bootstrap/gitInitSubmodulesStatus.txt")
        );
        assert_eq!(
            paths.overall_status_path,
            PathBuf::from("/site/build/management/bootstrap/bootstrapStatus.txt")
        );
        assert_eq!(paths.sourceme_path, PathBuf::from("/site/sourceme.sh"));
        assert_eq!(
            paths.config_path,
            PathBuf::from("/site/management/bootstrap.toml")
        );
    }

    #[test]
    fn site_root_is_found_above_executable() {
        let temp = tempfile::tempdir().expect("tempdir");
        let site = temp.path().join("site");
        std::fs::create_dir_all(site.join("management").join("bin")).expect("mkdir");
        let exe = site.join("management").join("bin").join("bootstrap");

        assert_eq!(find_site_root(&exe), Some(site));
    }

    #[test]
    fn no_site_root_without_management_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let exe = temp.path().join("bin").join("bootstrap");
        assert_eq!(find_site_root(&exe), None);
    }
}
