//! Diary file location.

use diary_types::{Configuration, DiaryTarget, DisabledReason};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides the computed diary location.
/// Re-read every cycle; bypasses the blacklist.
pub const DIARY_ENV_VAR: &str = "JULIA_DIARY";

/// File that marks a project root.
pub const PROJECT_MARKER: &str = "Project.toml";

/// Walk from `start` toward the filesystem root looking for the
/// project marker. Returns the directory that contains it.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_MARKER).is_file())
        .map(Path::to_path_buf)
}

/// Compute the diary target for this cycle.
///
/// `override_path` (sourced from [`DIARY_ENV_VAR`] by the watch loop)
/// always wins, regardless of blacklist. Otherwise `directory_mode`
/// anchors the diary at the working directory, and the default
/// anchors it next to the project marker found from `cwd` upward.
/// Paths are absolute because `cwd` is.
pub fn find_diary(
    config: &Configuration,
    cwd: &Path,
    override_path: Option<&Path>,
) -> DiaryTarget {
    if let Some(path) = override_path {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        return DiaryTarget::Active(path);
    }

    let dir = if config.directory_mode {
        cwd.to_path_buf()
    } else {
        match find_project_root(cwd) {
            Some(root) => root,
            None => {
                debug!(
                    target: "diary::locate",
                    "No {} found above {}",
                    PROJECT_MARKER,
                    cwd.display()
                );
                return DiaryTarget::Disabled(DisabledReason::NoProject);
            }
        }
    };

    if is_blacklisted(&config.blacklist, &dir) {
        return DiaryTarget::Disabled(DisabledReason::Blacklisted);
    }
    DiaryTarget::Active(dir.join(&config.diary_name))
}

/// Substring match over the absolute directory path, plus an exact
/// match against its final component.
fn is_blacklisted(patterns: &[String], dir: &Path) -> bool {
    let path = dir.to_string_lossy();
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    patterns
        .iter()
        .any(|pat| !pat.is_empty() && (path.contains(pat.as_str()) || name == *pat))
}
