//! `Diary.toml` resolution.
//!
//! Two layers: a global file at `~/.julia/config/Diary.toml` and a
//! project file next to `Project.toml`. The project layer wins per
//! key. `JULIA_DIARY_CONFIG` replaces the search with one explicit
//! file. Resolution runs on every watch cycle so edits take effect
//! immediately.

use crate::locate::find_project_root;
use diary_types::{ConfigOverlay, Configuration};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "JULIA_DIARY_CONFIG";

const CONFIG_FILE_NAME: &str = "Diary.toml";

/// Resolve the configuration for one watch cycle.
///
/// Never fails: a malformed or missing layer degrades to the defaults
/// for the keys it would have supplied, with a warning.
pub fn resolve_configuration(cwd: &Path) -> Configuration {
    let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    resolve_with(cwd, explicit.as_deref())
}

/// Resolution with the explicit-file override threaded in, so the
/// environment lookup stays at the edge.
pub(crate) fn resolve_with(cwd: &Path, explicit: Option<&Path>) -> Configuration {
    let mut config = Configuration::default();

    if let Some(path) = explicit {
        apply_file(&mut config, path);
        return config;
    }

    if let Some(global) = global_config_path() {
        apply_file(&mut config, &global);
    }
    if let Some(root) = find_project_root(cwd) {
        apply_file(&mut config, &root.join(CONFIG_FILE_NAME));
    }
    config
}

fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".julia").join("config").join(CONFIG_FILE_NAME))
}

fn apply_file(config: &mut Configuration, path: &Path) {
    if !path.is_file() {
        return;
    }
    match read_overlay(path) {
        Ok(overlay) => config.apply(overlay),
        Err(err) => warn!(
            target: "diary::config",
            "Ignoring malformed configuration {}: {}",
            path.display(),
            err
        ),
    }
}

fn read_overlay(path: &Path) -> crate::Result<ConfigOverlay> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
