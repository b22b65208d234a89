//! Resolved diary configuration.

use serde::Deserialize;

/// Settings governing one watch cycle.
///
/// Re-resolved from `Diary.toml` on every cycle, so a mid-session
/// edit takes effect immediately. Immutable snapshot once resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Written as part of the session header comment.
    pub author: String,
    /// Commit the pending buffer automatically at the end of every
    /// drain cycle. When false, commits happen only through the
    /// `# diary: commit [n]` directive.
    pub autocommit: bool,
    /// Path patterns that disable diary writes when they match the
    /// resolved project directory.
    pub blacklist: Vec<String>,
    /// chrono strftime pattern for the header timestamp.
    pub date_format: String,
    /// File name of the diary within the resolved directory.
    pub diary_name: String,
    /// Anchor the diary at the working directory instead of the
    /// project root.
    pub directory_mode: bool,
    /// Governs the host glue's history mirroring. Not consumed by the
    /// core pipeline.
    pub persistent_history: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            author: String::new(),
            autocommit: true,
            blacklist: default_blacklist(),
            date_format: "%A %B %d %H:%M".to_string(),
            diary_name: "diary.jl".to_string(),
            directory_mode: false,
            persistent_history: true,
        }
    }
}

impl Configuration {
    /// Apply one `Diary.toml` layer on top of this configuration.
    /// Later layers win per key.
    pub fn apply(&mut self, overlay: ConfigOverlay) {
        if let Some(author) = overlay.author {
            self.author = author;
        }
        if let Some(autocommit) = overlay.autocommit {
            self.autocommit = autocommit;
        }
        if let Some(blacklist) = overlay.blacklist {
            self.blacklist = blacklist;
        }
        if let Some(date_format) = overlay.date_format {
            self.date_format = date_format;
        }
        if let Some(diary_name) = overlay.diary_name {
            self.diary_name = diary_name;
        }
        if let Some(directory_mode) = overlay.directory_mode {
            self.directory_mode = directory_mode;
        }
        if let Some(persistent_history) = overlay.persistent_history {
            self.persistent_history = persistent_history;
        }
    }
}

/// Per-version environments are shared scratch space, not projects
/// worth a diary.
fn default_blacklist() -> Vec<String> {
    dirs::home_dir()
        .map(|home| {
            vec![
                home.join(".julia")
                    .join("environments")
                    .to_string_lossy()
                    .into_owned(),
            ]
        })
        .unwrap_or_default()
}

/// Partial configuration as deserialized from one `Diary.toml` file.
/// Unset keys fall through to the layer below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverlay {
    pub author: Option<String>,
    pub autocommit: Option<bool>,
    pub blacklist: Option<Vec<String>>,
    pub date_format: Option<String>,
    pub diary_name: Option<String>,
    pub directory_mode: Option<bool>,
    pub persistent_history: Option<bool>,
}

impl ConfigOverlay {
    /// True when no key is set.
    pub fn is_empty(&self) -> bool {
        self.author.is_none()
            && self.autocommit.is_none()
            && self.blacklist.is_none()
            && self.date_format.is_none()
            && self.diary_name.is_none()
            && self.directory_mode.is_none()
            && self.persistent_history.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Configuration::default();
        assert_eq!(config.author, "");
        assert!(config.autocommit);
        assert_eq!(config.diary_name, "diary.jl");
        assert!(!config.directory_mode);
        assert!(config.persistent_history);
    }

    #[test]
    fn overlay_overrides_only_set_keys() {
        let mut config = Configuration::default();
        config.apply(ConfigOverlay {
            author: Some("Anna".into()),
            autocommit: Some(false),
            ..Default::default()
        });
        assert_eq!(config.author, "Anna");
        assert!(!config.autocommit);
        assert_eq!(config.diary_name, "diary.jl");
    }

    #[test]
    fn empty_overlay_is_empty() {
        assert!(ConfigOverlay::default().is_empty());
        let overlay = ConfigOverlay {
            diary_name: Some("notes.jl".into()),
            ..Default::default()
        };
        assert!(!overlay.is_empty());
    }
}
