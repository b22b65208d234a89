//! The resolved diary location for one watch cycle.

use std::path::{Path, PathBuf};

/// Why diary writes are suppressed this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledReason {
    /// The resolved project directory matched a blacklist pattern.
    Blacklisted,
    /// No project marker between the working directory and the
    /// filesystem root.
    NoProject,
}

/// Where (or whether) the current cycle may write.
///
/// Recomputed every cycle; never cached across a directory or
/// project change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiaryTarget {
    /// Writes go to this absolute path.
    Active(PathBuf),
    /// Writes are suppressed; classification still runs.
    Disabled(DisabledReason),
}

impl DiaryTarget {
    /// The writable path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DiaryTarget::Active(path) => Some(path),
            DiaryTarget::Disabled(_) => None,
        }
    }
}
