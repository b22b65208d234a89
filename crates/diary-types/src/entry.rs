//! History entries and their originating REPL mode.

use serde::{Deserialize, Serialize};

/// The REPL mode a history record was entered in.
///
/// The history file tags every record with the host mode name
/// (`julia`, `help`, `pkg`, `shell`, ...). Downstream only the
/// distinction between the primary language prompt and everything
/// else matters, so the name is collapsed into a closed variant at
/// ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryMode {
    /// Entered at the primary `julia>` prompt.
    Primary,
    /// Entered in an auxiliary mode (help, package manager, shell).
    Auxiliary,
}

impl EntryMode {
    /// Map a history-file mode name to a variant.
    pub fn from_mode_name(name: &str) -> Self {
        match name.trim() {
            "julia" => EntryMode::Primary,
            _ => EntryMode::Auxiliary,
        }
    }
}

/// One logical statement extracted from the history source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Statement text with record formatting and any trailing
    /// semicolons stripped. May span multiple lines.
    pub text: String,
    /// Mode the statement was entered in.
    pub mode: EntryMode,
}

impl Entry {
    pub fn new(text: impl Into<String>, mode: EntryMode) -> Self {
        Self {
            text: text.into(),
            mode,
        }
    }
}
