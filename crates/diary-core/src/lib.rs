//! Watch-parse-commit pipeline for the REPL diary.
//!
//! A long-lived background task observes the Julia REPL history file,
//! segments new content into logical entries, classifies each entry,
//! and appends accepted entries to the `diary.jl` file of the active
//! project. See [`DiaryWatcher`] for the top-level driver.

mod classify;
mod command;
mod commit;
mod config;
mod error;
mod history;
mod locate;
mod segment;
mod watch;

pub use classify::{Classification, classify};
pub use command::parse_command;
pub use commit::CommitEngine;
pub use config::{CONFIG_ENV_VAR, resolve_configuration};
pub use error::DiaryError;
pub use history::HistorySource;
pub use locate::{DIARY_ENV_VAR, PROJECT_MARKER, find_diary, find_project_root};
pub use segment::Segmenter;
pub use watch::{DiaryWatcher, WatchHandle, WatchOptions};

/// Result type for diary operations.
pub type Result<T> = std::result::Result<T, DiaryError>;
