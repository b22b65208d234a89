//! Error types for the diary pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiaryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Unrecognized diary command: {0:?}")]
    UnrecognizedCommand(String),

    #[error("File watch error: {0}")]
    Watch(String),

    #[error("History file unreadable: {0}")]
    HistoryUnreadable(PathBuf),
}

impl From<notify::Error> for DiaryError {
    fn from(err: notify::Error) -> Self {
        DiaryError::Watch(err.to_string())
    }
}

impl DiaryError {
    /// Errors that stop the watch loop rather than being retried on
    /// the next cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DiaryError::HistoryUnreadable(_))
    }
}
