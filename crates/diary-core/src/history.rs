//! Incremental reader over the REPL history file.

use crate::{DiaryError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Append-only view over the history file.
///
/// Owns the read offset. The foreground session appends concurrently,
/// so each cycle reads only up to the length observed at the start of
/// the cycle and never re-reads consumed bytes.
pub struct HistorySource {
    path: PathBuf,
    offset: u64,
    /// File observed to exist at least once; a later disappearance is
    /// fatal rather than "not created yet".
    seen: bool,
}

impl HistorySource {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            offset: 0,
            seen: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Skip everything currently in the file. Called once at session
    /// start so pre-existing history is not replayed into the diary.
    pub fn skip_existing(&mut self) -> Result<()> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => {
                self.seen = true;
                self.offset = meta.len();
                debug!(
                    target: "diary::history",
                    "Starting at offset {} of {}",
                    self.offset,
                    self.path.display()
                );
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Read bytes appended since the last call and advance the offset.
    ///
    /// Returns `None` when nothing new is available. A shrunken file
    /// means external truncation or rotation: the offset resets to
    /// zero and the whole file is re-read, which may re-deliver
    /// entries already seen.
    pub fn read_new(&mut self) -> Result<Option<String>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if self.seen {
                    return Err(DiaryError::HistoryUnreadable(self.path.clone()));
                }
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        self.seen = true;

        let len = file.metadata()?.len();
        if len < self.offset {
            warn!(
                target: "diary::history",
                "History file shrank ({} -> {} bytes), rescanning from the start",
                self.offset,
                len
            );
            self.offset = 0;
        }
        if len == self.offset {
            return Ok(None);
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let mut buf = Vec::with_capacity((len - self.offset) as usize);
        file.take(len - self.offset).read_to_end(&mut buf)?;
        self.offset += buf.len() as u64;

        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
