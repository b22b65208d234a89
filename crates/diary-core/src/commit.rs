//! Appends accepted entries to the diary file.

use crate::Result;
use chrono::Local;
use diary_types::{Configuration, Entry};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes entries to the resolved diary file, emitting a session
/// header whenever the target differs from the last successful write.
pub struct CommitEngine {
    last_target: Option<PathBuf>,
}

impl CommitEngine {
    pub fn new() -> Self {
        Self { last_target: None }
    }

    /// Append `entries` to `target`, each terminated by a newline so
    /// the diary stays a valid sequence of statements.
    ///
    /// The file handle is scoped to this call: open for append,
    /// write, flush, close. On error the caller keeps its pending
    /// buffer, so the same entries are retried on the next trigger
    /// (at-least-once; a crash between write and buffer-clear may
    /// duplicate entries).
    pub fn commit(
        &mut self,
        entries: &[Entry],
        target: &Path,
        config: &Configuration,
        with_header: bool,
    ) -> Result<()> {
        let header_due = with_header && self.last_target.as_deref() != Some(target);
        if entries.is_empty() && !header_due {
            return Ok(());
        }

        // Rendered before the file is opened so a malformed
        // date_format surfaces as an error instead of a partially
        // written header line.
        let header = if header_due {
            Some(render_header(config)?)
        } else {
            None
        };

        let mut file = OpenOptions::new().create(true).append(true).open(target)?;

        if let Some(header) = &header {
            let had_content = file.metadata()?.len() > 0;
            if had_content {
                writeln!(file)?;
            }
            writeln!(file, "{header}")?;
        }

        for entry in entries {
            writeln!(file, "{}", entry.text)?;
        }
        file.flush()?;

        self.last_target = Some(target.to_path_buf());
        info!(
            target: "diary::commit",
            "Committed {} entries to {}",
            entries.len(),
            target.display()
        );
        Ok(())
    }
}

impl Default for CommitEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the session header comment line.
fn render_header(config: &Configuration) -> Result<String> {
    use std::fmt::Write as _;

    let mut timestamp = String::new();
    write!(timestamp, "{}", Local::now().format(&config.date_format)).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid date_format {:?}", config.date_format),
        )
    })?;

    if config.author.is_empty() {
        Ok(format!("# {timestamp}"))
    } else {
        Ok(format!("# {}: {timestamp}", config.author))
    }
}
