//! Splits raw history bytes into logical entries.
//!
//! The Julia REPL history format records one submission as:
//!
//! ```text
//! # time: 2024-05-01 12:00:00 CET
//! # mode: julia
//! \tfor i in 1:3
//! \t    println(i)
//! \tend
//! ```
//!
//! A `# time:` line delimits records; `# mode:` tags the mode the
//! statement was entered in; content lines carry one leading tab.

use diary_types::{Entry, EntryMode};

/// Line prefix that starts a new record.
const RECORD_HEADER: &str = "# time";
/// Line prefix that tags the record's mode.
const MODE_HEADER: &str = "# mode:";

/// Stateful segmenter over appended history chunks.
///
/// Carries an incomplete trailing line between chunks so a read that
/// races a concurrent append never corrupts an entry. A multi-line
/// record split across two reads exactly at a line boundary is
/// emitted in two parts; the REPL appends records atomically, so in
/// practice this only happens after external truncation.
pub struct Segmenter {
    partial_line: String,
    pending_lines: Vec<String>,
    current_mode: EntryMode,
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            partial_line: String::new(),
            pending_lines: Vec::new(),
            current_mode: EntryMode::Primary,
        }
    }

    /// Consume one appended chunk and produce the entries completed
    /// by it. Empty or whitespace-only records are discarded.
    pub fn feed(&mut self, chunk: &str) -> Vec<Entry> {
        let mut out = Vec::new();

        self.partial_line.push_str(chunk);
        let buffered = std::mem::take(&mut self.partial_line);

        let mut lines: Vec<&str> = buffered.split('\n').collect();
        // split always yields a final piece: empty if the chunk ended
        // at a line boundary, otherwise an incomplete line to carry.
        let tail = lines.pop().unwrap_or_default();
        self.partial_line = tail.to_string();

        for line in lines {
            self.feed_line(line, &mut out);
        }

        // A chunk ending at a line boundary ends a record: the REPL
        // flushes whole records, so flushing here keeps latency at one
        // cycle instead of waiting for the next record's header.
        if self.partial_line.is_empty() {
            self.flush_record(&mut out);
        }

        out
    }

    fn feed_line(&mut self, line: &str, out: &mut Vec<Entry>) {
        if line.starts_with(RECORD_HEADER) {
            self.flush_record(out);
        } else if let Some(mode) = line.strip_prefix(MODE_HEADER) {
            self.current_mode = EntryMode::from_mode_name(mode);
        } else {
            let content = line.strip_prefix('\t').unwrap_or(line);
            self.pending_lines.push(content.to_string());
        }
    }

    fn flush_record(&mut self, out: &mut Vec<Entry>) {
        if self.pending_lines.is_empty() {
            return;
        }
        let text = strip_trailing_semicolons(&self.pending_lines.join("\n"));
        self.pending_lines.clear();
        if !text.trim().is_empty() {
            out.push(Entry::new(text, self.current_mode));
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip trailing whitespace and statement-terminating semicolons.
fn strip_trailing_semicolons(text: &str) -> String {
    let mut s = text;
    loop {
        let trimmed = s.trim_end().trim_end_matches(';');
        if trimmed.len() == s.len() {
            break;
        }
        s = trimmed;
    }
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(mode: &str, lines: &[&str]) -> String {
        let mut s = format!("# time: 2024-05-01 12:00:00 CET\n# mode: {mode}\n");
        for line in lines {
            s.push('\t');
            s.push_str(line);
            s.push('\n');
        }
        s
    }

    #[test]
    fn single_record() {
        let mut seg = Segmenter::new();
        let entries = seg.feed(&record("julia", &["1 + 1"]));
        assert_eq!(entries, vec![Entry::new("1 + 1", EntryMode::Primary)]);
    }

    #[test]
    fn multi_line_record_keeps_inner_structure() {
        let mut seg = Segmenter::new();
        let entries = seg.feed(&record("julia", &["for i in 1:3", "    println(i)", "end"]));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "for i in 1:3\n    println(i)\nend");
    }

    #[test]
    fn trailing_semicolon_is_stripped() {
        let mut seg = Segmenter::new();
        let entries = seg.feed(&record("julia", &["2 + 2;"]));
        assert_eq!(entries[0].text, "2 + 2");

        let mut seg = Segmenter::new();
        let entries = seg.feed(&record("julia", &["f(x); ;"]));
        assert_eq!(entries[0].text, "f(x)");
    }

    #[test]
    fn semicolons_only_record_is_dropped() {
        let mut seg = Segmenter::new();
        assert!(seg.feed(&record("julia", &[";"])).is_empty());
        assert!(seg.feed(&record("julia", &["   "])).is_empty());
    }

    #[test]
    fn auxiliary_modes_are_tagged() {
        let mut seg = Segmenter::new();
        let text = [
            record("shell", &["ls"]),
            record("help", &["println"]),
            record("julia", &["1"]),
        ]
        .concat();
        let entries = seg.feed(&text);
        assert_eq!(
            entries.iter().map(|e| e.mode).collect::<Vec<_>>(),
            vec![EntryMode::Auxiliary, EntryMode::Auxiliary, EntryMode::Primary]
        );
    }

    #[test]
    fn incomplete_line_is_carried_across_feeds() {
        let mut seg = Segmenter::new();
        let full = record("julia", &["x = 41 + 1"]);
        let (a, b) = full.split_at(full.len() - 5);
        assert!(seg.feed(a).is_empty());
        let entries = seg.feed(b);
        assert_eq!(entries, vec![Entry::new("x = 41 + 1", EntryMode::Primary)]);
    }

    #[test]
    fn feeding_nothing_yields_nothing() {
        let mut seg = Segmenter::new();
        seg.feed(&record("julia", &["1 + 1"]));
        assert!(seg.feed("").is_empty());
    }

    proptest! {
        /// One entry per record whose content is non-empty after
        /// stripping; empty and whitespace-only records yield none.
        #[test]
        fn entry_count_matches_nonempty_records(
            contents in prop::collection::vec("[a-z0-9+ ]{0,12}", 0..16)
        ) {
            let text: String = contents
                .iter()
                .map(|c| record("julia", &[c.as_str()]))
                .collect();
            let expected = contents
                .iter()
                .filter(|c| !c.trim().is_empty())
                .count();

            let mut seg = Segmenter::new();
            prop_assert_eq!(seg.feed(&text).len(), expected);
        }
    }
}
