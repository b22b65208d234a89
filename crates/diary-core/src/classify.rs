//! Entry classification: buffer, ignore, or interpret as a command.

use diary_types::{Entry, EntryMode};
use once_cell::sync::Lazy;
use regex::Regex;

/// Recognizes the `# diary:` directive comment and captures the text
/// after the prefix.
static COMMAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s*diary:\s*(.*)$").expect("valid regex"));

/// Outcome of classifying one entry candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Primary-mode entry, to be buffered for commit.
    Accepted(Entry),
    /// Auxiliary-mode entry, dropped.
    Ignored,
    /// A `# diary:` directive; carries the text after the prefix.
    Command(String),
}

/// Classify an entry candidate.
///
/// Directive detection takes priority over plain acceptance, and only
/// applies to single-line primary-mode entries: directives are typed
/// at the `julia>` prompt as one comment line.
pub fn classify(entry: Entry) -> Classification {
    if entry.mode == EntryMode::Auxiliary {
        return Classification::Ignored;
    }
    if !entry.text.contains('\n') {
        if let Some(caps) = COMMAND_RE.captures(&entry.text) {
            return Classification::Command(caps[1].trim().to_string());
        }
    }
    Classification::Accepted(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_entries_are_accepted() {
        let entry = Entry::new("1 + 1", EntryMode::Primary);
        assert_eq!(classify(entry.clone()), Classification::Accepted(entry));
    }

    #[test]
    fn auxiliary_entries_are_ignored() {
        let entry = Entry::new("?println", EntryMode::Auxiliary);
        assert_eq!(classify(entry), Classification::Ignored);
    }

    #[test]
    fn directive_comments_win_over_acceptance() {
        let entry = Entry::new("# diary: commit 3", EntryMode::Primary);
        assert_eq!(
            classify(entry),
            Classification::Command("commit 3".to_string())
        );
    }

    #[test]
    fn directive_prefix_tolerates_spacing() {
        let entry = Entry::new("#diary:commit", EntryMode::Primary);
        assert_eq!(classify(entry), Classification::Command("commit".to_string()));
    }

    #[test]
    fn plain_comments_are_accepted_entries() {
        let entry = Entry::new("# just a note", EntryMode::Primary);
        assert!(matches!(classify(entry), Classification::Accepted(_)));
    }

    #[test]
    fn multi_line_entries_are_never_directives() {
        let entry = Entry::new("# diary: commit\nx = 1", EntryMode::Primary);
        assert!(matches!(classify(entry), Classification::Accepted(_)));
    }
}
