//! Control directives recognized in `# diary:` comments.

/// A parsed control directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiaryCommand {
    /// Commit pending entries to the diary file.
    ///
    /// `count` limits the commit to the most recent `count` entries;
    /// `None` commits the whole pending buffer. A count larger than
    /// the buffer commits everything.
    Commit { count: Option<usize> },
}
