//! `# diary:` directive parsing.

use crate::{DiaryError, Result};
use diary_types::DiaryCommand;

/// Parse the text that follows the directive prefix.
///
/// The only recognized directive is `commit`, optionally followed by
/// a non-negative integer count. Anything else is an
/// [`DiaryError::UnrecognizedCommand`], which the watch loop logs and
/// discards without writing the comment to the diary.
pub fn parse_command(text: &str) -> Result<DiaryCommand> {
    let mut words = text.split_whitespace();
    match words.next() {
        Some("commit") => {
            let count = match words.next() {
                Some(arg) => Some(
                    arg.parse::<usize>()
                        .map_err(|_| DiaryError::UnrecognizedCommand(text.to_string()))?,
                ),
                None => None,
            };
            if words.next().is_some() {
                return Err(DiaryError::UnrecognizedCommand(text.to_string()));
            }
            Ok(DiaryCommand::Commit { count })
        }
        _ => Err(DiaryError::UnrecognizedCommand(text.to_string())),
    }
}
