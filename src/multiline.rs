//! Distribution of long text over a fixed set of single-line placeholders

use crate::error::{Error, Result};
use crate::validate::require_at_least;

/// How computed lines are assigned to placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// First line goes to the first placeholder, trailing placeholders stay empty
    #[default]
    Top,
    /// Last line goes to the last placeholder, leading placeholders stay empty
    Bottom,
}

/// Word-wrap `text` into exactly `line_count` lines of at most `max_chars` characters
///
/// Words are separated by runs of whitespace. Each line is filled greedily: a
/// word is appended while the line so far (words plus one separating space
/// each) plus the word stays within `max_chars`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `line_count < 2`, `max_chars < 1`,
/// the text is longer than `line_count * max_chars` characters, or the words
/// cannot be packed into the available lines.
///
/// # Example
///
/// ```
/// use pdf_templater::multiline::{distribute, FillMode};
///
/// let lines = distribute("Lucy in the sky with diamonds", 20, 2, FillMode::Top).unwrap();
/// assert_eq!(lines, vec!["Lucy in the sky with", "diamonds"]);
/// ```
pub fn distribute(
    text: &str,
    max_chars: usize,
    line_count: usize,
    fill_mode: FillMode,
) -> Result<Vec<String>> {
    require_at_least("line count", line_count, 2)?;
    require_at_least("maximum characters per line", max_chars, 1)?;

    let capacity = line_count.saturating_mul(max_chars);
    let length = text.chars().count();
    if length > capacity {
        return Err(Error::InvalidArgument(format!(
            "Text of {} characters does not fit into {} lines of {} characters",
            length, line_count, max_chars
        )));
    }

    let lines = pack_lines(text, max_chars, line_count)?;

    Ok(match fill_mode {
        FillMode::Top => lines,
        FillMode::Bottom => align_bottom(lines),
    })
}

fn pack_lines(text: &str, max_chars: usize, line_count: usize) -> Result<Vec<String>> {
    let mut words = text.split_whitespace().peekable();
    let mut lines = Vec::with_capacity(line_count);

    for _ in 0..line_count {
        let mut line = String::new();
        let mut line_len = 0;

        while let Some(word) = words.peek() {
            let word_len = word.chars().count();
            if line_len + word_len > max_chars {
                break;
            }
            line.push_str(word);
            line.push(' ');
            line_len += word_len + 1;
            words.next();
        }

        if line.ends_with(' ') {
            line.pop();
        }
        lines.push(line);
    }

    if let Some(word) = words.next() {
        return Err(Error::InvalidArgument(format!(
            "Text does not fit into {} lines of {} characters due to word lengths, \
             starting at word {:?}",
            line_count, max_chars, word
        )));
    }

    Ok(lines)
}

fn align_bottom(lines: Vec<String>) -> Vec<String> {
    let total = lines.len();
    let filled: Vec<String> = lines.into_iter().filter(|line| !line.is_empty()).collect();

    let mut aligned = vec![String::new(); total - filled.len()];
    aligned.extend(filled);
    aligned
}
