//! Splits raw FTT source text into classified logical lines.
//!
//! Grounded in the cursor shape of a classic hand-rolled line scanner (an explicit
//! line counter plus a classify-then-dispatch loop), but line-oriented rather than
//! level-number oriented: FTT has no `level` token, so each physical line is
//! classified independently by its first bytes and indentation (spec §4.1).

/// One classified physical line of FTT source, with its 1-based line number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogicalLine<'a> {
    /// `#` at column 0.
    Comment,
    /// `---` at column 0.
    BlockTerminator,
    /// Empty or whitespace-only line.
    Blank,
    /// Exactly two leading spaces; `rest` is everything after them, untouched.
    Continuation { rest: &'a str },
    /// `KEY: value` or `KEY:` at column 0.
    KeyLine { key: &'a str, value: &'a str },
    /// Anything else at column 0.
    Invalid,
}

/// Splits `text` into `(line_number, raw_line)` pairs, treating CR, LF, and CRLF as
/// line terminators.
pub fn split_lines(text: &str) -> Vec<(u32, &str)> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0usize;
    let mut i = 0usize;
    let mut line_no = 1u32;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push((line_no, &text[start..i]));
                line_no += 1;
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push((line_no, &text[start..i]));
                line_no += 1;
                i += 1;
                if i < bytes.len() && bytes[i] == b'\n' {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push((line_no, &text[start..]));
    }
    lines
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
}

/// Classifies a single raw line (with no trailing line terminator). Blank-line
/// detection runs before indent detection, per spec §4.1 point 4, so a two-space
/// blank line is a paragraph break rather than a continuation.
#[must_use]
pub fn classify(raw: &str) -> LogicalLine<'_> {
    if raw.trim().is_empty() {
        return LogicalLine::Blank;
    }
    if raw.starts_with('#') {
        return LogicalLine::Comment;
    }
    if raw.starts_with("---") {
        return LogicalLine::BlockTerminator;
    }
    if let Some(rest) = raw.strip_prefix("  ") {
        return LogicalLine::Continuation { rest };
    }
    if let Some(colon) = find_key_colon(raw) {
        let key = &raw[..colon];
        let after = &raw[colon + 1..];
        let value = after
            .strip_prefix(' ')
            .or_else(|| after.strip_prefix('\t'))
            .map(str::trim_start)
            .unwrap_or(after);
        if after.is_empty() || after.starts_with(' ') || after.starts_with('\t') {
            return LogicalLine::KeyLine { key, value };
        }
    }
    LogicalLine::Invalid
}

/// Finds the index of the `:` terminating a valid `[A-Z0-9_]+` key at column 0, if
/// the whole prefix matches `/^([A-Z0-9_]+):(?:[ \t]+(.*))?$/`.
fn find_key_colon(raw: &str) -> Option<usize> {
    let mut chars = raw.char_indices();
    let mut last_key_end = None;
    for (idx, c) in &mut chars {
        if c == ':' {
            last_key_end = Some(idx);
            break;
        }
        if !is_key_char(c) {
            return None;
        }
    }
    let colon = last_key_end?;
    if colon == 0 {
        return None;
    }
    Some(colon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_mixed_line_endings() {
        let text = "a\nb\r\nc\rd";
        let lines: Vec<&str> = split_lines(text).into_iter().map(|(_, l)| l).collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn classifies_key_line_with_value() {
        match classify("NAME: Jane Doe") {
            LogicalLine::KeyLine { key, value } => {
                assert_eq!(key, "NAME");
                assert_eq!(value, "Jane Doe");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn classifies_key_line_without_value() {
        match classify("SEX:") {
            LogicalLine::KeyLine { key, value } => {
                assert_eq!(key, "SEX");
                assert_eq!(value, "");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn two_space_blank_is_blank_not_continuation() {
        assert_eq!(classify("  "), LogicalLine::Blank);
        assert_eq!(classify("   "), LogicalLine::Blank);
    }

    #[test]
    fn continuation_strips_exactly_two_spaces() {
        match classify("  more text") {
            LogicalLine::Continuation { rest } => assert_eq!(rest, "more text"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn comment_and_terminator() {
        assert_eq!(classify("# a comment"), LogicalLine::Comment);
        assert_eq!(classify("---"), LogicalLine::BlockTerminator);
        assert_eq!(classify("----"), LogicalLine::BlockTerminator);
    }

    #[test]
    fn garbage_at_column_zero_is_invalid() {
        assert_eq!(classify("lowercase not a key"), LogicalLine::Invalid);
        assert_eq!(classify("NAME no colon"), LogicalLine::Invalid);
    }
}
