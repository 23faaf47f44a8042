//! Shared text transforms: Unicode normalization, escape handling, and the
//! pipe-segment grammar used throughout field and modifier values (spec §4.1).
use unicode_normalization::UnicodeNormalization;

/// NFC-normalizes a string. IDs and every pipe segment are stored NFC-normalized so
/// that lookups compare NFC-to-NFC (spec §3.2).
#[must_use]
pub fn nfc(s: &str) -> String {
    s.nfc().collect()
}

/// Splits `text` into pipe-delimited segments, each trimmed and NFC-normalized.
/// `\` escapes the next character literally, supporting `\|`, `\\`, `\;`, `\{`,
/// `\}`, `\<`, `\>` (spec §4.1, §6.1). An unescaped `|` ends a segment.
#[must_use]
pub fn split_pipe_segments(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '|' | '\\' | ';' | '{' | '}' | '<' | '>') {
                    current.push(next);
                    chars.next();
                    continue;
                }
            }
            current.push(c);
        } else if c == '|' {
            segments.push(nfc(current.trim()));
            current.clear();
        } else {
            current.push(c);
        }
    }
    segments.push(nfc(current.trim()));
    segments
}

/// Re-escapes a single segment's delimiter-significant characters so that
/// `split_pipe_segments` run on the joined-with-`|` output returns the original
/// segments (spec §8, testable property 7).
#[must_use]
pub fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        if matches!(c, '|' | '\\' | ';' | '{' | '}' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Joins segments with `|`, escaping each first.
#[must_use]
pub fn join_pipe_segments(segments: &[String]) -> String {
    segments
        .iter()
        .map(|s| escape_segment(s))
        .collect::<Vec<_>>()
        .join("|")
}

/// Extracts the longest leading `YYYY(-MM(-DD)?)?` substring of `text`, used by the
/// post-processor's chronological sort key (spec §4.3.2). Returns `None` if no such
/// prefix exists.
#[must_use]
pub fn leading_date_key(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    if bytes.len() < 4 || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut end = 4;
    if bytes.len() >= 7 && bytes[4] == b'-' && bytes[5..7].iter().all(u8::is_ascii_digit) {
        end = 7;
        if bytes.len() >= 10 && bytes[7] == b'-' && bytes[8..10].iter().all(u8::is_ascii_digit) {
            end = 10;
        }
    }
    Some(text[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_split_basic() {
        let segs = split_pipe_segments("a | b |c");
        assert_eq!(segs, vec!["a", "b", "c"]);
    }

    #[test]
    fn pipe_split_escaped_delimiter() {
        let segs = split_pipe_segments(r"a\|b | c");
        assert_eq!(segs, vec!["a|b", "c"]);
    }

    #[test]
    fn pipe_split_empty_interior_and_trailing() {
        let segs = split_pipe_segments("a||b|");
        assert_eq!(segs, vec!["a", "", "b", ""]);
    }

    #[test]
    fn roundtrip_escape_then_split() {
        let original = vec!["a|b".to_string(), "c\\d".to_string(), "plain".to_string()];
        let joined = join_pipe_segments(&original);
        let parsed = split_pipe_segments(&joined);
        assert_eq!(parsed, original);
    }

    #[test]
    fn leading_date_key_extracts_prefix() {
        assert_eq!(leading_date_key("1900-05-03 extra"), Some("1900-05-03".into()));
        assert_eq!(leading_date_key("1900-05 extra"), Some("1900-05".into()));
        assert_eq!(leading_date_key("1900"), Some("1900".into()));
        assert_eq!(leading_date_key("??"), None);
    }
}
