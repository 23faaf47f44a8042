//! Place-expression parsing (spec §4.3.3).
#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

/// Parsed metadata for a place-bearing segment (`BORN[1]`, `DIED[1]`, `EVENT[3]`,
/// `PLACE[0]`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Place {
    /// Raw text with `{=…}` aliases and `<lat,long>` coordinates stripped.
    pub display: String,
    /// Raw text with each `X {=Y}` replaced by `Y`, coordinates stripped.
    pub geo_alias: String,
    /// `"<lat, lon>"` verbatim, if present.
    pub coords: Option<String>,
}

/// Parses a raw place segment. Returns `None` if the raw text contains neither
/// `{=` nor `<`, meaning there is no metadata to extract beyond the raw text
/// itself.
#[must_use]
pub fn parse_place(raw: &str) -> Option<Place> {
    if !raw.contains("{=") && !raw.contains('<') {
        return None;
    }

    let coords = extract_coords(raw);
    let without_coords = strip_coords(raw);
    let display = strip_aliases(&without_coords, false);
    let geo_alias = strip_aliases(&without_coords, true);

    Some(Place {
        display,
        geo_alias,
        coords,
    })
}

fn extract_coords(raw: &str) -> Option<String> {
    let start = raw.find('<')?;
    let end = raw[start..].find('>')? + start;
    Some(raw[start..=end].to_string())
}

fn strip_coords(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();
    let mut in_coords = false;
    for (_, c) in chars.by_ref() {
        if c == '<' {
            in_coords = true;
            continue;
        }
        if c == '>' && in_coords {
            in_coords = false;
            continue;
        }
        if !in_coords {
            out.push(c);
        }
    }
    out
}

/// If `keep_alias` is true, replaces each `X {=Y}` with `Y` (geoAlias); otherwise
/// strips the `{=…}` portion entirely, leaving `X` (display).
fn strip_aliases(text: &str, keep_alias: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        if text[i..].starts_with("{=") {
            let rel_end = text[i..].find('}');
            if let Some(rel_end) = rel_end {
                let alias = &text[i + 2..i + rel_end];
                if keep_alias {
                    // Trim the trailing space that preceded the alias marker, e.g. "X {=Y}" -> "Y".
                    while out.ends_with(' ') {
                        out.pop();
                    }
                    out.push_str(alias);
                }
                i += rel_end + 1;
                continue;
            }
        }
        let ch = text[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out.trim().to_string()
}
