//! [`Field`] and [`Modifier`]: one data-key occurrence within a [`super::Record`].
#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use crate::types::place::Place;

/// A `*_SRC` or `*_NOTE` modifier attached to the field that textually precedes it
/// in the same record block (spec §3.1, §4.1).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Modifier {
    pub key: String,
    pub raw: String,
    pub parsed: Vec<String>,
    pub defining_line: u32,
}

/// One occurrence of a data key within a record (spec §3.1).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Field {
    pub key: String,
    pub raw: String,
    pub parsed: Vec<String>,
    pub modifiers: Vec<Modifier>,
    pub place: Option<Place>,
    pub defining_line: u32,
    /// Set by the post-processor for synthesized fields (implicit reciprocal
    /// unions, appended CHILDs); such fields skip vocabulary validation.
    pub is_implicit: bool,
}

impl Field {
    #[must_use]
    pub fn new(key: impl Into<String>, raw: impl Into<String>, defining_line: u32) -> Field {
        let raw = raw.into();
        let parsed = crate::text::split_pipe_segments(&raw);
        Field {
            key: key.into(),
            raw,
            parsed,
            modifiers: Vec::new(),
            place: None,
            defining_line,
            is_implicit: false,
        }
    }

    /// The value at `index`, or `""` if the segment list is shorter (spec's "`||`
    /// at end of a union field vs. missing pipes: same parsed length as implied by
    /// the highest-index set segment" boundary case — callers index past the end
    /// freely).
    #[must_use]
    pub fn segment(&self, index: usize) -> &str {
        self.parsed.get(index).map_or("", String::as_str)
    }

    #[must_use]
    pub fn modifiers_with_suffix<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a Modifier> {
        self.modifiers.iter().filter(move |m| m.key.ends_with(suffix))
    }
}
