//! The kinship calculator (spec §4.4): derived indices, multi-path ancestor
//! search, relationship enumeration, and term rendering.

pub mod ancestors;
pub mod indices;
pub mod relationship;
pub mod terms;

pub use ancestors::LineageType;
pub use indices::Indices;
pub use relationship::{AffinalSubtype, Relationship};
pub use terms::{describe, Description, Gender};

use crate::error::FttError;
use crate::types::Document;

/// Holds the derived indices built once from a validated, post-processed
/// [`Document`] and answers `calculate`/`describe` queries against them
/// (spec §5: "derived indices are built once per engine instance").
pub struct Engine<'doc> {
    document: &'doc Document,
    indices: Indices,
}

impl<'doc> Engine<'doc> {
    #[must_use]
    pub fn new(document: &'doc Document) -> Engine<'doc> {
        Engine {
            indices: Indices::build(document),
            document,
        }
    }

    /// Enumerates every distinct kinship interpretation between `a` and `b`.
    /// Always returns at least one element.
    pub fn calculate(&self, a: &str, b: &str) -> Result<Vec<Relationship>, FttError> {
        if !self.document.contains(a) {
            return Err(FttError::UnknownId(a.to_string()));
        }
        if !self.document.contains(b) {
            return Err(FttError::UnknownId(b.to_string()));
        }
        Ok(relationship::calculate(&self.indices, a, b))
    }

    /// Renders `relationship` (as returned by `calculate(a, b)`) as "what `b`
    /// is to `a`", gendered by `b`'s recorded sex.
    #[must_use]
    pub fn describe(&self, relationship: &Relationship, b: &str) -> Description {
        let gender = self
            .document
            .get(b)
            .and_then(|r| r.field("SEX"))
            .map_or(Gender::Unknown, |f| Gender::from_sex_segment(f.segment(0)));
        terms::describe(relationship, gender)
    }
}
