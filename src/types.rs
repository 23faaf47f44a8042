//! Data structures representing a parsed FTT document (spec §3).
#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

pub mod field;
pub mod place;
pub mod record;

use std::collections::HashMap;

pub use field::{Field, Modifier};
pub use place::Place;
pub use record::{Record, RecordKind};

use crate::error::Diagnostic;

/// A fully parsed (and, once post-processed, reconciled) FTT document (spec §3.1).
/// The `Document` exclusively owns every `Record`; each `Record` exclusively owns
/// its `Field`s and `Modifier`s.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Document {
    /// `HEAD_*` keys, in first-definition order.
    headers: Vec<(String, String)>,
    /// Records, in file-definition order.
    records: Vec<Record>,
    /// Maps a normalized id to its index in `records`.
    #[cfg_attr(feature = "json", serde(skip))]
    index: HashMap<String, usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    #[must_use]
    pub fn new() -> Document {
        Document::default()
    }

    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if let Some(entry) = self.headers.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value.into();
        } else {
            self.headers.push((key, value.into()));
        }
    }

    #[must_use]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Inserts `record`, returning `false` (and leaving the document unchanged) if
    /// its id is already defined — the caller is responsible for emitting
    /// `DUPLICATE_ID` and entering recovery (spec §4.1).
    pub fn insert_record(&mut self, record: Record) -> bool {
        if self.index.contains_key(&record.id) {
            return false;
        }
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        true
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Record> {
        self.index.get(id).copied().map(move |i| &mut self.records[i])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn individuals(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.kind == RecordKind::Individual)
    }

    /// An id either starts with `?` (a placeholder, always a "safe harbor" for
    /// referential-integrity checks, spec §3.2) or must be defined.
    #[must_use]
    pub fn resolves(&self, id: &str) -> bool {
        id.starts_with('?') || self.contains(id)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == crate::error::Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == crate::error::Severity::Warning)
    }

    /// Prints a summary of record counts, mirroring the "stats" convenience used
    /// by CLI front ends over this kind of parsed-document type.
    pub fn stats(&self) {
        let mut counts: HashMap<RecordKind, usize> = HashMap::new();
        for r in &self.records {
            *counts.entry(r.kind).or_insert(0) += 1;
        }
        println!("----------------------");
        println!("| FTT Document Stats |");
        println!("----------------------");
        println!("  individuals:  {}", counts.get(&RecordKind::Individual).copied().unwrap_or(0));
        println!("  sources:      {}", counts.get(&RecordKind::Source).copied().unwrap_or(0));
        println!("  events:       {}", counts.get(&RecordKind::Event).copied().unwrap_or(0));
        println!("  placeholders: {}", counts.get(&RecordKind::Placeholder).copied().unwrap_or(0));
        println!("  errors:       {}", self.errors().count());
        println!("  warnings:     {}", self.warnings().count());
        println!("----------------------");
    }
}
