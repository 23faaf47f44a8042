//! [`Record`] and [`RecordKind`]: one `ID:`-anchored block (spec §3.1).
#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use crate::text::nfc;
use crate::types::field::Field;

/// The kind of a record, determined solely by the first character of its id
/// (spec §3.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum RecordKind {
    Individual,
    Source,
    Event,
    Placeholder,
}

impl RecordKind {
    #[must_use]
    pub fn from_id(id: &str) -> RecordKind {
        match id.chars().next() {
            Some('^') => RecordKind::Source,
            Some('&') => RecordKind::Event,
            Some('?') => RecordKind::Placeholder,
            _ => RecordKind::Individual,
        }
    }
}

/// Reason an `ID:` line was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdError {
    Empty,
    InvalidChar(char),
}

/// Validates and NFC-normalizes a raw id (spec §3.2): `[letter|digit][letter|digit|-]*`
/// after stripping an optional leading sigil, with no whitespace, pipe, semicolon, or
/// control character anywhere in the id.
pub fn validate_and_normalize_id(raw: &str) -> Result<String, IdError> {
    let normalized = nfc(raw.trim());
    if normalized.is_empty() {
        return Err(IdError::Empty);
    }
    for c in normalized.chars() {
        if c.is_whitespace() || c == '|' || c == ';' || c.is_control() {
            return Err(IdError::InvalidChar(c));
        }
    }
    let body = normalized
        .strip_prefix(['^', '&', '?'])
        .unwrap_or(&normalized);
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c.is_alphanumeric() => {}
        Some(c) => return Err(IdError::InvalidChar(c)),
        None => return Err(IdError::Empty),
    }
    for c in chars {
        if !(c.is_alphanumeric() || c == '-') {
            return Err(IdError::InvalidChar(c));
        }
    }
    Ok(normalized)
}

/// A small insertion-ordered multimap from field key to the ordered fields defined
/// under that key, preserving first-to-last file order within a key (spec §8,
/// testable property 3). Linear scan is appropriate at the scale of one record's
/// field set.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct FieldTable {
    entries: Vec<(String, Vec<Field>)>,
}

impl FieldTable {
    #[must_use]
    pub fn new() -> FieldTable {
        FieldTable::default()
    }

    pub fn push(&mut self, field: Field) {
        if let Some((_, fields)) = self.entries.iter_mut().find(|(k, _)| *k == field.key) {
            fields.push(field);
        } else {
            self.entries.push((field.key.clone(), vec![field]));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> &[Field] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map_or(&[], |(_, fields)| fields.as_slice())
    }

    #[must_use]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Vec<Field>> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, fields)| fields)
    }

    pub fn get_or_insert(&mut self, key: &str) -> &mut Vec<Field> {
        if !self.entries.iter().any(|(k, _)| k == key) {
            self.entries.push((key.to_string(), Vec::new()));
        }
        &mut self.entries.iter_mut().find(|(k, _)| k == key).unwrap().1
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Field])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The last field pushed overall, used to attach modifiers to "the field most
    /// recently created in the current record" (spec §4.1).
    #[must_use]
    pub fn last_field(&self) -> Option<&Field> {
        self.entries.last().and_then(|(_, fields)| fields.last())
    }

    pub fn last_field_mut(&mut self) -> Option<&mut Field> {
        self.entries.last_mut().and_then(|(_, fields)| fields.last_mut())
    }
}

/// One `ID:`-anchored block (spec §3.1).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Record {
    pub id: String,
    pub kind: RecordKind,
    pub data: FieldTable,
    pub defining_line: u32,
}

impl Record {
    #[must_use]
    pub fn new(id: String, defining_line: u32) -> Record {
        Record {
            kind: RecordKind::from_id(&id),
            id,
            data: FieldTable::new(),
            defining_line,
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.kind == RecordKind::Placeholder
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.data.get(key).first()
    }

    #[must_use]
    pub fn fields(&self, key: &str) -> &[Field] {
        self.data.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_sigil() {
        assert_eq!(RecordKind::from_id("^S1"), RecordKind::Source);
        assert_eq!(RecordKind::from_id("&E1"), RecordKind::Event);
        assert_eq!(RecordKind::from_id("?unknown"), RecordKind::Placeholder);
        assert_eq!(RecordKind::from_id("A1"), RecordKind::Individual);
    }

    #[test]
    fn valid_ids() {
        assert!(validate_and_normalize_id("A1").is_ok());
        assert!(validate_and_normalize_id("jane-doe-1").is_ok());
        assert!(validate_and_normalize_id("?placeholder-1").is_ok());
        assert!(validate_and_normalize_id("^src1").is_ok());
    }

    #[test]
    fn rejects_whitespace_and_pipe() {
        assert!(validate_and_normalize_id("A 1").is_err());
        assert!(validate_and_normalize_id("A|1").is_err());
        assert!(validate_and_normalize_id("A;1").is_err());
    }

    #[test]
    fn rejects_leading_hyphen() {
        assert!(validate_and_normalize_id("-A1").is_err());
    }

    #[test]
    fn field_table_preserves_order_per_key() {
        let mut table = FieldTable::new();
        table.push(Field::new("NAME", "first", 1));
        table.push(Field::new("SEX", "F", 2));
        table.push(Field::new("NAME", "second", 3));
        let names: Vec<_> = table.get("NAME").iter().map(|f| f.raw.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
