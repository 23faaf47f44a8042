//! Graph post-processing: reciprocal unions, child-list reconciliation, and
//! place-expression parsing (spec §4.3). Runs once, after validation, and
//! mutates the document in place.

use crate::text::leading_date_key;
use crate::types::field::Field;
use crate::types::place::parse_place;
use crate::types::{Document, RecordKind};
use crate::error::{Diagnostic, DiagnosticCode};

/// Runs every post-processing step in spec order.
pub fn postprocess(document: &mut Document) {
    reciprocate_unions(document);
    reconcile_children(document);
    parse_places(document);
}

/// §4.3.1: for every `UNION(A→B)`, if B exists, is not a placeholder, and has
/// no `UNION` back to A, append an implicit one to B with B's own id
/// substituted as the first segment. If both directions already exist,
/// disagreement on segments 1..4 emits a consistency warning.
fn reciprocate_unions(document: &mut Document) {
    let mut to_append: Vec<(String, Field)> = Vec::new();
    let mut mismatches: Vec<(u32, String, String)> = Vec::new();

    for a in document.records() {
        for field in a.fields("UNION") {
            let Some(b_id) = field.parsed.first().cloned() else {
                continue;
            };
            if b_id.is_empty() || b_id.starts_with('?') {
                continue;
            }
            let Some(b) = document.get(&b_id) else {
                continue;
            };
            if b.kind == RecordKind::Placeholder {
                continue;
            }
            let reciprocal = b
                .fields("UNION")
                .iter()
                .find(|f| f.segment(0) == a.id);
            match reciprocal {
                None => {
                    let mut parsed = field.parsed.clone();
                    parsed[0] = a.id.clone();
                    let raw = crate::text::join_pipe_segments(&parsed);
                    let mut new_field = Field::new("UNION", raw, field.defining_line);
                    new_field.is_implicit = true;
                    new_field.parsed = parsed;
                    to_append.push((b_id.clone(), new_field));
                }
                Some(existing) => {
                    let disagrees = (1..=4).any(|i| existing.segment(i) != field.segment(i));
                    if disagrees {
                        mismatches.push((field.defining_line, a.id.clone(), b_id.clone()));
                    }
                }
            }
        }
    }

    for (id, field) in to_append {
        if let Some(record) = document.get_mut(&id) {
            record.data.push(field);
        }
    }
    for (line, a_id, b_id) in mismatches {
        document.diagnostics.push(Diagnostic::new(
            DiagnosticCode::DataConsistency,
            line,
            format!("UNION({a_id}→{b_id}) disagrees with its reciprocal"),
        ));
    }
}

/// §4.3.2: for each parent p, compute the actual child set from PARENT
/// arrows, preserve user order where a manifest id is real, and append
/// forgotten children ordered by their `BORN[0]` chronological key.
fn reconcile_children(document: &mut Document) {
    let mut actual_children: Vec<(String, Vec<String>)> = Vec::new();
    for record in document.records() {
        if record.kind != RecordKind::Individual {
            continue;
        }
        for field in record.fields("PARENT") {
            let parent_id = field.segment(0);
            if parent_id.is_empty() {
                continue;
            }
            match actual_children.iter_mut().find(|(p, _)| p == parent_id) {
                Some((_, kids)) => kids.push(record.id.clone()),
                None => actual_children.push((parent_id.to_string(), vec![record.id.clone()])),
            }
        }
    }

    let mut appends: Vec<(String, Vec<String>)> = Vec::new();
    for (parent_id, actual) in &actual_children {
        let Some(parent) = document.get(parent_id) else {
            continue;
        };
        let manifest: Vec<String> = parent
            .fields("CHILD")
            .iter()
            .filter(|f| document.contains(f.segment(0)))
            .map(|f| f.segment(0).to_string())
            .collect();
        let mut forgotten: Vec<&String> = actual.iter().filter(|c| !manifest.contains(c)).collect();
        forgotten.sort_by(|a, b| chronological_key(document, a).cmp(&chronological_key(document, b)));
        if !forgotten.is_empty() {
            appends.push((parent_id.clone(), forgotten.into_iter().cloned().collect()));
        }
    }

    for (parent_id, children) in appends {
        if let Some(record) = document.get_mut(&parent_id) {
            for child_id in children {
                let mut field = Field::new("CHILD", child_id, 0);
                field.is_implicit = true;
                record.data.push(field);
            }
        }
    }
}

/// Missing or malformed `BORN[0]` dates sort last via a sentinel that is
/// lexicographically greater than any real extracted key.
fn chronological_key(document: &Document, child_id: &str) -> String {
    document
        .get(child_id)
        .and_then(|r| r.field("BORN"))
        .and_then(|f| leading_date_key(f.segment(0)))
        .unwrap_or_else(|| "\u{10FFFF}".to_string())
}

/// §4.3.3: parses place expressions in BORN[1], DIED[1], EVENT[3], PLACE[0].
fn parse_places(document: &mut Document) {
    const PLACE_KEYS: &[(&str, usize)] = &[("BORN", 1), ("DIED", 1), ("EVENT", 3), ("PLACE", 0)];
    for record in document.records_mut() {
        for &(key, index) in PLACE_KEYS {
            if let Some(fields) = record.data.get_mut(key) {
                for field in fields.iter_mut() {
                    let raw = field.segment(index).to_string();
                    field.place = parse_place(&raw);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn union_is_reciprocated_implicitly() {
        let mut doc = parse(
            "HEAD_FORMAT: v1\nID: A\nUNION: B|MARR|1990|..|\n---\nID: B\n",
        );
        postprocess(&mut doc);
        let b_union = doc.get("B").unwrap().field("UNION").unwrap();
        assert_eq!(b_union.segment(0), "A");
        assert_eq!(b_union.segment(1), "MARR");
        assert!(b_union.is_implicit);
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn existing_reciprocal_is_not_duplicated() {
        let mut doc = parse(
            "HEAD_FORMAT: v1\nID: A\nUNION: B|MARR|1990|..|\n---\nID: B\nUNION: A|MARR|1990|..|\n",
        );
        postprocess(&mut doc);
        assert_eq!(doc.get("B").unwrap().fields("UNION").len(), 1);
    }

    #[test]
    fn disagreeing_reciprocal_union_warns() {
        let mut doc = parse(
            "HEAD_FORMAT: v1\nID: A\nUNION: B|MARR|1990|..|\n---\nID: B\nUNION: A|CIVL|1990|..|\n",
        );
        postprocess(&mut doc);
        assert!(doc
            .diagnostics
            .iter()
            .any(|d| d.code == DiagnosticCode::DataConsistency));
    }

    #[test]
    fn forgotten_children_are_appended_chronologically() {
        let mut doc = parse(
            "HEAD_FORMAT: v1\nID: P\n---\nID: B\nPARENT: P|BIO\nBORN: 1905\n---\nID: A\nPARENT: P|BIO\nBORN: 1900\n",
        );
        postprocess(&mut doc);
        let children: Vec<&str> = doc
            .get("P")
            .unwrap()
            .fields("CHILD")
            .iter()
            .map(|f| f.segment(0))
            .collect();
        assert_eq!(children, vec!["A", "B"]);
    }

    #[test]
    fn manifest_order_is_preserved() {
        let mut doc = parse(
            "HEAD_FORMAT: v1\nID: P\nCHILD: B\nCHILD: A\n---\nID: A\nPARENT: P|BIO\nBORN: 1900\n---\nID: B\nPARENT: P|BIO\nBORN: 1905\n",
        );
        postprocess(&mut doc);
        let children: Vec<&str> = doc
            .get("P")
            .unwrap()
            .fields("CHILD")
            .iter()
            .map(|f| f.segment(0))
            .collect();
        assert_eq!(children, vec!["B", "A"]);
    }

    #[test]
    fn place_with_alias_and_coordinates_is_parsed() {
        let mut doc = parse(
            "HEAD_FORMAT: v1\nID: A\nBORN: 1900|Springfield {=Springfield Twp}<39.8,-89.6>\n",
        );
        postprocess(&mut doc);
        let place = doc.get("A").unwrap().field("BORN").unwrap().place.as_ref().unwrap();
        assert_eq!(place.geo_alias, "Springfield Twp");
        assert_eq!(place.coords.as_deref(), Some("<39.8,-89.6>"));
    }

    #[test]
    fn plain_place_has_no_place_metadata() {
        let mut doc = parse("HEAD_FORMAT: v1\nID: A\nBORN: 1900|Springfield\n");
        postprocess(&mut doc);
        assert!(doc.get("A").unwrap().field("BORN").unwrap().place.is_none());
    }
}
