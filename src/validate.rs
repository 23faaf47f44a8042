//! The document validator: six ordered passes run after parsing and
//! post-processing (spec §4.2). Each pass appends [`Diagnostic`]s; none
//! mutate the document except to append diagnostics.

use std::collections::HashMap;

use crate::date::is_valid_date_literal;
use crate::error::{Diagnostic, DiagnosticCode};
use crate::types::{Document, RecordKind};
use crate::vocab;

/// Runs all six passes in spec order, appending diagnostics to `document`.
pub fn validate(document: &mut Document) {
    check_header(document);
    check_dangling_references(document);
    check_ghost_children(document);
    check_lineage_cycles(document);
    check_vocabulary(document);
    check_dates(document);
}

/// The highest `FTT vX.Y` format version this implementation understands
/// (spec §6.1's worked example header is `FTT v0.1`).
const SUPPORTED_VERSION: (u32, u32) = (0, 1);

/// Parses the canonical `FTT vX.Y` form of a `HEAD_FORMAT` value. Returns
/// `None` for anything else, including bare version strings with no `FTT`
/// prefix — those aren't the documented literal, so there is nothing to
/// compare against the supported ceiling.
fn parse_format_version(value: &str) -> Option<(u32, u32)> {
    let rest = value.trim().strip_prefix("FTT")?.trim();
    let rest = rest.strip_prefix('v').or_else(|| rest.strip_prefix('V'))?;
    let mut parts = rest.splitn(2, '.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().unwrap_or("0").parse().ok()?;
    Some((major, minor))
}

/// Pass 1: `HEAD_FORMAT` must be present and its declared version must not
/// exceed [`SUPPORTED_VERSION`]; `HEAD_DATE`, if present, must be a valid
/// date literal (spec §4.2 point 1).
fn check_header(document: &mut Document) {
    match document.header("HEAD_FORMAT") {
        None => {
            document.diagnostics.push(Diagnostic::new(
                DiagnosticCode::SchemaVersion,
                0,
                "missing HEAD_FORMAT header",
            ));
        }
        Some(value) => {
            if let Some(version) = parse_format_version(value) {
                if version > SUPPORTED_VERSION {
                    document.diagnostics.push(Diagnostic::new(
                        DiagnosticCode::SchemaVersion,
                        0,
                        format!(
                            "HEAD_FORMAT declares version {value:?}, which exceeds the supported v{}.{}",
                            SUPPORTED_VERSION.0, SUPPORTED_VERSION.1
                        ),
                    ));
                }
            }
        }
    }
    if let Some(date) = document.header("HEAD_DATE") {
        if !is_valid_date_literal(date) {
            document.diagnostics.push(Diagnostic::new(
                DiagnosticCode::DateInvalid,
                0,
                format!("HEAD_DATE has invalid date literal {date:?}"),
            ));
        }
    }
}

/// Pass 2: every referenced id must resolve, where a leading `?` is always a
/// safe harbor (spec §4.2 point 2).
fn check_dangling_references(document: &mut Document) {
    let mut findings = Vec::new();
    for record in document.records() {
        for (key, fields) in record.data.iter() {
            let is_ref_field = matches!(
                key,
                "PARENT" | "CHILD" | "UNION" | "ASSOC" | "SRC" | "EVENT_REF"
            );
            for field in fields {
                if is_ref_field {
                    if let Some(target) = field.parsed.first() {
                        if !target.is_empty() && !document.resolves(target) {
                            findings.push((field.defining_line, target.clone(), false));
                        }
                    }
                }
                for modifier in field.modifiers_with_suffix("_SRC") {
                    if let Some(target) = modifier.parsed.first() {
                        if !target.is_empty() && !document.resolves(target) {
                            findings.push((modifier.defining_line, target.clone(), true));
                        }
                    }
                }
            }
        }
    }
    for (line, target, is_src) in findings {
        let code = if is_src {
            DiagnosticCode::DanglingSrc
        } else {
            DiagnosticCode::DanglingRef
        };
        document
            .diagnostics
            .push(Diagnostic::new(code, line, format!("reference to undefined id {target:?}")));
    }
}

/// Pass 3: every `CHILD:` entry must be reciprocated by a `PARENT:` on the
/// child naming the enclosing record (spec §4.2 point 3). Implicit fields
/// synthesized by the post-processor are exempt, since reciprocation is what
/// synthesizes them in the first place.
fn check_ghost_children(document: &mut Document) {
    let mut findings = Vec::new();
    for record in document.records() {
        for field in record.fields("CHILD") {
            if field.is_implicit {
                continue;
            }
            let Some(child_id) = field.parsed.first() else {
                continue;
            };
            if child_id.is_empty() || !document.contains(child_id) {
                continue; // already reported as DANGLING_REF
            }
            let child = document.get(child_id).unwrap();
            let has_reciprocal = child
                .fields("PARENT")
                .iter()
                .any(|p| p.segment(0) == record.id);
            if !has_reciprocal {
                findings.push((field.defining_line, child_id.clone(), record.id.clone()));
            }
        }
    }
    for (line, child_id, parent_id) in findings {
        document.diagnostics.push(Diagnostic::new(
            DiagnosticCode::GhostChild,
            line,
            format!("{child_id} has no reciprocating PARENT:{parent_id}"),
        ));
    }
}

/// Pass 4: the lineage subgraph (PARENT/CHILD edges among Individual records)
/// must be acyclic, checked via iterative DFS with White/Gray/Black coloring
/// to avoid recursion depth limits on large trees (spec §4.2 point 4).
fn check_lineage_cycles(document: &mut Document) {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let ids: Vec<&str> = document
        .individuals()
        .map(|r| r.id.as_str())
        .collect();
    let mut colors: HashMap<&str, Color> = ids.iter().map(|&id| (id, Color::White)).collect();
    let mut findings = Vec::new();

    for &start in &ids {
        if colors[start] != Color::White {
            continue;
        }
        // Each stack frame is (node, next-unvisited-parent-index).
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        colors.insert(start, Color::Gray);

        while let Some(&mut (node, ref mut next)) = stack.last_mut() {
            let parents: Vec<&str> = document
                .get(node)
                .map(|r| {
                    r.fields("PARENT")
                        .iter()
                        .filter(|f| vocab::is_lineage_type(f.segment(1)))
                        .map(|f| f.segment(0))
                        .filter(|id| !id.is_empty())
                        .collect()
                })
                .unwrap_or_default();

            if *next < parents.len() {
                let parent = parents[*next];
                *next += 1;
                match colors.get(parent).copied() {
                    Some(Color::White) => {
                        colors.insert(parent, Color::Gray);
                        stack.push((parent, 0));
                    }
                    Some(Color::Gray) => {
                        let line = document.get(node).map_or(0, |r| r.defining_line);
                        findings.push((line, node.to_string(), parent.to_string()));
                    }
                    _ => {}
                }
            } else {
                colors.insert(node, Color::Black);
                stack.pop();
            }
        }
    }

    for (line, node, parent) in findings {
        document.diagnostics.push(Diagnostic::new(
            DiagnosticCode::CircularLineage,
            line,
            format!("lineage cycle: {node} has ancestor {parent} that descends from {node}"),
        ));
    }
}

/// Pass 5: controlled-vocabulary segments validated per key (spec §4.2 point
/// 5). Nonstandard values warn; invalid structural mismatches (wrong sigil
/// kind referenced) error.
fn check_vocabulary(document: &mut Document) {
    let mut findings = Vec::new();
    for record in document.records() {
        for field in record.fields("PARENT") {
            if !field.is_implicit && !vocab::is_valid_parent_type(field.segment(1)) {
                findings.push((field.defining_line, DiagnosticCode::VocabNonstandard, format!(
                    "nonstandard parent type {:?}",
                    field.segment(1)
                )));
            }
        }
        for field in record.fields("UNION") {
            if !field.is_implicit {
                if !vocab::is_valid_union_type(field.segment(1)) {
                    findings.push((field.defining_line, DiagnosticCode::VocabInvalid, format!(
                        "invalid union type {:?}",
                        field.segment(1)
                    )));
                }
                if !vocab::is_valid_union_reason(field.segment(4)) {
                    findings.push((field.defining_line, DiagnosticCode::VocabInvalid, format!(
                        "invalid union reason {:?}",
                        field.segment(4)
                    )));
                }
            }
        }
        for field in record.fields("NAME") {
            if !vocab::is_valid_name_type(field.segment(2)) {
                findings.push((field.defining_line, DiagnosticCode::VocabNonstandard, format!(
                    "nonstandard name type {:?}",
                    field.segment(2)
                )));
            }
            if !vocab::is_valid_name_status(field.segment(3)) {
                findings.push((field.defining_line, DiagnosticCode::VocabInvalid, format!(
                    "invalid name status {:?}",
                    field.segment(3)
                )));
            }
        }
        for field in record.fields("ASSOC") {
            if !vocab::is_valid_assoc_role(field.segment(1)) {
                findings.push((field.defining_line, DiagnosticCode::VocabNonstandard, format!(
                    "nonstandard association role {:?}",
                    field.segment(1)
                )));
            }
        }
        if record.kind == RecordKind::Individual {
            for field in record.fields("PARENT") {
                if let Some(parent_id) = field.parsed.first() {
                    if let Some(parent) = document.get(parent_id) {
                        if parent.kind != RecordKind::Individual && !parent.is_placeholder() {
                            findings.push((field.defining_line, DiagnosticCode::VocabInvalid, format!(
                                "PARENT references non-individual record {parent_id:?}"
                            )));
                        }
                    }
                }
            }
        }
    }
    for (line, code, message) in findings {
        document.diagnostics.push(Diagnostic::new(code, line, message));
    }
}

/// Pass 6: every date-bearing segment must match the date grammar (spec §4.2
/// point 6).
fn check_dates(document: &mut Document) {
    const DATE_KEYS: &[(&str, usize)] = &[
        ("BORN", 0),
        ("DIED", 0),
        ("EVENT", 1),
        ("EVENT", 2),
        ("UNION", 2),
        ("UNION", 3),
        ("ASSOC", 2),
        ("ASSOC", 3),
        ("MEDIA", 1),
        ("START_DATE", 0),
        ("END_DATE", 0),
    ];
    let mut findings = Vec::new();
    for record in document.records() {
        for &(key, index) in DATE_KEYS {
            for field in record.fields(key) {
                let value = field.segment(index);
                if !value.is_empty() && !is_valid_date_literal(value) {
                    findings.push((field.defining_line, value.to_string(), key));
                }
            }
        }
    }
    for (line, value, key) in findings {
        document.diagnostics.push(Diagnostic::new(
            DiagnosticCode::DateInvalid,
            line,
            format!("{key} has invalid date literal {value:?}"),
        ));
    }
}
