use ftt::{DiagnosticCode, FttBuilder};

#[test]
fn minimal_document_has_no_diagnostics() {
    let result = FttBuilder::new().build("HEAD_FORMAT: 1\nID: jane\nNAME: Jane Doe\n");
    assert_eq!(result.document.diagnostics.len(), 0);
}

#[test]
fn ghost_child_is_flagged_end_to_end() {
    let source = "HEAD_FORMAT: 1\nID: parent\nCHILD: kid\n---\nID: kid\n";
    let result = FttBuilder::new().build(source);
    assert!(result
        .document
        .errors()
        .any(|d| d.code == DiagnosticCode::GhostChild));
}

#[test]
fn circular_lineage_is_flagged_end_to_end() {
    let source = "HEAD_FORMAT: 1\nID: a\nPARENT: b|BIO\n---\nID: b\nPARENT: a|BIO\n";
    let result = FttBuilder::new().build(source);
    assert!(result
        .document
        .errors()
        .any(|d| d.code == DiagnosticCode::CircularLineage));
}

#[test]
fn one_sided_union_is_reciprocated_before_validation_runs() {
    let source = "HEAD_FORMAT: 1\nID: a\nUNION: b|MARR|1990|..|\n---\nID: b\n";
    let result = FttBuilder::new().build(source);
    // The implicit reciprocal UNION on `b` must exist before the dangling-
    // reference pass runs, or this would spuriously flag `a` as unreferenced.
    assert!(result.document.get("b").unwrap().fields("UNION").len() == 1);
    assert_eq!(result.document.errors().count(), 0);
}

#[test]
fn skip_postprocess_leaves_reciprocal_union_missing() {
    let source = "HEAD_FORMAT: 1\nID: a\nUNION: b|MARR|1990|..|\n---\nID: b\n";
    let result = FttBuilder::new().skip_postprocess(true).build(source);
    assert!(result.document.get("b").unwrap().fields("UNION").is_empty());
}

#[test]
fn kinship_engine_finds_parent_child_relationship() {
    let source = "HEAD_FORMAT: 1\nID: jane\nPARENT: john|BIO\n---\nID: john\nSEX: M\n";
    let result = FttBuilder::new().build(source);
    let engine = result.kinship();
    let relationships = engine.calculate("jane", "john").unwrap();
    assert!(relationships
        .iter()
        .any(|r| matches!(r, ftt::Relationship::Lineage { dist_a: 1, dist_b: 0, .. })));
    let description = engine.describe(&relationships[0], "john");
    assert_eq!(description.term, "Father");
}

#[test]
fn step_parent_collision_prefers_the_step_relation() {
    let source = "\
HEAD_FORMAT: 1\n\
ID: kid\n\
PARENT: bio|BIO\n\
PARENT: newpartner|STE\n\
---\n\
ID: newpartner\n\
UNION: bio|MARR|1990|..|\n\
---\n\
ID: bio\n";
    let result = FttBuilder::new().build(source);
    let engine = result.kinship();
    let relationships = engine.calculate("kid", "newpartner").unwrap();
    assert!(relationships
        .iter()
        .any(|r| matches!(r, ftt::Relationship::StepParent { .. })));
    assert!(!relationships
        .iter()
        .any(|r| matches!(r, ftt::Relationship::Lineage { is_step: true, .. })));
}

#[test]
fn forgotten_child_is_reconciled_chronologically() {
    let source = "\
HEAD_FORMAT: 1\n\
ID: parent\n\
CHILD: older\n\
---\n\
ID: older\n\
BORN: 1980\n\
PARENT: parent|BIO\n\
---\n\
ID: younger\n\
BORN: 1985\n\
PARENT: parent|BIO\n";
    let result = FttBuilder::new().build(source);
    let children: Vec<&str> = result
        .document
        .get("parent")
        .unwrap()
        .fields("CHILD")
        .iter()
        .map(|f| f.segment(0))
        .collect();
    assert_eq!(children, vec!["older", "younger"]);
    assert_eq!(result.document.errors().count(), 0);
}
