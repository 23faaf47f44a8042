//! Derived indices built once per [`super::Engine`] (spec §4.4.1).

use std::collections::HashMap;

use crate::types::{Document, RecordKind};
use crate::vocab;

/// One recorded union partner's status, as seen from the other partner.
#[derive(Clone, Debug, PartialEq)]
pub struct SpouseInfo {
    pub active: bool,
    pub reason: Option<String>,
    pub union_type: String,
}

/// Every index the kinship engine needs, built once from a validated,
/// post-processed [`Document`].
#[derive(Clone, Debug, Default)]
pub struct Indices {
    /// Parent ids whose type counts toward blood ancestry (spec §3.2), in file order.
    pub lineage_parents: HashMap<String, Vec<String>>,
    /// Every recorded (and step-inferred) parent, with its lowercased type.
    pub all_parents: HashMap<String, Vec<(String, String)>>,
    pub children: HashMap<String, Vec<String>>,
    pub spouses: HashMap<String, HashMap<String, SpouseInfo>>,
}

impl Indices {
    #[must_use]
    pub fn build(document: &Document) -> Indices {
        let mut indices = Indices::default();

        for record in document.individuals() {
            let mut lineage = Vec::new();
            let mut all = Vec::new();
            for field in record.fields("PARENT") {
                let parent_id = field.segment(0).to_string();
                if parent_id.is_empty() {
                    continue;
                }
                let ptype = field.segment(1).to_lowercase();
                if vocab::is_lineage_type(field.segment(1)) {
                    lineage.push(parent_id.clone());
                }
                all.push((parent_id, ptype));
            }
            indices.lineage_parents.insert(record.id.clone(), lineage);
            indices.all_parents.insert(record.id.clone(), all);

            let children: Vec<String> = record
                .fields("CHILD")
                .iter()
                .map(|f| f.segment(0).to_string())
                .filter(|id| !id.is_empty())
                .collect();
            indices.children.insert(record.id.clone(), children);
        }

        for record in document.records() {
            if record.kind == RecordKind::Placeholder {
                continue;
            }
            let mut partners = HashMap::new();
            for field in record.fields("UNION") {
                let partner = field.segment(0).to_string();
                if partner.is_empty() {
                    continue;
                }
                let union_type = field.segment(1).to_string();
                let end_date = field.segment(3);
                let reason = field.segment(4);
                let reason = if reason.is_empty() { None } else { Some(reason.to_string()) };
                let ended = reason.is_some() || (!end_date.is_empty() && end_date != ".." && end_date != "?");
                partners.insert(
                    partner,
                    SpouseInfo {
                        active: !ended,
                        reason,
                        union_type,
                    },
                );
            }
            indices.spouses.insert(record.id.clone(), partners);
        }

        indices.infer_step_parents();
        indices
    }

    /// For each child c and each of c's BIO parents b, for each spouse s of b
    /// that c does not already list as a parent, records c↔s as STE or STE_EX
    /// (spec §4.4.1).
    fn infer_step_parents(&mut self) {
        let child_ids: Vec<String> = self.all_parents.keys().cloned().collect();
        let mut additions: Vec<(String, String, String)> = Vec::new();

        for child in &child_ids {
            let bio_parents: Vec<String> = self
                .all_parents
                .get(child)
                .into_iter()
                .flatten()
                .filter(|(_, ty)| ty == "bio")
                .map(|(id, _)| id.clone())
                .collect();
            for bio in &bio_parents {
                let Some(spouses) = self.spouses.get(bio) else {
                    continue;
                };
                for (spouse, info) in spouses {
                    let already = self
                        .all_parents
                        .get(child)
                        .into_iter()
                        .flatten()
                        .any(|(id, _)| id == spouse);
                    if already || spouse == child {
                        continue;
                    }
                    let ty = if info.active { "ste" } else { "ste_ex" };
                    additions.push((child.clone(), spouse.clone(), ty.to_string()));
                }
            }
        }

        for (child, spouse, ty) in additions {
            let entry = self.all_parents.entry(child).or_default();
            if !entry.iter().any(|(id, _)| id == &spouse) {
                entry.push((spouse, ty));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::postprocess::postprocess;

    #[test]
    fn lineage_parents_excludes_step() {
        let mut doc = parse(
            "HEAD_FORMAT: v1\nID: A\nPARENT: P|BIO\nPARENT: S|STE\n",
        );
        postprocess(&mut doc);
        let indices = Indices::build(&doc);
        assert_eq!(indices.lineage_parents["A"], vec!["P".to_string()]);
        assert_eq!(indices.all_parents["A"].len(), 2);
    }

    #[test]
    fn spouse_with_no_end_is_active() {
        let mut doc = parse("HEAD_FORMAT: v1\nID: A\nUNION: B|MARR|1990|..|\n---\nID: B\n");
        postprocess(&mut doc);
        let indices = Indices::build(&doc);
        assert!(indices.spouses["A"]["B"].active);
    }

    #[test]
    fn spouse_with_end_date_is_inactive() {
        let mut doc = parse(
            "HEAD_FORMAT: v1\nID: A\nUNION: B|MARR|1990|2000|DIV\n---\nID: B\n",
        );
        postprocess(&mut doc);
        let indices = Indices::build(&doc);
        assert!(!indices.spouses["A"]["B"].active);
        assert_eq!(indices.spouses["A"]["B"].reason.as_deref(), Some("DIV"));
    }

    #[test]
    fn step_parent_is_inferred_from_bio_parents_spouse() {
        let mut doc = parse(
            "HEAD_FORMAT: v1\nID: C\nPARENT: P|BIO\n---\nID: P\nUNION: S|MARR|1990|..|\n---\nID: S\n",
        );
        postprocess(&mut doc);
        let indices = Indices::build(&doc);
        let c_parents = &indices.all_parents["C"];
        assert!(c_parents.iter().any(|(id, ty)| id == "S" && ty == "ste"));
    }
}
