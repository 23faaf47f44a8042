//! Multi-path ancestor traversal (spec §4.4.2).
//!
//! `ancestors(x)` is a map, not a single distance per id: the same ancestor
//! may be reachable via distinct lineage-type paths (e.g. biological on one
//! branch, adoptive on another), and collapsing to one entry silently drops
//! relationships in endogamous families.

use std::collections::{HashMap, VecDeque};

use super::indices::Indices;

/// How a path from the query individual reached a given ancestor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineageType {
    SelfRoot,
    Bio,
    Ado,
    Ste,
}

/// One equivalence class of paths from the query individual to an ancestor.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMeta {
    pub dist: u32,
    pub is_step: bool,
    pub is_ex_step: bool,
    pub is_foster: bool,
    pub lineage_type: LineageType,
    /// The direct parent of the root on this path, fixed at the first hop.
    pub initial_branch: Option<String>,
    /// The node's other lineage parent at the generation just traversed,
    /// used to discriminate half-cousins sharing the same ancestor.
    pub via_partner: Option<String>,
    /// The child through which this ancestor was reached.
    pub via_node: Option<String>,
}

fn redundancy_key(m: &PathMeta) -> (u32, LineageType, bool, Option<String>, Option<String>) {
    (
        m.dist,
        m.lineage_type,
        m.is_step,
        m.via_node.clone(),
        m.initial_branch.clone(),
    )
}

/// Breadth-first traversal from `start` over `indices.all_parents`, returning
/// every non-redundant path to every reachable ancestor (including `start`
/// itself, at distance 0).
#[must_use]
pub fn ancestors(indices: &Indices, start: &str) -> HashMap<String, Vec<PathMeta>> {
    let root = PathMeta {
        dist: 0,
        is_step: false,
        is_ex_step: false,
        is_foster: false,
        lineage_type: LineageType::SelfRoot,
        initial_branch: None,
        via_partner: None,
        via_node: None,
    };

    let mut result: HashMap<String, Vec<PathMeta>> = HashMap::new();
    result.insert(start.to_string(), vec![root.clone()]);

    let mut queue: VecDeque<(String, PathMeta)> = VecDeque::new();
    queue.push_back((start.to_string(), root));

    while let Some((node, meta)) = queue.pop_front() {
        let Some(parents) = indices.all_parents.get(&node) else {
            continue;
        };
        let siblings_of_node: Vec<&str> = parents.iter().map(|(id, _)| id.as_str()).collect();

        for (parent, ptype) in parents {
            let became_step = matches!(ptype.as_str(), "ste" | "ste_ex");
            let is_step = meta.is_step || became_step;
            let is_ex_step = meta.is_ex_step || ptype == "ste_ex";
            let is_foster = meta.is_foster || ptype == "fos";

            let lineage_type = if ptype == "ado" {
                LineageType::Ado
            } else if became_step && !meta.is_step {
                LineageType::Ste
            } else if meta.lineage_type == LineageType::SelfRoot {
                LineageType::Bio
            } else {
                meta.lineage_type
            };

            let initial_branch = if meta.dist == 0 {
                Some(parent.clone())
            } else {
                meta.initial_branch.clone()
            };

            let via_partner = siblings_of_node
                .iter()
                .find(|&&id| id != parent.as_str())
                .map(|s| s.to_string());

            let new_meta = PathMeta {
                dist: meta.dist + 1,
                is_step,
                is_ex_step,
                is_foster,
                lineage_type,
                initial_branch,
                via_partner,
                via_node: Some(node.clone()),
            };

            let entry = result.entry(parent.clone()).or_default();
            let key = redundancy_key(&new_meta);
            let is_redundant = entry.iter().any(|existing| redundancy_key(existing) == key);
            if !is_redundant {
                entry.push(new_meta.clone());
                queue.push_back((parent.clone(), new_meta));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::postprocess::postprocess;

    #[test]
    fn self_is_distance_zero() {
        let mut doc = parse("HEAD_FORMAT: v1\nID: A\n");
        postprocess(&mut doc);
        let indices = Indices::build(&doc);
        let anc = ancestors(&indices, "A");
        assert_eq!(anc["A"][0].dist, 0);
    }

    #[test]
    fn simple_parent_chain() {
        let mut doc = parse(
            "HEAD_FORMAT: v1\nID: A\nPARENT: P|BIO\n---\nID: P\nPARENT: G|BIO\n---\nID: G\n",
        );
        postprocess(&mut doc);
        let indices = Indices::build(&doc);
        let anc = ancestors(&indices, "A");
        assert_eq!(anc["P"][0].dist, 1);
        assert_eq!(anc["G"][0].dist, 2);
        assert_eq!(anc["G"][0].lineage_type, LineageType::Bio);
    }

    #[test]
    fn two_distinct_paths_to_the_same_ancestor_are_both_kept() {
        // A cousin-marriage loop: G is reachable via two different children.
        let mut doc = parse(
            "HEAD_FORMAT: v1\nID: A\nPARENT: P1|BIO\nPARENT: P2|BIO\n\
             ---\nID: P1\nPARENT: G|BIO\n\
             ---\nID: P2\nPARENT: G|BIO\n\
             ---\nID: G\n",
        );
        postprocess(&mut doc);
        let indices = Indices::build(&doc);
        let anc = ancestors(&indices, "A");
        assert_eq!(anc["G"].len(), 2);
    }
}
