//! Relationship enumeration (spec §4.4.3) and the `Relationship` sum type
//! (spec §9 "Sum-typed relationships").

use std::collections::HashMap;

use super::ancestors::{ancestors, LineageType};
use super::indices::Indices;
/// Whether an [`Relationship::Affinal`] is anchored on A's spouse or B's spouse.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum AffinalSubtype {
    /// A→spouse→(blood relative of spouse)=B.
    ViaSpouse,
    /// A is the blood relative reached through B's spouse.
    ViaBloodSpouse,
}

/// One interpretation of the kinship between two individuals. A query may
/// return more than one (e.g. both `StepSibling` and `Affinal`).
#[derive(Clone, Debug, PartialEq)]
pub enum Relationship {
    Identity,
    Union {
        target: String,
        active: bool,
        reason: Option<String>,
        union_type: String,
    },
    Lineage {
        dist_a: u32,
        dist_b: u32,
        is_step: bool,
        is_ex_step: bool,
        lineage_a: LineageType,
        lineage_b: LineageType,
        is_half: bool,
        is_ambiguous: bool,
        is_double: bool,
        is_adoptive: bool,
        is_foster: bool,
    },
    StepParent {
        parent_id: String,
        is_ex: bool,
    },
    StepChild {
        child_id: String,
        is_ex: bool,
    },
    StepSibling {
        parent_a: String,
        parent_b: String,
        union_active: bool,
        union_reason: Option<String>,
    },
    Affinal {
        subtype: AffinalSubtype,
        spouse_id: String,
        blood_rel: Box<Relationship>,
        is_ex_union: bool,
    },
    CoAffinal {
        spouse_a: String,
        spouse_b: String,
        blood_rel: Box<Relationship>,
    },
    ExtendedAffinal {
        spouse1: String,
        spouse2: String,
        rel_a: Box<Relationship>,
        rel_b: Box<Relationship>,
    },
    None,
}

struct CommonAncestor {
    /// The ancestor's own id, needed to tell "two paths to the same LCA"
    /// apart from "two different LCAs" when counting distinct lineages.
    id: String,
    dist_a: u32,
    dist_b: u32,
    is_step: bool,
    is_ex_step: bool,
    is_foster: bool,
    lineage_a: LineageType,
    lineage_b: LineageType,
    initial_branch_a: Option<String>,
    initial_branch_b: Option<String>,
    via_partner_a: Option<String>,
    via_partner_b: Option<String>,
}

/// Whether `x` and `y` are a couple, either by an explicit `UNION` record or
/// by sharing a recorded child — two ancestors in this relation count as one
/// lineage for the `isDouble` rule (spec §4.4.3 point 9), not two.
fn partner_of(indices: &Indices, x: &str, y: &str) -> bool {
    if x == y {
        return false;
    }
    let explicit = indices.spouses.get(x).is_some_and(|m| m.contains_key(y));
    explicit
        || indices.children.get(x).is_some_and(|cx| {
            indices.children.get(y).is_some_and(|cy| cx.iter().any(|c| cy.contains(c)))
        })
}

/// Groups a tier's distinct LCA ids into partner units, so that a married (or
/// co-parenting) pair of common ancestors collapses to a single lineage.
fn lca_units<'a>(indices: &Indices, ids: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut units: Vec<Vec<&str>> = Vec::new();
    for &id in ids {
        if let Some(unit) = units.iter_mut().find(|u| u.iter().any(|&m| partner_of(indices, m, id))) {
            unit.push(id);
        } else {
            units.push(vec![id]);
        }
    }
    units
}

/// `calculate(A, B)` (spec §4.4.3). Always returns at least one element.
#[must_use]
pub fn calculate(indices: &Indices, a: &str, b: &str) -> Vec<Relationship> {
    if a == b {
        return vec![Relationship::Identity];
    }

    let mut results = blood_and_step(indices, a, b);
    affinal(indices, a, b, &mut results);
    co_affinal(indices, a, b, &mut results);
    extended_affinal(indices, a, b, &mut results);

    let results = dedup(results);
    let results = filter_redundant(results);

    if results.is_empty() {
        vec![Relationship::None]
    } else {
        results
    }
}

/// The non-affinal relations between `a` and `b`: direct union, lineage,
/// direct step, and step-sibling. Used both as the top level of `calculate`
/// and as the bounded probe the affinal searches use, so that affinal search
/// never recurses into another affinal search (spec §4.4.3 points 6-8 only
/// ever compose with blood/step relations, never with each other).
fn blood_and_step(indices: &Indices, a: &str, b: &str) -> Vec<Relationship> {
    let mut results = Vec::new();
    direct_union(indices, a, b, &mut results);
    lineage(indices, a, b, &mut results);
    direct_step(indices, a, b, &mut results);
    step_siblings(indices, a, b, &mut results);
    filter_redundant(dedup(results))
}

fn direct_union(indices: &Indices, a: &str, b: &str, out: &mut Vec<Relationship>) {
    if let Some(info) = indices.spouses.get(a).and_then(|m| m.get(b)) {
        out.push(Relationship::Union {
            target: b.to_string(),
            active: info.active,
            reason: info.reason.clone(),
            union_type: info.union_type.clone(),
        });
    }
}

fn lineage(indices: &Indices, a: &str, b: &str, out: &mut Vec<Relationship>) {
    let anc_a = ancestors(indices, a);
    let anc_b = ancestors(indices, b);

    let mut candidates: Vec<CommonAncestor> = Vec::new();
    for (id, paths_a) in &anc_a {
        let Some(paths_b) = anc_b.get(id) else {
            continue;
        };
        for pa in paths_a {
            for pb in paths_b {
                if pa.dist == 0 && pb.dist == 0 {
                    continue; // identity handled separately
                }
                candidates.push(CommonAncestor {
                    id: id.clone(),
                    dist_a: pa.dist,
                    dist_b: pb.dist,
                    is_step: pa.is_step || pb.is_step,
                    is_ex_step: pa.is_ex_step || pb.is_ex_step,
                    is_foster: pa.is_foster || pb.is_foster,
                    lineage_a: pa.lineage_type,
                    lineage_b: pb.lineage_type,
                    initial_branch_a: pa.initial_branch.clone(),
                    initial_branch_b: pb.initial_branch.clone(),
                    via_partner_a: pa.via_partner.clone(),
                    via_partner_b: pb.via_partner.clone(),
                });
            }
        }
    }

    // Prune candidates dominated by a strictly closer common ancestor on the
    // same branch (an approximation of "lowest common ancestor").
    let lcas: Vec<&CommonAncestor> = candidates
        .iter()
        .filter(|x| {
            !candidates.iter().any(|y| {
                !std::ptr::eq(*x, y)
                    && y.dist_a <= x.dist_a
                    && y.dist_b <= x.dist_b
                    && (y.dist_a < x.dist_a || y.dist_b < x.dist_b)
                    && y.initial_branch_b == x.initial_branch_b
            })
        })
        .collect();

    let mut tiers: HashMap<(u32, u32, bool, bool, LineageTypeKey, LineageTypeKey), Vec<&CommonAncestor>> =
        HashMap::new();
    for c in &lcas {
        let key = (
            c.dist_a,
            c.dist_b,
            c.is_step,
            c.is_ex_step,
            LineageTypeKey(c.lineage_a),
            LineageTypeKey(c.lineage_b),
        );
        tiers.entry(key).or_default().push(c);
    }

    let known_parents_a = indices.lineage_parents.get(a).map_or(0, Vec::len);
    let known_parents_b = indices.lineage_parents.get(b).map_or(0, Vec::len);

    for ((dist_a, dist_b, is_step, is_ex_step, la, lb), members) in tiers {
        let mut distinct_ids: Vec<&str> = Vec::new();
        for m in &members {
            if !distinct_ids.contains(&m.id.as_str()) {
                distinct_ids.push(m.id.as_str());
            }
        }
        let units = lca_units(indices, &distinct_ids);
        let is_double = units.len() >= 2;

        let (is_half, is_ambiguous) = if dist_a == 1 && dist_b == 1 {
            if distinct_ids.len() == 1 {
                if known_parents_a < 2 || known_parents_b < 2 {
                    (false, true)
                } else {
                    (true, false)
                }
            } else {
                (false, false)
            }
        } else if dist_a == 1 || dist_b == 1 {
            let uncle_known = if dist_a == 1 { known_parents_a } else { known_parents_b };
            if distinct_ids.len() == 1 {
                if uncle_known < 2 {
                    (false, true)
                } else {
                    (true, false)
                }
            } else {
                (false, false)
            }
        } else if distinct_ids.len() == 1 {
            // A single shared ancestor: half iff A and B descend from it
            // through different partners of the intervening generation.
            (members.iter().any(|m| m.via_partner_a != m.via_partner_b), false)
        } else {
            // Multiple distinct (non-partner) LCAs in one tier is the
            // double-relation case, not a half one (spec §4.4.3 point 9).
            (false, false)
        };

        out.push(Relationship::Lineage {
            dist_a,
            dist_b,
            is_step,
            is_ex_step,
            lineage_a: la.0,
            lineage_b: lb.0,
            is_half,
            is_ambiguous,
            is_double,
            is_adoptive: la.0 == LineageType::Ado || lb.0 == LineageType::Ado,
            is_foster: members.iter().any(|m| m.is_foster),
        });
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct LineageTypeKey(LineageType);

fn direct_step(indices: &Indices, a: &str, b: &str, out: &mut Vec<Relationship>) {
    if let Some((_, ty)) = indices
        .all_parents
        .get(a)
        .into_iter()
        .flatten()
        .find(|(id, _)| id == b)
    {
        if ty == "ste" || ty == "ste_ex" {
            out.push(Relationship::StepParent {
                parent_id: b.to_string(),
                is_ex: ty == "ste_ex",
            });
        }
    }
    if let Some((_, ty)) = indices
        .all_parents
        .get(b)
        .into_iter()
        .flatten()
        .find(|(id, _)| id == a)
    {
        if ty == "ste" || ty == "ste_ex" {
            out.push(Relationship::StepChild {
                child_id: b.to_string(),
                is_ex: ty == "ste_ex",
            });
        }
    }
}

fn step_siblings(indices: &Indices, a: &str, b: &str, out: &mut Vec<Relationship>) {
    let empty = Vec::new();
    let parents_a = indices.all_parents.get(a).unwrap_or(&empty);
    let parents_b = indices.all_parents.get(b).unwrap_or(&empty);
    let lineage_a = indices.lineage_parents.get(a).cloned().unwrap_or_default();
    let lineage_b = indices.lineage_parents.get(b).cloned().unwrap_or_default();
    let shares_lineage_parent = lineage_a.iter().any(|p| lineage_b.contains(p));
    if shares_lineage_parent {
        return;
    }

    for (pa, _) in parents_a {
        for (pb, _) in parents_b {
            if pa == pb {
                continue;
            }
            let are_partners = indices
                .spouses
                .get(pa)
                .is_some_and(|m| m.contains_key(pb));
            let share_a_child = indices
                .children
                .get(pa)
                .is_some_and(|c| indices.children.get(pb).is_some_and(|d| c.iter().any(|x| d.contains(x))));
            if !are_partners && !share_a_child {
                continue;
            }
            let union_info = indices.spouses.get(pa).and_then(|m| m.get(pb));
            out.push(Relationship::StepSibling {
                parent_a: pa.clone(),
                parent_b: pb.clone(),
                union_active: union_info.is_some_and(|i| i.active),
                union_reason: union_info.and_then(|i| i.reason.clone()),
            });
        }
    }
}

fn affinal(indices: &Indices, a: &str, b: &str, out: &mut Vec<Relationship>) {
    if let Some(spouses) = indices.spouses.get(a) {
        for (s, info) in spouses {
            if s == b {
                continue;
            }
            let rel = blood_and_step(indices, s, b);
            if let Some(first) = rel.into_iter().find(|r| !matches!(r, Relationship::None)) {
                out.push(Relationship::Affinal {
                    subtype: AffinalSubtype::ViaSpouse,
                    spouse_id: s.clone(),
                    blood_rel: Box::new(first),
                    is_ex_union: !info.active,
                });
            }
        }
    }
    if let Some(spouses) = indices.spouses.get(b) {
        for (s, info) in spouses {
            if s == a {
                continue;
            }
            let rel = blood_and_step(indices, a, s);
            if let Some(first) = rel.into_iter().find(|r| !matches!(r, Relationship::None)) {
                out.push(Relationship::Affinal {
                    subtype: AffinalSubtype::ViaBloodSpouse,
                    spouse_id: s.clone(),
                    blood_rel: Box::new(first),
                    is_ex_union: !info.active,
                });
            }
        }
    }
}

fn co_affinal(indices: &Indices, a: &str, b: &str, out: &mut Vec<Relationship>) {
    let active_spouse = |id: &str| -> Option<String> {
        indices
            .spouses
            .get(id)
            .into_iter()
            .flatten()
            .find(|(_, info)| info.active)
            .map(|(s, _)| s.clone())
    };
    let (Some(sa), Some(sb)) = (active_spouse(a), active_spouse(b)) else {
        return;
    };
    if sa == b || sb == a || sa == sb {
        return;
    }
    let rel = blood_and_step(indices, &sa, &sb);
    if let Some(first) = rel.into_iter().find(|r| !matches!(r, Relationship::None)) {
        out.push(Relationship::CoAffinal {
            spouse_a: sa,
            spouse_b: sb,
            blood_rel: Box::new(first),
        });
    }
}

/// Generalized two-hop affinal search: for each blood relative `r` of `a`
/// reachable by lineage, if `r` has an active spouse `s` with any lineage
/// path to `b`, the pair is related through that one hop (spec §4.4.3 point
/// 8). Limited to direct lineage relatives of `a` rather than the full
/// relative closure, to keep the search bounded.
fn extended_affinal(indices: &Indices, a: &str, b: &str, out: &mut Vec<Relationship>) {
    let anc_a = ancestors(indices, a);
    let relatives: Vec<&String> = anc_a.keys().filter(|id| id.as_str() != a).collect();
    for r in relatives {
        let Some(spouses) = indices.spouses.get(r) else {
            continue;
        };
        for (s, info) in spouses {
            if !info.active || s == a || s == b {
                continue;
            }
            let rel_b = blood_and_step(indices, s, b);
            let Some(rel_b_found) = rel_b.into_iter().find(|x| {
                matches!(x, Relationship::Lineage { .. })
            }) else {
                continue;
            };
            let rel_a = blood_and_step(indices, a, r);
            let Some(rel_a_found) = rel_a.into_iter().find(|x| {
                matches!(x, Relationship::Lineage { .. })
            }) else {
                continue;
            };
            out.push(Relationship::ExtendedAffinal {
                spouse1: r.clone(),
                spouse2: s.clone(),
                rel_a: Box::new(rel_a_found),
                rel_b: Box::new(rel_b_found),
            });
        }
    }
}

fn dedup_key(r: &Relationship) -> String {
    match r {
        Relationship::Identity => "identity".to_string(),
        Relationship::Union { target, .. } => format!("union:{target}"),
        Relationship::Lineage { dist_a, dist_b, is_step, lineage_a, lineage_b, .. } => {
            format!("lineage:{dist_a}:{dist_b}:{is_step}:{lineage_a:?}:{lineage_b:?}")
        }
        Relationship::StepParent { parent_id, .. } => format!("stepparent:{parent_id}"),
        Relationship::StepChild { child_id, .. } => format!("stepchild:{child_id}"),
        Relationship::StepSibling { parent_a, parent_b, .. } => {
            format!("stepsibling:{parent_a}:{parent_b}")
        }
        Relationship::Affinal { subtype, spouse_id, .. } => format!("affinal:{subtype:?}:{spouse_id}"),
        Relationship::CoAffinal { spouse_a, spouse_b, .. } => format!("coaffinal:{spouse_a}:{spouse_b}"),
        Relationship::ExtendedAffinal { spouse1, spouse2, .. } => {
            format!("extaffinal:{spouse1}:{spouse2}")
        }
        Relationship::None => "none".to_string(),
    }
}

impl std::fmt::Debug for AffinalSubtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AffinalSubtype::ViaSpouse => write!(f, "ViaSpouse"),
            AffinalSubtype::ViaBloodSpouse => write!(f, "ViaBloodSpouse"),
        }
    }
}

fn dedup(results: Vec<Relationship>) -> Vec<Relationship> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for r in results {
        if seen.insert(dedup_key(&r)) {
            out.push(r);
        }
    }
    out
}

/// Spec §4.4.3 point 10. Applies the documented priority rules; see
/// DESIGN.md for which of the original's finer-grained rules are folded
/// into the simpler "a more specific relation always wins" check below.
fn filter_redundant(results: Vec<Relationship>) -> Vec<Relationship> {
    let has_extended = results.iter().any(|r| matches!(r, Relationship::ExtendedAffinal { .. }));
    let has_other_specific = results
        .iter()
        .any(|r| !matches!(r, Relationship::ExtendedAffinal { .. } | Relationship::None));

    let has_step_parent = results.iter().any(|r| matches!(r, Relationship::StepParent { .. }));
    let has_step_child = results.iter().any(|r| matches!(r, Relationship::StepChild { .. }));
    let has_step_sibling = results.iter().any(|r| matches!(r, Relationship::StepSibling { .. }));
    let has_non_step_lineage = results.iter().any(|r| {
        matches!(r, Relationship::Lineage { is_step: false, .. })
    });
    let has_direct_non_step_lineage = results.iter().any(|r| {
        matches!(r, Relationship::Lineage { is_step: false, dist_a, dist_b, .. } if *dist_a == 0 || *dist_b == 0)
    });

    results
        .into_iter()
        .filter(|r| {
            if has_extended && has_other_specific {
                if matches!(r, Relationship::ExtendedAffinal { .. }) {
                    return false;
                }
            }
            match r {
                Relationship::Lineage { is_step: true, dist_b, .. } if has_step_parent && *dist_b == 1 => false,
                Relationship::Lineage { is_step: true, dist_a, .. } if has_step_child && *dist_a == 1 => false,
                Relationship::Lineage { is_step: true, .. } if has_step_sibling => false,
                Relationship::Affinal { subtype: AffinalSubtype::ViaSpouse, .. }
                    if has_step_parent =>
                {
                    false
                }
                Relationship::Lineage { is_step: true, .. } if has_non_step_lineage => false,
                Relationship::Affinal { .. } if has_direct_non_step_lineage => false,
                _ => true,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::postprocess::postprocess;

    fn build(text: &str) -> Indices {
        let mut doc = parse(text);
        postprocess(&mut doc);
        Indices::build(&doc)
    }

    #[test]
    fn identity() {
        let indices = build("HEAD_FORMAT: v1\nID: A\n");
        assert_eq!(calculate(&indices, "A", "A"), vec![Relationship::Identity]);
    }

    #[test]
    fn direct_spouse() {
        let indices = build("HEAD_FORMAT: v1\nID: A\nUNION: B|MARR|1990|..|\n---\nID: B\n");
        let rels = calculate(&indices, "A", "B");
        assert!(matches!(rels[0], Relationship::Union { active: true, .. }));
    }

    #[test]
    fn full_siblings() {
        let indices = build(
            "HEAD_FORMAT: v1\nID: A\nPARENT: P|BIO\nPARENT: Q|BIO\n\
             ---\nID: B\nPARENT: P|BIO\nPARENT: Q|BIO\n\
             ---\nID: P\n---\nID: Q\n",
        );
        let rels = calculate(&indices, "A", "B");
        // P and Q are partners by shared child (A, B), so they count as one
        // lineage, not two — plain full siblings, not "double" siblings.
        assert!(rels.iter().any(|r| matches!(
            r,
            Relationship::Lineage {
                dist_a: 1,
                dist_b: 1,
                is_half: false,
                is_ambiguous: false,
                is_double: false,
                ..
            }
        )));
    }

    #[test]
    fn half_cousins_sharing_one_grandparent() {
        let indices = build(
            "HEAD_FORMAT: v1\nID: A\nPARENT: PA|BIO\n\
             ---\nID: B\nPARENT: PB|BIO\n\
             ---\nID: PA\nPARENT: GP|BIO\nPARENT: X|BIO\n\
             ---\nID: PB\nPARENT: GP|BIO\nPARENT: Y|BIO\n\
             ---\nID: GP\n---\nID: X\n---\nID: Y\n",
        );
        let rels = calculate(&indices, "A", "B");
        assert!(rels.iter().any(|r| matches!(
            r,
            Relationship::Lineage { dist_a: 2, dist_b: 2, is_half: true, is_double: false, .. }
        )));
    }

    #[test]
    fn double_first_cousins_via_two_unrelated_couples() {
        let indices = build(
            "HEAD_FORMAT: v1\nID: A\nPARENT: P1|BIO\nPARENT: Q1|BIO\n\
             ---\nID: B\nPARENT: P2|BIO\nPARENT: Q2|BIO\n\
             ---\nID: P1\nPARENT: GP|BIO\n---\nID: P2\nPARENT: GP|BIO\n\
             ---\nID: Q1\nPARENT: GQ|BIO\n---\nID: Q2\nPARENT: GQ|BIO\n\
             ---\nID: GP\n---\nID: GQ\n",
        );
        let rels = calculate(&indices, "A", "B");
        // Two unrelated LCA couples (GP and GQ are not partners) => double,
        // and not half — scenario 8 in the worked examples.
        assert!(rels.iter().any(|r| matches!(
            r,
            Relationship::Lineage { dist_a: 2, dist_b: 2, is_half: false, is_double: true, .. }
        )));
    }

    #[test]
    fn half_siblings_with_positive_proof() {
        let indices = build(
            "HEAD_FORMAT: v1\nID: A\nPARENT: P|BIO\nPARENT: Q|BIO\n\
             ---\nID: B\nPARENT: P|BIO\nPARENT: R|BIO\n\
             ---\nID: P\n---\nID: Q\n---\nID: R\n",
        );
        let rels = calculate(&indices, "A", "B");
        assert!(rels.iter().any(|r| matches!(
            r,
            Relationship::Lineage { is_half: true, .. }
        )));
    }

    #[test]
    fn ambiguous_sibling_with_one_known_parent() {
        let indices = build(
            "HEAD_FORMAT: v1\nID: A\nPARENT: P|BIO\n\
             ---\nID: B\nPARENT: P|BIO\nPARENT: Q|BIO\n---\nID: P\n---\nID: Q\n",
        );
        let rels = calculate(&indices, "A", "B");
        assert!(rels.iter().any(|r| matches!(
            r,
            Relationship::Lineage { is_ambiguous: true, .. }
        )));
    }

    #[test]
    fn no_relationship_returns_none_variant() {
        let indices = build("HEAD_FORMAT: v1\nID: A\n---\nID: B\n");
        let rels = calculate(&indices, "A", "B");
        assert_eq!(rels, vec![Relationship::None]);
    }

    #[test]
    fn step_parent_collision_drops_redundant_lineage() {
        let indices = build(
            "HEAD_FORMAT: v1\nID: B\nPARENT: P|BIO\nPARENT: A|STE\n\
             ---\nID: A\nUNION: P|MARR|1990|..|\n---\nID: P\n",
        );
        let rels = calculate(&indices, "B", "A");
        assert!(rels.iter().any(|r| matches!(r, Relationship::StepParent { .. })));
        assert!(!rels.iter().any(|r| matches!(r, Relationship::Lineage { is_step: true, .. })));
    }
}
