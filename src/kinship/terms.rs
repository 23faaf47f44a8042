//! Gendered English term rendering (spec §4.4.4).

use super::ancestors::LineageType;
use super::relationship::{AffinalSubtype, Relationship};

/// The recorded sex of the entity a term names, used to pick a gendered base
/// term. `Unknown` falls back to the neutral term ("Parent", "Sibling", ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    #[must_use]
    pub fn from_sex_segment(value: &str) -> Gender {
        match value {
            "M" => Gender::Male,
            "F" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

/// The rendered term and a longer human-readable detail string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Description {
    pub term: String,
    pub detail: String,
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// `extra` generations beyond "parent"/"child": 0 -> none, 1 -> "Grand",
/// 2 -> "Great-Grand", n>=3 -> "{n-1}x Great-Grand" (great-great-grandparent
/// is conventionally "2x great-grandparent", not "1x great-great-grand").
fn generation_prefix(extra: u32) -> String {
    match extra {
        0 => String::new(),
        1 => "Grand".to_string(),
        n => {
            let multiplier = n - 1;
            if multiplier == 1 {
                "Great-Grand".to_string()
            } else {
                format!("{multiplier}x Great-Grand")
            }
        }
    }
}

fn ancestor_term(gender: Gender, generations: u32) -> String {
    let base = match gender {
        Gender::Male => "Father",
        Gender::Female => "Mother",
        Gender::Unknown => "Parent",
    };
    format!("{}{base}", generation_prefix(generations))
}

fn descendant_term(gender: Gender, generations: u32) -> String {
    let base = match gender {
        Gender::Male => "Son",
        Gender::Female => "Daughter",
        Gender::Unknown => "Child",
    };
    format!("{}{base}", generation_prefix(generations))
}

fn sibling_term(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "Brother",
        Gender::Female => "Sister",
        Gender::Unknown => "Sibling",
    }
}

fn avuncular_prefix(removed: u32) -> String {
    match removed {
        0 => String::new(),
        1 => "Great-".to_string(),
        n => format!("{}x Great-", n),
    }
}

fn avuncular_term(gender: Gender, removed: u32) -> String {
    let base = match gender {
        Gender::Male => "Uncle",
        Gender::Female => "Aunt",
        Gender::Unknown => "Uncle/Aunt",
    };
    format!("{}{base}", avuncular_prefix(removed))
}

fn nibling_term(gender: Gender, removed: u32) -> String {
    let base = match gender {
        Gender::Male => "Nephew",
        Gender::Female => "Niece",
        Gender::Unknown => "Nephew/Niece",
    };
    format!("{}{base}", avuncular_prefix(removed))
}

fn cousin_term(dist_a: u32, dist_b: u32) -> String {
    let ordinal_degree = dist_a.min(dist_b).saturating_sub(1).max(1);
    let removed = dist_a.abs_diff(dist_b);
    let removed_suffix = if removed == 0 {
        String::new()
    } else if removed == 1 {
        " (1x Removed)".to_string()
    } else {
        format!(" ({removed}x Removed)")
    };
    format!("{} Cousin{removed_suffix}", ordinal(ordinal_degree))
}

fn lineage_base_term(gender: Gender, dist_a: u32, dist_b: u32) -> String {
    if dist_b == 0 {
        ancestor_term(gender, dist_a - 1)
    } else if dist_a == 0 {
        descendant_term(gender, dist_b - 1)
    } else if dist_a == 1 && dist_b == 1 {
        sibling_term(gender).to_string()
    } else if dist_a == 1 {
        avuncular_term(gender, dist_b - 2)
    } else if dist_b == 1 {
        nibling_term(gender, dist_a - 2)
    } else {
        cousin_term(dist_a, dist_b)
    }
}

fn adoption_prefix(lineage: LineageType, is_foster: bool) -> &'static str {
    if is_foster {
        "Foster "
    } else if lineage == LineageType::Ado {
        "Adoptive "
    } else {
        ""
    }
}

/// Renders `relationship` (as returned by `calculate(a, b)`) as "what `b` is
/// to `a`" — base terms (Father, Sister, 1st Cousin, ...) are gendered by the
/// entity being named, i.e. `b`'s recorded sex, not `a`'s (spec §4.4.4).
#[must_use]
pub fn describe(relationship: &Relationship, gender_b: Gender) -> Description {
    match relationship {
        Relationship::Identity => Description {
            term: "Self".to_string(),
            detail: "the same individual".to_string(),
        },
        Relationship::Union { active, reason, union_type, target } => {
            let base = if *active { "Spouse" } else { "Former Spouse" };
            let detail = match reason {
                Some(r) => format!("{union_type} union with {target}, ended ({r})"),
                None => format!("{union_type} union with {target}"),
            };
            Description { term: base.to_string(), detail }
        }
        Relationship::Lineage {
            dist_a,
            dist_b,
            is_step,
            is_ex_step,
            lineage_a,
            lineage_b,
            is_half,
            is_ambiguous,
            is_double,
            is_adoptive,
            is_foster,
            ..
        } => {
            let mut term = lineage_base_term(gender_b, *dist_a, *dist_b);
            let mut prefixes = Vec::new();
            if *is_ex_step {
                prefixes.push("Former Step-");
            } else if *is_step {
                prefixes.push("Step-");
            }
            if *is_half {
                prefixes.push("Half-");
            }
            if *is_double {
                prefixes.push("Double ");
            }
            let adoption = adoption_prefix(
                if *lineage_a == LineageType::Ado { *lineage_a } else { *lineage_b },
                *is_foster,
            );
            if !adoption.is_empty() && (*dist_a == 0 || *dist_b == 0) {
                prefixes.push(adoption);
            }
            term = format!("{}{}", prefixes.concat(), term);
            if *is_ambiguous {
                term.push_str(" (Ambiguous)");
            } else if *is_adoptive && !(*dist_a == 0 || *dist_b == 0) {
                term.push_str(" (Adoptive)");
            }
            Description {
                detail: format!("lineage distance {dist_a}/{dist_b}"),
                term,
            }
        }
        Relationship::StepParent { parent_id, is_ex } => Description {
            term: format!("{}Parent", if *is_ex { "Former Step-" } else { "Step-" }),
            detail: format!("step-parent via {parent_id}"),
        },
        Relationship::StepChild { child_id, is_ex } => Description {
            term: format!("{}Child", if *is_ex { "Former Step-" } else { "Step-" }),
            detail: format!("step-child via {child_id}"),
        },
        Relationship::StepSibling { parent_a, parent_b, union_active, .. } => Description {
            term: format!("Step-{}", sibling_term(gender_b)),
            detail: format!(
                "step-sibling via {parent_a}/{parent_b} ({})",
                if *union_active { "active union" } else { "former union" }
            ),
        },
        Relationship::Affinal { subtype, spouse_id, blood_rel, is_ex_union } => {
            let inner = describe(blood_rel, gender_b);
            let prefix = if *is_ex_union { "Former " } else { "" };
            let via = match subtype {
                AffinalSubtype::ViaSpouse => format!("via spouse {spouse_id}"),
                AffinalSubtype::ViaBloodSpouse => format!("via {spouse_id}'s spouse"),
            };
            Description {
                term: format!("{prefix}{}-in-law", inner.term),
                detail: format!("{} ({via})", inner.detail),
            }
        }
        Relationship::CoAffinal { spouse_a, spouse_b, blood_rel } => {
            let inner = describe(blood_rel, gender_b);
            Description {
                term: format!("Co-{}", inner.term),
                detail: format!("spouses {spouse_a} and {spouse_b} are related: {}", inner.detail),
            }
        }
        Relationship::ExtendedAffinal { spouse1, spouse2, rel_a, rel_b } => {
            let to_spouse1 = describe(rel_a, gender_b);
            let spouse1_to_b = describe(rel_b, Gender::Unknown);
            Description {
                term: format!("{} of {}-in-law", to_spouse1.term, spouse1_to_b.term),
                detail: format!("via {spouse1} and {spouse2}"),
            }
        }
        Relationship::None => Description {
            term: "No Known Relationship".to_string(),
            detail: "no path connects these individuals".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinship::ancestors::LineageType;

    fn plain_lineage(dist_a: u32, dist_b: u32) -> Relationship {
        Relationship::Lineage {
            dist_a,
            dist_b,
            is_step: false,
            is_ex_step: false,
            lineage_a: LineageType::Bio,
            lineage_b: LineageType::Bio,
            is_half: false,
            is_ambiguous: false,
            is_double: false,
            is_adoptive: false,
            is_foster: false,
        }
    }

    #[test]
    fn father_and_mother() {
        assert_eq!(describe(&plain_lineage(1, 0), Gender::Male).term, "Father");
        assert_eq!(describe(&plain_lineage(1, 0), Gender::Female).term, "Mother");
    }

    #[test]
    fn grandparent_chain() {
        assert_eq!(describe(&plain_lineage(2, 0), Gender::Male).term, "GrandFather");
        assert_eq!(describe(&plain_lineage(3, 0), Gender::Male).term, "Great-GrandFather");
        assert_eq!(describe(&plain_lineage(4, 0), Gender::Male).term, "2x Great-GrandFather");
    }

    #[test]
    fn sibling() {
        assert_eq!(describe(&plain_lineage(1, 1), Gender::Female).term, "Sister");
    }

    #[test]
    fn first_cousin() {
        assert_eq!(describe(&plain_lineage(2, 2), Gender::Unknown).term, "1st Cousin");
    }

    #[test]
    fn cousin_once_removed() {
        assert_eq!(describe(&plain_lineage(2, 3), Gender::Unknown).term, "1st Cousin (1x Removed)");
    }

    #[test]
    fn half_sibling_prefix() {
        let mut rel = plain_lineage(1, 1);
        if let Relationship::Lineage { is_half, .. } = &mut rel {
            *is_half = true;
        }
        assert_eq!(describe(&rel, Gender::Unknown).term, "Half-Sibling");
    }

    #[test]
    fn ambiguous_suffix() {
        let mut rel = plain_lineage(1, 1);
        if let Relationship::Lineage { is_ambiguous, .. } = &mut rel {
            *is_ambiguous = true;
        }
        assert_eq!(describe(&rel, Gender::Unknown).term, "Sibling (Ambiguous)");
    }

    #[test]
    fn none_relationship() {
        assert_eq!(describe(&Relationship::None, Gender::Unknown).term, "No Known Relationship");
    }
}
