//! Controlled vocabularies used by the validator (spec §4.2 point 5, Glossary).
use unicase::UniCase;

const PARENT_TYPES: &[&str] = &["BIO", "ADO", "LEGL", "SURR", "DONR", "STE", "FOS"];
const UNION_TYPES: &[&str] = &["MARR", "CIVL", "PART", "UNK"];
const UNION_REASONS: &[&str] = &["DIV", "SEP", "WID", "ANN", "VOID"];
const NAME_TYPES: &[&str] = &[
    "BIRTH", "MARR", "ADO", "IMM", "TRAN", "AKA", "NICK", "PROF", "REL", "UNK",
];
const NAME_STATUSES: &[&str] = &["PREF"];
const ASSOC_ROLES: &[&str] = &[
    "GODP", "GODC", "SPON", "OFFI", "WITN", "EXEC", "GUAR", "WARD", "INFO", "MAST", "APPR",
    "SERV", "NEIG", "ENSL", "OWNR",
];

fn in_set(value: &str, set: &[&str]) -> bool {
    if value.is_empty() {
        return true; // absent/omitted segments are not a vocabulary violation
    }
    set.iter().any(|s| UniCase::new(s) == UniCase::new(value))
}

#[must_use]
pub fn is_valid_parent_type(value: &str) -> bool {
    in_set(value, PARENT_TYPES)
}

#[must_use]
pub fn is_valid_union_type(value: &str) -> bool {
    in_set(value, UNION_TYPES)
}

#[must_use]
pub fn is_valid_union_reason(value: &str) -> bool {
    in_set(value, UNION_REASONS)
}

#[must_use]
pub fn is_valid_name_type(value: &str) -> bool {
    in_set(value, NAME_TYPES)
}

#[must_use]
pub fn is_valid_name_status(value: &str) -> bool {
    in_set(value, NAME_STATUSES)
}

#[must_use]
pub fn is_valid_assoc_role(value: &str) -> bool {
    in_set(value, ASSOC_ROLES)
}

/// Parent types excluded from blood traversal but still stored (spec Glossary).
#[must_use]
pub fn is_step_or_foster(value: &str) -> bool {
    let v = UniCase::new(value);
    v == UniCase::new("STE") || v == UniCase::new("FOS") || v == UniCase::new("STE_EX")
}

/// Lineage parent types counted toward blood ancestry (spec §4.4.1).
#[must_use]
pub fn is_lineage_type(value: &str) -> bool {
    value.is_empty() || ["BIO", "ADO", "LEGL", "SURR", "DONR"]
        .iter()
        .any(|s| UniCase::new(*s) == UniCase::new(value))
}
