//! Date literal grammar validation (spec §4.2 point 6, §6.1).
//!
//! This is a small, always-on grammar distinct from a calendar library: digits may
//! be the wildcard `X`, and "months" 21–24 denote seasons rather than a Gregorian
//! month. No calendar-arithmetic crate models this, so it is hand-rolled — see
//! DESIGN.md for why `chrono` was dropped from the dependency set.

fn is_date_digit(c: char) -> bool {
    c.is_ascii_digit() || c == 'X'
}

/// Returns `true` if `literal` matches the FTT date grammar.
#[must_use]
pub fn is_valid_date_literal(literal: &str) -> bool {
    if literal == "?" || literal == ".." {
        return true;
    }
    if let Some(range) = literal.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return is_valid_range(range);
    }
    is_valid_simple_date(literal)
}

fn is_valid_range(inner: &str) -> bool {
    let Some((x, y)) = inner.split_once("..") else {
        return false;
    };
    if x.is_empty() && y.is_empty() {
        return false;
    }
    (x.is_empty() || is_valid_simple_date(x)) && (y.is_empty() || is_valid_simple_date(y))
}

fn is_valid_simple_date(literal: &str) -> bool {
    let mut s = literal;
    if let Some(stripped) = s.strip_suffix(['?', '~']) {
        s = stripped;
    }
    let s = s.strip_prefix('-').unwrap_or(s);

    let bytes: Vec<char> = s.chars().collect();
    if bytes.len() < 4 || !bytes[..4].iter().all(|&c| is_date_digit(c)) {
        return false;
    }
    if bytes.len() == 4 {
        return true;
    }
    if bytes.len() < 7 || bytes[4] != '-' || !bytes[5..7].iter().all(|&c| is_date_digit(c)) {
        return false;
    }
    let month_str: String = bytes[5..7].iter().collect();
    let month = month_str.parse::<u32>().ok();
    let month_is_concrete = !month_str.contains('X');
    if month_is_concrete {
        match month {
            Some(m) if (1..=12).contains(&m) || (21..=24).contains(&m) => {}
            _ => return false,
        }
    }
    let is_season = month_is_concrete && matches!(month, Some(21..=24));

    if bytes.len() == 7 {
        return true;
    }
    if is_season {
        // Seasons disallow a day component.
        return false;
    }
    if bytes.len() != 10 || bytes[7] != '-' || !bytes[8..10].iter().all(|&c| is_date_digit(c)) {
        return false;
    }
    let day_str: String = bytes[8..10].iter().collect();
    if day_str.contains('X') {
        return true;
    }
    let day: u32 = match day_str.parse() {
        Ok(d) => d,
        Err(_) => return false,
    };
    if day == 0 {
        return false;
    }
    if month_is_concrete {
        let max_day = match month.unwrap() {
            4 | 6 | 9 | 11 => 30,
            2 => 29, // leap-safety allowance, spec §4.2 point 6
            _ => 31,
        };
        day <= max_day
    } else {
        day <= 31
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_open_and_unknown() {
        assert!(is_valid_date_literal("?"));
        assert!(is_valid_date_literal(".."));
    }

    #[test]
    fn accepts_bounded_ranges_with_one_open_end() {
        assert!(is_valid_date_literal("[..1900]"));
        assert!(is_valid_date_literal("[1900..]"));
        assert!(is_valid_date_literal("[1800..1900]"));
    }

    #[test]
    fn rejects_fully_open_range() {
        assert!(!is_valid_date_literal("[..]"));
    }

    #[test]
    fn accepts_simple_dates_with_suffix_qualifiers() {
        assert!(is_valid_date_literal("1900"));
        assert!(is_valid_date_literal("1900?"));
        assert!(is_valid_date_literal("1900~"));
        assert!(is_valid_date_literal("-1900"));
        assert!(is_valid_date_literal("1900-03"));
        assert!(is_valid_date_literal("1900-03-15"));
    }

    #[test]
    fn accepts_seasons_without_day() {
        assert!(is_valid_date_literal("1900-21"));
        assert!(is_valid_date_literal("1900-24"));
        assert!(!is_valid_date_literal("1900-21-05"));
    }

    #[test]
    fn accepts_wildcard_digits() {
        assert!(is_valid_date_literal("19XX"));
        assert!(is_valid_date_literal("19XX-0X"));
        assert!(is_valid_date_literal("19XX-0X-XX"));
    }

    #[test]
    fn rejects_bad_month_and_day() {
        assert!(!is_valid_date_literal("1900-13"));
        assert!(!is_valid_date_literal("1900-02-30"));
        assert!(!is_valid_date_literal("1900-04-31"));
        assert!(!is_valid_date_literal("1900-00-01"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(!is_valid_date_literal("not a date"));
        assert!(!is_valid_date_literal("19"));
    }
}
