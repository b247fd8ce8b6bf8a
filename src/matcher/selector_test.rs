use super::*;

fn matches(
    pattern: &str,
    candidate: &str,
) -> bool {
    Selector::compile(pattern).expect("pattern should compile").matches(candidate)
}

#[test]
fn exact_selector_should_match_case_insensitively() {
    assert!(matches("UAL123", "UAL123"));
    assert!(matches("ual123", "UAL123"));
    assert!(matches("UAL123", "ual123"));
    assert!(!matches("UAL123", "UAL1234"));
    assert!(!matches("UAL123", "AAL123"));
}

#[test]
fn wildcard_selector_should_expand_star_to_any_run() {
    assert!(matches("CXK*", "CXK123"));
    assert!(matches("CXK*", "CXK"));
    assert!(!matches("CXK*", "AA123"));
    assert!(matches("*CTR", "BOS_CTR"));
    assert!(matches("UAL*23", "UAL123"));
    assert!(!matches("UAL*23", "UAL124"));
}

#[test]
fn wildcard_matching_is_anchored_whole_string() {
    // "A*" must not match as a substring of a longer string
    assert!(matches("A*", "AAL123"));
    assert!(!matches("AL*", "AAL123"));
    assert!(!matches("*AL", "AAL123"));
}

#[test]
fn regex_metacharacters_in_patterns_are_literal() {
    assert!(matches("N123.A", "N123.A"));
    assert!(!matches("N123.A", "N123XA"));
    assert!(matches("A+B*", "A+B_TWR"));
}

#[test]
fn empty_candidate_never_matches() {
    assert!(!matches("*", ""));
    assert!(!matches("UAL123", ""));
}

#[test]
fn lone_star_matches_every_non_empty_candidate() {
    assert!(matches("*", "X"));
    assert!(matches("*", "ANY_CALLSIGN"));
}
