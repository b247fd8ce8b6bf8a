//! Display-name policy evaluation.
//!
//! The network's conduct rules require members to connect under their real
//! name, an appropriate shortening, or their account id. This module
//! evaluates one display name against that rule set and collects every
//! violated reason; it holds no state. Alert suppression bookkeeping lives
//! with the caller, with [`prune`] recomputing the set each cycle.


use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::Participant;
use crate::Role;
use crate::Selector;

/// A suspected display-name violation for one participant.
#[derive(Debug, Clone)]
pub struct Violation {
    pub name: String,
    pub cid: u64,
    pub callsign: String,
    pub role: Role,
    pub reasons: Vec<String>,
    pub frequency: Option<String>,
    pub position: Option<(f64, f64)>,
}

impl Violation {
    /// One alert per (account id, callsign) pair until the pair leaves the
    /// live snapshot.
    pub fn suppression_key(&self) -> String {
        format!("{}:{}", self.cid, self.callsign)
    }
}

lazy_static! {
    // Trailing 3-4 char alphanumeric code, e.g. "NC0", "KW91"
    static ref HOME_BASE_SUFFIX: Regex =
        Regex::new(r"\s+[A-Z0-9]{3,4}$").expect("static regex");
    // Apostrophe, hyphen, period, comma, parentheses, underscore and
    // question mark stay allowed
    static ref INVALID_CHARACTERS: Regex =
        Regex::new(r#"[!@#$%^&*+=\[\]{};:<>/\\|`~]"#).expect("static regex");
}

/// Evaluates one participant's display name against the policy rule set.
///
/// Returns every violated reason, or `None` when the name is compliant.
/// `fake_names` are precompiled wildcard selectors; the first matching
/// pattern stops that check.
pub fn check_violation(
    participant: &Participant<'_>,
    fake_names: &[(String, Selector)],
) -> Option<Violation> {
    let name_raw = participant.display_name().trim();
    let cid = participant.cid();
    let cid_str = cid.to_string();

    // Strip a trailing home-base suffix before evaluation
    let mut name = HOME_BASE_SUFFIX.replace(name_raw, "").trim().to_string();
    if name.is_empty() {
        name = name_raw.to_string();
    }

    // The bare account id is always compliant, with or without the suffix
    let cid_with_suffix = Regex::new(&format!(r"^{}\s+[A-Z0-9]{{3,4}}$", regex::escape(&cid_str)))
        .expect("escaped account id regex");
    if name == cid_str || cid_with_suffix.is_match(name_raw) {
        return None;
    }

    let mut reasons: Vec<String> = Vec::new();

    if name.chars().any(|c| c.is_ascii_digit()) && !name.contains(&cid_str) {
        reasons.push(format!("Contains numbers but CID {} not found in name", cid));
    }

    if INVALID_CHARACTERS.is_match(&name) {
        reasons.push("Contains invalid special characters".to_string());
    }

    for (pattern, selector) in fake_names {
        if selector.matches(&name) {
            reasons.push(format!("Matches fake name pattern: {}", pattern));
            break;
        }
    }

    if name.chars().count() < 2 {
        reasons.push("Name too short (less than 2 characters)".to_string());
    }

    // Repeated-character heuristic. The account-id-exempt case never
    // reaches this point.
    let clean: String = name.chars().filter(|c| !matches!(c, ' ' | '\'' | '-' | ',')).collect();
    let distinct: HashSet<char> = clean.chars().collect();
    if distinct.len() <= 2 && clean.chars().count() > 3 {
        reasons.push("Repeated characters".to_string());
    }

    if reasons.is_empty() {
        return None;
    }

    Some(Violation {
        name,
        cid,
        callsign: participant.callsign().to_string(),
        role: participant.role(),
        reasons,
        frequency: participant.frequency().map(str::to_string),
        position: participant.position(),
    })
}

/// Recomputes the suppression set as exactly the already-alerted identities
/// still present in the latest scan. Pure; stale entries are dropped,
/// nothing is added.
pub fn prune(
    old_set: &HashSet<String>,
    current_keys: &HashSet<String>,
) -> HashSet<String> {
    old_set.intersection(current_keys).cloned().collect()
}
