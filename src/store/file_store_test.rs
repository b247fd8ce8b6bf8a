use std::collections::HashSet;

use super::*;
use crate::StoreConfig;

fn store_in(dir: &std::path::Path) -> FileWatchStore {
    FileWatchStore::new(&StoreConfig {
        data_dir: dir.to_path_buf(),
        log_dir: dir.join("logs"),
    })
}

fn write(
    dir: &std::path::Path,
    name: &str,
    body: &str,
) {
    std::fs::write(dir.join(name), body).unwrap();
}

#[test]
fn missing_documents_yield_empty_watch_sets() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = store_in(temp_dir.path());

    assert!(store.account_watches().is_empty());
    assert!(store.callsign_watches().is_empty());
    assert!(store.type_watches().is_empty());
    assert!(store.keyword_watches(RuleBook::A1).is_empty());
    assert!(store.fake_name_patterns().is_empty());
    assert_eq!(store.highest_account(), 0);
    assert!(store.seen_advisories().is_empty());
}

#[test]
fn malformed_documents_yield_empty_watch_sets() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "callsign_watches.json", "{not json");
    write(temp_dir.path(), "a1_keywords.json", "42");
    let store = store_in(temp_dir.path());

    assert!(store.callsign_watches().is_empty());
    assert!(store.keyword_watches(RuleBook::A1).is_empty());
}

#[test]
fn labeled_watches_parse_pattern_to_label_objects() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "callsign_watches.json", r#"{"UAL*": "United", "BOS_CTR": "Boston"}"#);
    write(temp_dir.path(), "account_watches.json", r#"{"123456": "John", "bogus": "ignored"}"#);
    let store = store_in(temp_dir.path());

    let callsigns = store.callsign_watches();
    assert_eq!(callsigns.len(), 2);
    assert!(callsigns.contains(&PatternWatch {
        pattern: "UAL*".to_string(),
        label: "United".to_string(),
    }));

    // Non-numeric account ids are skipped, not fatal
    let accounts = store.account_watches();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].cid, 123456);
}

#[test]
fn keyword_lists_accept_bare_and_wrapped_shapes() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "a1_keywords.json", r#"["FAKE", "TEST*"]"#);
    write(temp_dir.path(), "a9_keywords.json", r#"{"keywords": ["P56"]}"#);
    write(temp_dir.path(), "fake_names.json", r#"{"fake_names": ["FAKE*"]}"#);
    let store = store_in(temp_dir.path());

    assert_eq!(store.keyword_watches(RuleBook::A1), vec!["FAKE", "TEST*"]);
    assert_eq!(store.keyword_watches(RuleBook::A9), vec!["P56"]);
    assert_eq!(store.fake_name_patterns(), vec!["FAKE*"]);
}

#[test]
fn policy_mute_defaults_to_muted_when_unreadable() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = store_in(temp_dir.path());
    assert!(store.policy_alerts_muted());

    write(temp_dir.path(), "policy_alerts.json", r#"{"muted": false}"#);
    assert!(!store.policy_alerts_muted());

    // Advisories default the other way
    assert!(!store.advisories_muted());
}

#[test]
fn highest_account_round_trips() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = store_in(temp_dir.path());

    store.record_highest_account(1_800_000).unwrap();
    assert_eq!(store.highest_account(), 1_800_000);
}

#[test]
fn seen_advisories_round_trip_and_keep_the_mute_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "advisory_state.json", r#"{"muted": true, "seen_events": ["a_1"]}"#);
    let store = store_in(temp_dir.path());

    let mut seen = store.seen_advisories();
    assert!(seen.contains("a_1"));
    seen.insert("b_2".to_string());
    store.record_seen_advisories(&seen).unwrap();

    assert!(store.seen_advisories().contains("b_2"));
    // The mute flag survived the seen-set update
    assert!(store.advisories_muted());
}

#[test]
fn seen_bulletins_round_trip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = store_in(temp_dir.path());

    let seen: HashSet<String> = ["digest1".to_string()].into_iter().collect();
    store.record_seen_bulletins(&seen).unwrap();

    assert!(store.seen_bulletins().contains("digest1"));
}
