use std::collections::HashSet;
use std::sync::Arc;

use super::*;
use crate::MockNotifier;
use crate::MockWatchStore;
use crate::Settings;

fn settings() -> Arc<Settings> {
    Arc::new(Settings::default())
}

fn event(
    identifier: &str,
    recorded_at: u64,
) -> AdvisoryEvent {
    AdvisoryEvent {
        identifier: Some(identifier.to_string()),
        recorded_at: Some(recorded_at),
        cid: Some(123456),
        callsign: Some("N123AB".to_string()),
        name: Some("John Smith".to_string()),
        zones: vec!["P-56A".to_string()],
        exit_detected_at: None,
        exit_confirmed_at: None,
    }
}

fn store_with_seen(seen: Vec<&str>) -> MockWatchStore {
    let seen: HashSet<String> = seen.into_iter().map(String::from).collect();
    let mut store = MockWatchStore::new();
    store.expect_advisories_muted().returning(|| false);
    store.expect_seen_advisories().returning(move || seen.clone());
    store.expect_record_seen_advisories().returning(|_| Ok(()));
    store
}

/// # Case 1: New events alert and are recorded as seen
#[tokio::test]
async fn test_advisory_tick_case1() {
    let mut source = MockAdvisorySource::new();
    source
        .expect_fetch_events()
        .times(2)
        .returning(|| Ok(vec![event("track1", 1000)]));

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_advisory()
        .withf(|advisory| {
            advisory.title == "Restricted-airspace intrusion detected: N123AB"
                && advisory.detail.contains("P-56A")
        })
        .times(1)
        .returning(|_| Ok(()));

    let mut monitor =
        AdvisoryMonitor::new(source, notifier, store_with_seen(vec![]), settings());
    monitor.tick().await.expect("first tick");
    // The same event again is deduplicated
    monitor.tick().await.expect("second tick");
}

/// # Case 2: Events already persisted as seen never re-alert
#[tokio::test]
async fn test_advisory_tick_case2() {
    let mut source = MockAdvisorySource::new();
    source.expect_fetch_events().times(1).returning(|| Ok(vec![event("track1", 1000)]));

    let notifier = MockNotifier::new();
    let mut monitor = AdvisoryMonitor::new(
        source,
        notifier,
        store_with_seen(vec!["track1_1000"]),
        settings(),
    );
    monitor.tick().await.expect("tick should succeed");
}

/// # Case 3: A flood of new events is capped per cycle
#[tokio::test]
async fn test_advisory_tick_case3() {
    let mut source = MockAdvisorySource::new();
    source.expect_fetch_events().times(1).returning(|| {
        Ok((0u64..8).map(|i| event(&format!("track{}", i), 1000 + i)).collect())
    });

    let mut notifier = MockNotifier::new();
    notifier.expect_send_advisory().times(5).returning(|_| Ok(()));

    let mut monitor =
        AdvisoryMonitor::new(source, notifier, store_with_seen(vec![]), settings());
    monitor.tick().await.expect("tick should succeed");
}

/// # Case 4: Muted advisories skip fetching entirely
#[tokio::test]
async fn test_advisory_tick_case4() {
    let mut source = MockAdvisorySource::new();
    source.expect_fetch_events().times(0);

    let mut store = MockWatchStore::new();
    store.expect_advisories_muted().returning(|| true);
    store.expect_seen_advisories().returning(HashSet::new);

    let notifier = MockNotifier::new();
    let mut monitor = AdvisoryMonitor::new(source, notifier, store, settings());
    monitor.tick().await.expect("tick should succeed");
}

/// # Case 5: Events without a recorded timestamp are ignored
#[tokio::test]
async fn test_advisory_tick_case5() {
    let mut source = MockAdvisorySource::new();
    source.expect_fetch_events().times(1).returning(|| {
        let mut untimed = event("track1", 0);
        untimed.recorded_at = None;
        Ok(vec![untimed])
    });

    let notifier = MockNotifier::new();
    let mut monitor =
        AdvisoryMonitor::new(source, notifier, store_with_seen(vec![]), settings());
    monitor.tick().await.expect("tick should succeed");
}

#[test]
fn exit_events_render_as_exit_confirmations() {
    let mut exited = event("track1", 1000);
    exited.exit_detected_at = Some(1200);

    let store = store_with_seen(vec![]);
    let monitor = AdvisoryMonitor::new(
        MockAdvisorySource::new(),
        MockNotifier::new(),
        store,
        settings(),
    );
    let advisory = monitor.render(&exited);

    assert_eq!(advisory.title, "Restricted-airspace exit confirmed: N123AB");
    assert_eq!(advisory.recorded_at, Some(1000));
}
