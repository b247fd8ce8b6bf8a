use std::sync::Arc;

use super::*;
use crate::test_utils::sample_pilot;
use crate::MockFeedSource;
use crate::MockNotifier;
use crate::MockWatchStore;
use crate::Settings;
use crate::Snapshot;

fn settings() -> Arc<Settings> {
    Arc::new(Settings::default())
}

fn unmuted_store() -> MockWatchStore {
    let mut store = MockWatchStore::new();
    store.expect_policy_alerts_muted().returning(|| false);
    store.expect_fake_name_patterns().returning(Vec::new);
    store
}

fn snapshot_with_name(name: &str) -> Snapshot {
    let mut pilot = sample_pilot(123456, "UAL123");
    pilot.name = name.to_string();
    Snapshot {
        pilots: vec![pilot],
        ..Snapshot::default()
    }
}

/// # Case 1: A violating name alerts once, then stays suppressed
///
/// ## Validation criteria:
/// 1. Exactly one alert across two cycles with the same violator present
#[tokio::test]
async fn test_policy_tick_case1() {
    let mut feed = MockFeedSource::new();
    feed.expect_fetch_snapshot().times(2).returning(|| Ok(snapshot_with_name("AAAA")));

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_alert()
        .withf(|alert| {
            alert.cid == 123456 && alert.reasons.contains(&"Repeated characters".to_string())
        })
        .times(1)
        .returning(|_| Ok(()));

    let mut monitor = NamePolicyMonitor::new(feed, notifier, unmuted_store(), settings());
    monitor.tick().await.expect("first tick");
    monitor.tick().await.expect("second tick");
}

/// # Case 2: Once the violator disconnects, a reconnect re-alerts
#[tokio::test]
async fn test_policy_tick_case2() {
    let mut feed = MockFeedSource::new();
    let mut sequence = mockall::Sequence::new();
    feed.expect_fetch_snapshot()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|| Ok(snapshot_with_name("AAAA")));
    feed.expect_fetch_snapshot()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|| Ok(Snapshot::default()));
    feed.expect_fetch_snapshot()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|| Ok(snapshot_with_name("AAAA")));

    let mut notifier = MockNotifier::new();
    // The empty cycle pruned the suppression, so the pair alerts again
    notifier.expect_send_alert().times(2).returning(|_| Ok(()));

    let mut monitor = NamePolicyMonitor::new(feed, notifier, unmuted_store(), settings());
    monitor.tick().await.expect("first tick");
    monitor.tick().await.expect("second tick");
    monitor.tick().await.expect("third tick");
}

/// # Case 3: Muted alerts stay silent but pruning still runs
#[tokio::test]
async fn test_policy_tick_case3() {
    let mut feed = MockFeedSource::new();
    feed.expect_fetch_snapshot().times(1).returning(|| Ok(snapshot_with_name("AAAA")));

    let mut store = MockWatchStore::new();
    store.expect_policy_alerts_muted().returning(|| true);
    store.expect_fake_name_patterns().returning(Vec::new);

    let notifier = MockNotifier::new();
    let mut monitor = NamePolicyMonitor::new(feed, notifier, store, settings());
    monitor.tick().await.expect("tick should succeed");
}

/// # Case 4: Compliant names never alert
#[tokio::test]
async fn test_policy_tick_case4() {
    let mut feed = MockFeedSource::new();
    feed.expect_fetch_snapshot().times(1).returning(|| Ok(snapshot_with_name("John Smith")));

    let notifier = MockNotifier::new();
    let mut monitor = NamePolicyMonitor::new(feed, notifier, unmuted_store(), settings());
    monitor.tick().await.expect("tick should succeed");
}

/// # Case 5: Configured fake-name patterns flag matching names
#[tokio::test]
async fn test_policy_tick_case5() {
    let mut feed = MockFeedSource::new();
    feed.expect_fetch_snapshot().times(1).returning(|| Ok(snapshot_with_name("Fake Pilot")));

    let mut store = MockWatchStore::new();
    store.expect_policy_alerts_muted().returning(|| false);
    store.expect_fake_name_patterns().returning(|| vec!["FAKE*".to_string()]);

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_alert()
        .withf(|alert| {
            alert.reasons.contains(&"Matches fake name pattern: FAKE*".to_string())
        })
        .times(1)
        .returning(|_| Ok(()));

    let mut monitor = NamePolicyMonitor::new(feed, notifier, store, settings());
    monitor.tick().await.expect("tick should succeed");
}
