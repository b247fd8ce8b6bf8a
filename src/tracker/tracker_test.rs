use mockall::predicate::*;

use super::*;
use crate::Fingerprint;
use crate::MockNotifier;
use crate::NotifyError;

fn fingerprint(route: &str) -> Fingerprint {
    let mut fp = Fingerprint::default();
    fp.set("status", "pilot");
    fp.set("callsign", "UAL123");
    fp.set("server", "USA-EAST");
    fp.set("route", route);
    fp
}

fn observation(route: &str) -> Observation {
    Observation {
        label: "United".to_string(),
        role: crate::Role::Pilot,
        callsign: "UAL123".to_string(),
        cid: 123456,
        fingerprint: fingerprint(route),
        refresh_interval_secs: 300,
        military_rating: None,
    }
}

fn handle() -> MessageHandle {
    MessageHandle("42".to_string())
}

/// # Case 1: Cold start sends exactly one create tagged "initial"
///
/// ## Validation criteria:
/// 1. One send_online call with `updated_keys = ["initial"]`
/// 2. The key transitions to present with the observed fingerprint stored
#[tokio::test]
async fn test_observe_case1() {
    let mut tracker: WatchTracker<String> = WatchTracker::new(WatchKind::Callsign);
    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_online()
        .withf(|update| update.updated_keys == vec!["initial".to_string()])
        .times(1)
        .returning(|_| Ok(handle()));

    tracker.observe("UAL*".to_string(), Some(observation("DCT")), &notifier, 1000).await;

    assert!(tracker.is_present(&"UAL*".to_string()));
    assert_eq!(tracker.fingerprint(&"UAL*".to_string()), Some(&fingerprint("DCT")));
}

/// # Case 2: An unchanged observation inside the refresh window is silent
///
/// ## Validation criteria:
/// 1. Zero additional notify or edit calls on the second cycle
#[tokio::test]
async fn test_observe_case2() {
    let mut tracker: WatchTracker<String> = WatchTracker::new(WatchKind::Callsign);
    let mut notifier = MockNotifier::new();
    notifier.expect_send_online().times(1).returning(|_| Ok(handle()));
    notifier.expect_edit().times(0);

    tracker.observe("UAL*".to_string(), Some(observation("DCT")), &notifier, 1000).await;
    // 15 seconds later, same snapshot content
    tracker.observe("UAL*".to_string(), Some(observation("DCT")), &notifier, 1015).await;
}

/// # Case 3: A changed fingerprint edits in place with the sorted changed fields
#[tokio::test]
async fn test_observe_case3() {
    let mut tracker: WatchTracker<String> = WatchTracker::new(WatchKind::Callsign);
    let mut notifier = MockNotifier::new();
    notifier.expect_send_online().times(1).returning(|_| Ok(handle()));
    notifier
        .expect_edit()
        .withf(|handle_arg, update| {
            handle_arg == &handle() && update.updated_keys == vec!["route".to_string()]
        })
        .times(1)
        .returning(|_, _| Ok(()));

    tracker.observe("UAL*".to_string(), Some(observation("DCT")), &notifier, 1000).await;
    tracker.observe("UAL*".to_string(), Some(observation("GREKI DCT")), &notifier, 1015).await;

    // The stored fingerprint advanced to the new value
    assert_eq!(tracker.fingerprint(&"UAL*".to_string()), Some(&fingerprint("GREKI DCT")));
}

/// # Case 4: Refresh interval elapsed re-renders as "position" without a data change
#[tokio::test]
async fn test_observe_case4() {
    let mut tracker: WatchTracker<String> = WatchTracker::new(WatchKind::Callsign);
    let mut notifier = MockNotifier::new();
    notifier.expect_send_online().times(1).returning(|_| Ok(handle()));
    notifier
        .expect_edit()
        .withf(|_, update| update.updated_keys == vec!["position".to_string()])
        .times(1)
        .returning(|_, _| Ok(()));

    tracker.observe("UAL*".to_string(), Some(observation("DCT")), &notifier, 1000).await;
    // Refresh interval (300s) elapsed with identical content
    tracker.observe("UAL*".to_string(), Some(observation("DCT")), &notifier, 1300).await;

    // Stored fingerprint untouched by the refresh
    assert_eq!(tracker.fingerprint(&"UAL*".to_string()), Some(&fingerprint("DCT")));
}

/// # Case 5: Disappearance sends one terminal offline notice and clears state
#[tokio::test]
async fn test_observe_case5() {
    let mut tracker: WatchTracker<String> = WatchTracker::new(WatchKind::Callsign);
    let mut notifier = MockNotifier::new();
    notifier.expect_send_online().times(1).returning(|_| Ok(handle()));
    notifier
        .expect_send_offline()
        .withf(|notice| {
            notice.label == "United" && notice.detail == "No clients currently match UAL*"
        })
        .times(1)
        .returning(|_| Ok(()));

    tracker.observe("UAL*".to_string(), Some(observation("DCT")), &notifier, 1000).await;
    tracker.observe("UAL*".to_string(), None, &notifier, 1015).await;

    assert!(!tracker.is_present(&"UAL*".to_string()));
    assert!(tracker.fingerprint(&"UAL*".to_string()).is_none());

    // Still absent: a further empty cycle is silent
    tracker.observe("UAL*".to_string(), None, &notifier, 1030).await;
}

/// # Case 6: A failed create still records the fingerprint and is not retried
///
/// ## Validation criteria:
/// 1. The key is present after the failed send
/// 2. The next identical cycle produces no further notifier calls
/// 3. A later change finds no handle, so no edit is attempted either
#[tokio::test]
async fn test_observe_case6() {
    let mut tracker: WatchTracker<String> = WatchTracker::new(WatchKind::Callsign);
    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_online()
        .times(1)
        .returning(|_| Err(NotifyError::Rejected { status: 500 }.into()));
    notifier.expect_edit().times(0);

    tracker.observe("UAL*".to_string(), Some(observation("DCT")), &notifier, 1000).await;
    assert!(tracker.is_present(&"UAL*".to_string()));

    tracker.observe("UAL*".to_string(), Some(observation("DCT")), &notifier, 1015).await;
    tracker.observe("UAL*".to_string(), Some(observation("GREKI DCT")), &notifier, 1030).await;

    // The change itself still advanced the stored fingerprint
    assert_eq!(tracker.fingerprint(&"UAL*".to_string()), Some(&fingerprint("GREKI DCT")));
}

/// # Case 7: A failed edit advances the fingerprint so the next cycle is quiet
#[tokio::test]
async fn test_observe_case7() {
    let mut tracker: WatchTracker<String> = WatchTracker::new(WatchKind::Callsign);
    let mut notifier = MockNotifier::new();
    notifier.expect_send_online().times(1).returning(|_| Ok(handle()));
    notifier
        .expect_edit()
        .times(1)
        .returning(|_, _| Err(NotifyError::Rejected { status: 500 }.into()));

    tracker.observe("UAL*".to_string(), Some(observation("DCT")), &notifier, 1000).await;
    tracker.observe("UAL*".to_string(), Some(observation("GREKI DCT")), &notifier, 1015).await;
    // Same content again: the failed edit is not retried
    tracker.observe("UAL*".to_string(), Some(observation("GREKI DCT")), &notifier, 1030).await;
}

/// # Case 8: Account-kind offline notices carry the account wording
#[tokio::test]
async fn test_observe_case8() {
    let mut tracker: WatchTracker<u64> = WatchTracker::new(WatchKind::Account);
    let mut notifier = MockNotifier::new();
    notifier.expect_send_online().times(1).returning(|_| Ok(handle()));
    notifier
        .expect_send_offline()
        .withf(|notice| notice.detail == "CID 999999 is no longer connected to the network.")
        .times(1)
        .returning(|_| Ok(()));

    tracker.observe(999999, Some(observation("DCT")), &notifier, 1000).await;
    tracker.observe(999999, None, &notifier, 1015).await;

    assert!(tracker.tracked_keys().is_empty());
}
