//! The per-watch notify/edit/expire state machine.
//!
//! Each watch key moves between two states: absent (no stored fingerprint)
//! and present (stored fingerprint plus a live message handle). One
//! [`WatchTracker`] instance serves one watch type; every monitor owns its
//! own tracker, so no state is shared across tasks and all transitions for
//! a key happen sequentially within one tick.
//!
//! Failure handling is deliberate: a failed send or edit is logged and the
//! fingerprint still advances, so the next cycle sees no change and does
//! not retry forever. The cost is one possibly missed notification; the
//! guarantee is at-least-once with best-effort dedup, never a retry storm.

#[cfg(test)]
mod tracker_test;

use std::collections::BTreeMap;
use std::fmt::Display;

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::Fingerprint;
use crate::MessageHandle;
use crate::Notifier;
use crate::OfflineNotice;
use crate::Role;
use crate::StatusUpdate;

/// What one cycle observed for one watch key: the representative matching
/// participant, already projected into a fingerprint.
///
/// When a wildcard watch matches several participants at once, only the
/// first encountered is observed; the tracker follows "a" representative
/// instance per key, not all instances.
#[derive(Debug, Clone)]
pub struct Observation {
    pub label: String,
    pub role: Role,
    pub callsign: String,
    pub cid: u64,
    pub fingerprint: Fingerprint,
    /// Seconds between periodic re-renders while the fingerprint is unchanged
    pub refresh_interval_secs: u64,
    pub military_rating: Option<String>,
}

/// Per-key tracked state while the watch is present.
#[derive(Debug, Clone)]
struct WatchState {
    label: String,
    fingerprint: Fingerprint,
    handle: Option<MessageHandle>,
    last_refresh: u64,
}

/// Shapes the terminal offline notice for each watch flavor.
#[derive(Debug, Clone, Copy)]
pub enum WatchKind {
    Account,
    Callsign,
    AircraftType,
    Keyword,
}

impl WatchKind {
    fn offline_detail<K: Display>(
        &self,
        key: &K,
    ) -> String {
        match self {
            WatchKind::Account => {
                format!("CID {} is no longer connected to the network.", key)
            }
            WatchKind::Callsign | WatchKind::AircraftType => {
                format!("No clients currently match {}", key)
            }
            WatchKind::Keyword => format!("No clients currently match keyword: {}", key),
        }
    }
}

pub struct WatchTracker<K: Ord + Clone + Display> {
    kind: WatchKind,
    states: BTreeMap<K, WatchState>,
}

impl<K: Ord + Clone + Display> WatchTracker<K> {
    pub fn new(kind: WatchKind) -> Self {
        Self {
            kind,
            states: BTreeMap::new(),
        }
    }

    /// Keys currently in the present state. The caller feeds these back in
    /// so a watch removed from the configuration still receives its
    /// terminal notice.
    pub fn tracked_keys(&self) -> Vec<K> {
        self.states.keys().cloned().collect()
    }

    pub fn is_present(
        &self,
        key: &K,
    ) -> bool {
        self.states.contains_key(key)
    }

    /// Stored fingerprint for a present key, tests and diagnostics only.
    pub fn fingerprint(
        &self,
        key: &K,
    ) -> Option<&Fingerprint> {
        self.states.get(key).map(|state| &state.fingerprint)
    }

    /// Applies one cycle's observation for one watch key.
    ///
    /// Transitions:
    /// - absent and seen: create a new message (`updated_keys = ["initial"]`)
    /// - present and changed: edit in place with the sorted changed fields
    /// - present, unchanged, refresh elapsed: re-render as `["position"]`
    ///   without touching the stored fingerprint
    /// - present and not seen: terminal offline notice, state cleared
    pub async fn observe<N: Notifier>(
        &mut self,
        key: K,
        seen: Option<Observation>,
        notifier: &N,
        now: u64,
    ) {
        match (self.states.remove(&key), seen) {
            (None, Some(observation)) => self.handle_appear(key, observation, notifier, now).await,
            (Some(state), Some(observation)) => {
                self.handle_present(key, state, observation, notifier, now).await
            }
            (Some(state), None) => self.handle_disappear(key, state, notifier).await,
            (None, None) => {}
        }
    }

    async fn handle_appear<N: Notifier>(
        &mut self,
        key: K,
        observation: Observation,
        notifier: &N,
        now: u64,
    ) {
        info!("[{}] came online as {}", key, observation.callsign);
        let update = status_update(&observation, vec!["initial".to_string()], None, now);

        let handle = match notifier.send_online(&update).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("failed to send online notice for {}: {:?}", key, e);
                None
            }
        };

        // The fingerprint is recorded even when the send failed: a broken
        // render must not be retried every cycle.
        self.states.insert(
            key,
            WatchState {
                label: observation.label,
                fingerprint: observation.fingerprint,
                handle,
                last_refresh: now,
            },
        );
    }

    async fn handle_present<N: Notifier>(
        &mut self,
        key: K,
        mut state: WatchState,
        observation: Observation,
        notifier: &N,
        now: u64,
    ) {
        state.label = observation.label.clone();

        let changed = state.fingerprint.diff(&observation.fingerprint);
        if !changed.is_empty() {
            debug!("[{}] changed fields: {:?}", key, changed);
            let update = status_update(&observation, changed, None, now);
            state.fingerprint = observation.fingerprint;

            if let Some(handle) = &state.handle {
                match notifier.edit(handle, &update).await {
                    Ok(()) => state.last_refresh = now,
                    Err(e) => error!("failed to edit notice for {}: {:?}", key, e),
                }
            }
        } else if now.saturating_sub(state.last_refresh) >= observation.refresh_interval_secs {
            // Periodic re-render so the panel can show fresh position
            // without implying a data change; the stored fingerprint is
            // untouched.
            if let Some(handle) = &state.handle {
                let update = status_update(
                    &observation,
                    vec!["position".to_string()],
                    Some(state.fingerprint.clone()),
                    now,
                );
                match notifier.edit(handle, &update).await {
                    Ok(()) => state.last_refresh = now,
                    Err(e) => error!("failed to refresh notice for {}: {:?}", key, e),
                }
            }
        }

        self.states.insert(key, state);
    }

    async fn handle_disappear<N: Notifier>(
        &mut self,
        key: K,
        state: WatchState,
        notifier: &N,
    ) {
        info!("[{}] went offline", key);

        let notice = OfflineNotice {
            label: state.label,
            detail: self.kind.offline_detail(&key),
        };
        // A new message, never an edit; state is already cleared either way
        if let Err(e) = notifier.send_offline(&notice).await {
            error!("failed to send offline notice for {}: {:?}", key, e);
        }
    }
}

fn status_update(
    observation: &Observation,
    updated_keys: Vec<String>,
    fingerprint_override: Option<Fingerprint>,
    now: u64,
) -> StatusUpdate {
    StatusUpdate {
        label: observation.label.clone(),
        role: observation.role,
        callsign: observation.callsign.clone(),
        cid: observation.cid,
        fingerprint: fingerprint_override.unwrap_or_else(|| observation.fingerprint.clone()),
        updated_keys,
        updated_at: now,
        military_rating: observation.military_rating.clone(),
    }
}
