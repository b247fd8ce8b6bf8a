use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::observation_for;
use super::Monitor;
use crate::utils::time::unix_now_secs;
use crate::FeedSource;
use crate::Notifier;
use crate::Observation;
use crate::Participant;
use crate::Result;
use crate::Selector;
use crate::Settings;
use crate::WatchKind;
use crate::WatchStore;
use crate::WatchTracker;

/// Watches wildcard aircraft-type patterns, pilots only.
///
/// Matching runs over the flight plan's short type code; a pilot without a
/// filed plan never matches.
pub struct TypeMonitor<F, N, S> {
    feed: F,
    notifier: N,
    store: S,
    settings: Arc<Settings>,
    tracker: WatchTracker<String>,
}

impl<F, N, S> TypeMonitor<F, N, S>
where
    F: FeedSource,
    N: Notifier,
    S: WatchStore,
{
    pub fn new(
        feed: F,
        notifier: N,
        store: S,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            feed,
            notifier,
            store,
            settings,
            tracker: WatchTracker::new(WatchKind::AircraftType),
        }
    }
}

#[async_trait]
impl<F, N, S> Monitor for TypeMonitor<F, N, S>
where
    F: FeedSource,
    N: Notifier,
    S: WatchStore,
{
    fn name(&self) -> &'static str {
        "type-monitor"
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings.monitor.live_interval_in_secs)
    }

    async fn tick(&mut self) -> Result<()> {
        let watches = self.store.type_watches();
        let snapshot = self.feed.fetch_snapshot().await?;
        let now = unix_now_secs();

        let mut outcomes: BTreeMap<String, Option<Observation>> = BTreeMap::new();
        for key in self.tracker.tracked_keys() {
            outcomes.insert(key, None);
        }
        for watch in watches {
            let selector = match Selector::compile(&watch.pattern) {
                Ok(selector) => selector,
                Err(e) => {
                    warn!("skipping type watch {:?}: {:?}", watch.pattern, e);
                    continue;
                }
            };
            let matched = snapshot.pilots.iter().find(|pilot| {
                pilot
                    .flight_plan
                    .as_ref()
                    .and_then(|plan| plan.aircraft_short.as_deref())
                    .map(|short| selector.matches(short))
                    .unwrap_or(false)
            });
            let observation = matched.map(|pilot| {
                observation_for(&watch.label, &Participant::Pilot(pilot), &self.settings.monitor)
            });
            outcomes.insert(watch.pattern, observation);
        }

        for (key, seen) in outcomes {
            self.tracker.observe(key, seen, &self.notifier, now).await;
        }
        Ok(())
    }
}
