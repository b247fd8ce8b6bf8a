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
use crate::Result;
use crate::Selector;
use crate::Settings;
use crate::WatchKind;
use crate::WatchStore;
use crate::WatchTracker;

/// Watches wildcard callsign patterns across pilots and controllers.
pub struct CallsignMonitor<F, N, S> {
    feed: F,
    notifier: N,
    store: S,
    settings: Arc<Settings>,
    tracker: WatchTracker<String>,
}

impl<F, N, S> CallsignMonitor<F, N, S>
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
            tracker: WatchTracker::new(WatchKind::Callsign),
        }
    }
}

#[async_trait]
impl<F, N, S> Monitor for CallsignMonitor<F, N, S>
where
    F: FeedSource,
    N: Notifier,
    S: WatchStore,
{
    fn name(&self) -> &'static str {
        "callsign-monitor"
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings.monitor.live_interval_in_secs)
    }

    async fn tick(&mut self) -> Result<()> {
        let watches = self.store.callsign_watches();
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
                    warn!("skipping callsign watch {:?}: {:?}", watch.pattern, e);
                    continue;
                }
            };
            let matched = snapshot.live_participants().find(|p| selector.matches(p.callsign()));
            let observation =
                matched.map(|p| observation_for(&watch.label, &p, &self.settings.monitor));
            outcomes.insert(watch.pattern, observation);
        }

        for (key, seen) in outcomes {
            self.tracker.observe(key, seen, &self.notifier, now).await;
        }
        Ok(())
    }
}
