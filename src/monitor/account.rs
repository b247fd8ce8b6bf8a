use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::observation_for;
use super::Monitor;
use crate::utils::time::unix_now_secs;
use crate::FeedSource;
use crate::Notifier;
use crate::Observation;
use crate::Result;
use crate::Settings;
use crate::WatchKind;
use crate::WatchStore;
use crate::WatchTracker;

/// Watches specific account ids across pilots and controllers.
///
/// Broadcast stations are excluded. When an account holds several
/// simultaneous connections, the first (pilots before controllers, feed
/// order) represents it.
pub struct AccountMonitor<F, N, S> {
    feed: F,
    notifier: N,
    store: S,
    settings: Arc<Settings>,
    tracker: WatchTracker<u64>,
}

impl<F, N, S> AccountMonitor<F, N, S>
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
            tracker: WatchTracker::new(WatchKind::Account),
        }
    }
}

#[async_trait]
impl<F, N, S> Monitor for AccountMonitor<F, N, S>
where
    F: FeedSource,
    N: Notifier,
    S: WatchStore,
{
    fn name(&self) -> &'static str {
        "account-monitor"
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings.monitor.live_interval_in_secs)
    }

    async fn tick(&mut self) -> Result<()> {
        // Watches are read fresh each cycle so additions and removals take
        // effect without a restart
        let watches = self.store.account_watches();
        let snapshot = self.feed.fetch_snapshot().await?;
        let now = unix_now_secs();

        let mut outcomes: BTreeMap<u64, Option<Observation>> = BTreeMap::new();
        for key in self.tracker.tracked_keys() {
            outcomes.insert(key, None);
        }
        for watch in watches {
            let matched = snapshot.live_participants().find(|p| p.cid() == watch.cid);
            let observation =
                matched.map(|p| observation_for(&watch.label, &p, &self.settings.monitor));
            outcomes.insert(watch.cid, observation);
        }

        for (key, seen) in outcomes {
            self.tracker.observe(key, seen, &self.notifier, now).await;
        }
        Ok(())
    }
}
