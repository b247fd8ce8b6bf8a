use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::observation_for;
use super::Monitor;
use crate::utils::time::unix_now_secs;
use crate::FeedSource;
use crate::Keyword;
use crate::MonitorConfig;
use crate::Notifier;
use crate::Observation;
use crate::Participant;
use crate::Result;
use crate::RuleBook;
use crate::Settings;
use crate::Snapshot;
use crate::WatchKind;
use crate::WatchStore;
use crate::WatchTracker;

/// Watches keyword rule books across broadcast text, remarks and routes.
///
/// Two independent rule books share one poll cycle; each keyword is tracked
/// through its own state-machine key, so a keyword that stops matching
/// receives the terminal offline notice.
pub struct KeywordMonitor<F, N, S> {
    feed: F,
    notifier: N,
    store: S,
    settings: Arc<Settings>,
    a1_tracker: WatchTracker<String>,
    a9_tracker: WatchTracker<String>,
}

impl<F, N, S> KeywordMonitor<F, N, S>
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
            a1_tracker: WatchTracker::new(WatchKind::Keyword),
            a9_tracker: WatchTracker::new(WatchKind::Keyword),
        }
    }
}

/// The text a keyword is searched in: joined broadcast lines for
/// controllers, remarks plus route for pilots.
pub(crate) fn searchable_text(participant: &Participant<'_>) -> String {
    match participant {
        Participant::Controller(c) | Participant::Atis(c) => {
            c.text_atis.as_ref().map(|lines| lines.join(" ")).unwrap_or_default()
        }
        Participant::Pilot(pilot) => match &pilot.flight_plan {
            Some(plan) => format!(
                "{} {}",
                plan.remarks.as_deref().unwrap_or_default(),
                plan.route.as_deref().unwrap_or_default()
            ),
            None => String::new(),
        },
    }
}

async fn scan_book<N: Notifier>(
    tracker: &mut WatchTracker<String>,
    book: RuleBook,
    keywords: Vec<String>,
    snapshot: &Snapshot,
    notifier: &N,
    settings: &MonitorConfig,
    now: u64,
) {
    let mut outcomes: BTreeMap<String, Option<Observation>> = BTreeMap::new();
    for key in tracker.tracked_keys() {
        outcomes.insert(key, None);
    }
    for keyword in keywords {
        let compiled = match Keyword::compile(&keyword) {
            Ok(compiled) => compiled,
            Err(e) => {
                warn!("skipping {} keyword {:?}: {:?}", book, keyword, e);
                continue;
            }
        };
        let matched = snapshot
            .live_participants()
            .find(|p| compiled.matches(&searchable_text(p)));
        let observation = matched.map(|p| {
            let label = format!("{} Match: {}", book, keyword);
            observation_for(&label, &p, settings)
        });
        outcomes.insert(keyword, observation);
    }

    for (key, seen) in outcomes {
        tracker.observe(key, seen, notifier, now).await;
    }
}

#[async_trait]
impl<F, N, S> Monitor for KeywordMonitor<F, N, S>
where
    F: FeedSource,
    N: Notifier,
    S: WatchStore,
{
    fn name(&self) -> &'static str {
        "keyword-monitor"
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings.monitor.live_interval_in_secs)
    }

    async fn tick(&mut self) -> Result<()> {
        let a1_keywords = self.store.keyword_watches(RuleBook::A1);
        let a9_keywords = self.store.keyword_watches(RuleBook::A9);
        let snapshot = self.feed.fetch_snapshot().await?;
        let now = unix_now_secs();

        scan_book(
            &mut self.a1_tracker,
            RuleBook::A1,
            a1_keywords,
            &snapshot,
            &self.notifier,
            &self.settings.monitor,
            now,
        )
        .await;
        scan_book(
            &mut self.a9_tracker,
            RuleBook::A9,
            a9_keywords,
            &snapshot,
            &self.notifier,
            &self.settings.monitor,
            now,
        )
        .await;
        Ok(())
    }
}
