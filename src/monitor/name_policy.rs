use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::Monitor;
use crate::check_violation;
use crate::prune;
use crate::FeedSource;
use crate::Notifier;
use crate::PolicyAlert;
use crate::Result;
use crate::Selector;
use crate::Settings;
use crate::Violation;
use crate::WatchStore;

/// Flags display names violating the network's naming policy.
///
/// Applies to every participant every cycle, no pattern required. Each
/// (account id, callsign) pair is alerted once and then suppressed until
/// the pair leaves the live snapshot; the suppression set is recomputed
/// every cycle so it never outlives the violations it covers.
pub struct NamePolicyMonitor<F, N, S> {
    feed: F,
    notifier: N,
    store: S,
    settings: Arc<Settings>,
    suppressed: HashSet<String>,
}

impl<F, N, S> NamePolicyMonitor<F, N, S>
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
            suppressed: HashSet::new(),
        }
    }

    async fn alert(
        &mut self,
        violation: &Violation,
    ) {
        let alert = PolicyAlert {
            name: violation.name.clone(),
            cid: violation.cid,
            callsign: violation.callsign.clone(),
            role: violation.role,
            reasons: violation.reasons.clone(),
            frequency: violation.frequency.clone(),
            position: violation.position,
        };
        info!(
            "name-policy violation by {} ({}): {}",
            violation.name,
            violation.cid,
            violation.reasons.join(", ")
        );
        if let Err(e) = self.notifier.send_alert(&alert).await {
            error!("failed to send policy alert for {}: {:?}", violation.cid, e);
        }
    }
}

#[async_trait]
impl<F, N, S> Monitor for NamePolicyMonitor<F, N, S>
where
    F: FeedSource,
    N: Notifier,
    S: WatchStore,
{
    fn name(&self) -> &'static str {
        "name-policy-monitor"
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings.monitor.live_interval_in_secs)
    }

    async fn tick(&mut self) -> Result<()> {
        let muted = self.store.policy_alerts_muted();
        let fake_names: Vec<(String, Selector)> = self
            .store
            .fake_name_patterns()
            .into_iter()
            .filter_map(|pattern| match Selector::compile(&pattern) {
                Ok(selector) => Some((pattern, selector)),
                Err(e) => {
                    warn!("skipping fake-name pattern {:?}: {:?}", pattern, e);
                    None
                }
            })
            .collect();

        let snapshot = self.feed.fetch_snapshot().await?;

        let violations: Vec<Violation> = snapshot
            .live_participants()
            .filter_map(|p| check_violation(&p, &fake_names))
            .collect();
        let current_keys: HashSet<String> =
            violations.iter().map(Violation::suppression_key).collect();

        if !muted {
            for violation in &violations {
                let key = violation.suppression_key();
                if self.suppressed.contains(&key) {
                    continue;
                }
                self.suppressed.insert(key);
                self.alert(violation).await;
            }
        }

        // The suppression set always equals the subset of identities still
        // present in this scan
        self.suppressed = prune(&self.suppressed, &current_keys);
        Ok(())
    }
}
