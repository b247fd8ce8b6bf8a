use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::Monitor;
use crate::Advisory;
use crate::FeedSource;
use crate::MemberDirectory;
use crate::Notifier;
use crate::Result;
use crate::Settings;
use crate::WatchStore;

/// Tracks the highest account id seen on the network.
///
/// Account ids are issued sequentially, so a new maximum means a brand-new
/// registration just connected. The high-water mark persists through the
/// store so restarts do not re-announce old records; the per-run alerted
/// set guards against duplicate alerts when the store write fails.
pub struct NewAccountMonitor<F, N, S, D> {
    feed: F,
    notifier: N,
    store: S,
    directory: D,
    settings: Arc<Settings>,
    highest: u64,
    alerted: HashSet<u64>,
}

impl<F, N, S, D> NewAccountMonitor<F, N, S, D>
where
    F: FeedSource,
    N: Notifier,
    S: WatchStore,
    D: MemberDirectory,
{
    pub fn new(
        feed: F,
        notifier: N,
        store: S,
        directory: D,
        settings: Arc<Settings>,
    ) -> Self {
        let highest = store.highest_account();
        Self {
            feed,
            notifier,
            store,
            directory,
            settings,
            highest,
            alerted: HashSet::new(),
        }
    }
}

#[async_trait]
impl<F, N, S, D> Monitor for NewAccountMonitor<F, N, S, D>
where
    F: FeedSource,
    N: Notifier,
    S: WatchStore,
    D: MemberDirectory,
{
    fn name(&self) -> &'static str {
        "new-account-monitor"
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings.monitor.live_interval_in_secs)
    }

    async fn tick(&mut self) -> Result<()> {
        let snapshot = self.feed.fetch_snapshot().await?;

        // Broadcast stations count here: any connection can carry the id
        let current_highest = match snapshot.all_participants().map(|p| p.cid()).max() {
            Some(cid) => cid,
            None => return Ok(()),
        };
        if current_highest <= self.highest {
            return Ok(());
        }

        let old_highest = self.highest;
        self.highest = current_highest;
        if let Err(e) = self.store.record_highest_account(current_highest) {
            warn!("failed to persist highest account id: {:?}", e);
        }

        if !self.alerted.insert(current_highest) {
            return Ok(());
        }

        let participant = match snapshot.all_participants().find(|p| p.cid() == current_highest) {
            Some(participant) => participant,
            None => return Ok(()),
        };
        info!(
            "new highest account id {} seen as {}",
            current_highest,
            participant.callsign()
        );

        // Cosmetics only; a directory failure degrades to the placeholder
        let display_name = self.directory.resolve_display_name(current_highest).await;

        let lineage = if old_highest > 0 {
            format!(
                "**Previous highest:** {}\n**Difference:** +{}",
                old_highest,
                current_highest - old_highest
            )
        } else {
            "**Status:** First record".to_string()
        };
        let advisory = Advisory {
            title: format!("New highest account id: {}", current_highest),
            detail: format!(
                "**Name:** {}\n**Callsign:** {}\n**Role:** {}\n**Server:** {}\n{}",
                display_name,
                participant.callsign(),
                participant.role(),
                participant.server().unwrap_or("N/A"),
                lineage
            ),
            source: "live network feed".to_string(),
            recorded_at: None,
        };
        if let Err(e) = self.notifier.send_advisory(&advisory).await {
            error!("failed to send new-account advisory: {:?}", e);
        }
        Ok(())
    }
}
