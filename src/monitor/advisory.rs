use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::error;
use tracing::warn;

use super::Monitor;
use crate::feed::build_client;
use crate::feed::classify_transport_error;
use crate::Advisory;
use crate::FetchError;
use crate::NetworkConfig;
use crate::Notifier;
use crate::Result;
use crate::Settings;
use crate::WatchStore;

/// How many new events one cycle may announce; older ones are dropped to
/// avoid flooding the channel after an outage.
const MAX_ALERTS_PER_CYCLE: usize = 5;

/// One restricted-airspace event from the advisory API.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisoryEvent {
    pub identifier: Option<String>,
    pub recorded_at: Option<u64>,
    pub cid: Option<u64>,
    pub callsign: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub zones: Vec<String>,
    pub exit_detected_at: Option<u64>,
    pub exit_confirmed_at: Option<u64>,
}

impl AdvisoryEvent {
    /// Dedup key: an event without a recorded timestamp never alerts.
    pub fn seen_key(&self) -> Option<String> {
        let recorded = self.recorded_at?;
        Some(format!(
            "{}_{}",
            self.identifier.as_deref().unwrap_or("unknown"),
            recorded
        ))
    }

    fn exited(&self) -> bool {
        self.exit_detected_at.or(self.exit_confirmed_at).is_some()
    }
}

/// Source of advisory events, polled on the advisory interval.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AdvisorySource: Send + Sync {
    async fn fetch_events(&self) -> Result<Vec<AdvisoryEvent>>;
}

#[derive(Debug, Default, Deserialize)]
struct AdvisoryHistory {
    #[serde(default)]
    events: Vec<AdvisoryEvent>,
}

#[derive(Debug, Default, Deserialize)]
struct AdvisoryResponse {
    #[serde(default)]
    history: AdvisoryHistory,
}

#[derive(Clone)]
pub struct HttpAdvisorySource {
    client: reqwest::Client,
    url: String,
    request_timeout_in_ms: u64,
}

impl HttpAdvisorySource {
    pub fn new(settings: &NetworkConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(settings)?,
            url: settings.advisory_url.clone(),
            request_timeout_in_ms: settings.request_timeout_in_ms,
        })
    }
}

#[async_trait]
impl AdvisorySource for HttpAdvisorySource {
    async fn fetch_events(&self) -> Result<Vec<AdvisoryEvent>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, &self.url, self.request_timeout_in_ms))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let body: AdvisoryResponse = response.json().await.map_err(|e| FetchError::Malformed {
            url: self.url.clone(),
            detail: e.to_string(),
        })?;
        Ok(body.history.events)
    }
}

/// Polls the advisory event API and announces events not yet seen.
///
/// The seen-set persists through the store so a restart does not replay
/// the backlog.
pub struct AdvisoryMonitor<A, N, S> {
    source: A,
    notifier: N,
    store: S,
    settings: Arc<Settings>,
    seen: HashSet<String>,
}

impl<A, N, S> AdvisoryMonitor<A, N, S>
where
    A: AdvisorySource,
    N: Notifier,
    S: WatchStore,
{
    pub fn new(
        source: A,
        notifier: N,
        store: S,
        settings: Arc<Settings>,
    ) -> Self {
        let seen = store.seen_advisories();
        Self {
            source,
            notifier,
            store,
            settings,
            seen,
        }
    }

    pub(crate) fn render(
        &self,
        event: &AdvisoryEvent,
    ) -> Advisory {
        let callsign = event.callsign.as_deref().unwrap_or("N/A");
        let title = if event.exited() {
            format!("Restricted-airspace exit confirmed: {}", callsign)
        } else {
            format!("Restricted-airspace intrusion detected: {}", callsign)
        };
        let zones = if event.zones.is_empty() {
            "P-56".to_string()
        } else {
            event.zones.join(", ")
        };
        Advisory {
            title,
            detail: format!(
                "**CID:** {}\n**Name:** {}\n**Zones:** {}",
                event.cid.map(|cid| cid.to_string()).unwrap_or_else(|| "Unknown".to_string()),
                event.name.as_deref().unwrap_or("Unknown"),
                zones
            ),
            source: self.settings.network.advisory_url.clone(),
            recorded_at: event.recorded_at,
        }
    }
}

#[async_trait]
impl<A, N, S> Monitor for AdvisoryMonitor<A, N, S>
where
    A: AdvisorySource,
    N: Notifier,
    S: WatchStore,
{
    fn name(&self) -> &'static str {
        "advisory-monitor"
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings.monitor.advisory_interval_in_secs)
    }

    async fn tick(&mut self) -> Result<()> {
        if self.store.advisories_muted() {
            return Ok(());
        }

        let events = self.source.fetch_events().await?;

        let mut new_events: Vec<AdvisoryEvent> = Vec::new();
        for event in events {
            let key = match event.seen_key() {
                Some(key) => key,
                None => continue,
            };
            if self.seen.insert(key) {
                new_events.push(event);
            }
        }
        if new_events.is_empty() {
            return Ok(());
        }

        // Most recent first, capped per cycle
        let start = new_events.len().saturating_sub(MAX_ALERTS_PER_CYCLE);
        for event in new_events[start..].iter().rev() {
            let advisory = self.render(event);
            if let Err(e) = self.notifier.send_advisory(&advisory).await {
                error!("failed to send advisory for {:?}: {:?}", event.identifier, e);
            }
        }

        if let Err(e) = self.store.record_seen_advisories(&self.seen) {
            warn!("failed to persist seen advisories: {:?}", e);
        }
        Ok(())
    }
}
