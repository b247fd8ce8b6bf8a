use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sha2::Digest;
use sha2::Sha256;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::Monitor;
use crate::feed::build_client;
use crate::feed::classify_transport_error;
use crate::utils::time::unix_now_secs;
use crate::Advisory;
use crate::FetchError;
use crate::NetworkConfig;
use crate::Notifier;
use crate::Result;
use crate::Settings;
use crate::WatchStore;

/// Lines of the changed page included in the announcement.
const PREVIEW_LINES: usize = 8;

/// Source of the advisory bulletin page body.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BulletinSource: Send + Sync {
    async fn fetch_page(&self) -> Result<String>;
}

#[derive(Clone)]
pub struct HttpBulletinSource {
    client: reqwest::Client,
    url: String,
    request_timeout_in_ms: u64,
}

impl HttpBulletinSource {
    pub fn new(settings: &NetworkConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(settings)?,
            url: settings.bulletin_url.clone(),
            request_timeout_in_ms: settings.request_timeout_in_ms,
        })
    }
}

#[async_trait]
impl BulletinSource for HttpBulletinSource {
    async fn fetch_page(&self) -> Result<String> {
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

        response
            .text()
            .await
            .map_err(|e| classify_transport_error(e, &self.url, self.request_timeout_in_ms).into())
    }
}

/// Low-frequency watcher for the advisory bulletin page.
///
/// The page carries no stable ids, so publication is detected by content
/// digest: a body hash not seen before means something was published or
/// changed. Seen digests persist through the store.
pub struct BulletinMonitor<B, N, S> {
    source: B,
    notifier: N,
    store: S,
    settings: Arc<Settings>,
    seen: HashSet<String>,
}

impl<B, N, S> BulletinMonitor<B, N, S>
where
    B: BulletinSource,
    N: Notifier,
    S: WatchStore,
{
    pub fn new(
        source: B,
        notifier: N,
        store: S,
        settings: Arc<Settings>,
    ) -> Self {
        let seen = store.seen_bulletins();
        Self {
            source,
            notifier,
            store,
            settings,
            seen,
        }
    }
}

pub(crate) fn page_digest(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

pub(crate) fn page_preview(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(PREVIEW_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl<B, N, S> Monitor for BulletinMonitor<B, N, S>
where
    B: BulletinSource,
    N: Notifier,
    S: WatchStore,
{
    fn name(&self) -> &'static str {
        "bulletin-monitor"
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings.monitor.bulletin_interval_in_secs)
    }

    async fn tick(&mut self) -> Result<()> {
        let body = self.source.fetch_page().await?;

        let digest = page_digest(&body);
        if !self.seen.insert(digest) {
            return Ok(());
        }
        info!("bulletin page changed, announcing");

        let advisory = Advisory {
            title: "New advisory bulletin published".to_string(),
            detail: page_preview(&body),
            source: self.settings.network.bulletin_url.clone(),
            recorded_at: Some(unix_now_secs()),
        };
        if let Err(e) = self.notifier.send_advisory(&advisory).await {
            error!("failed to send bulletin advisory: {:?}", e);
        }

        if let Err(e) = self.store.record_seen_bulletins(&self.seen) {
            warn!("failed to persist seen bulletins: {:?}", e);
        }
        Ok(())
    }
}
