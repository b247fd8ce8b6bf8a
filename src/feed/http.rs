use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use super::Snapshot;
use crate::FetchError;
use crate::NetworkConfig;
use crate::Result;

/// Source of the shared network snapshot, one retrieval per cycle.
///
/// A failed fetch must skip the cycle entirely without mutating tracker
/// state; it is never interpreted as "no participants online".
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<Snapshot>;
}

/// Builds the shared HTTP client with the configured timeouts.
pub(crate) fn build_client(settings: &NetworkConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_millis(settings.connect_timeout_in_ms))
        .timeout(Duration::from_millis(settings.request_timeout_in_ms))
        .build()
        .map_err(FetchError::Transport)?;
    Ok(client)
}

/// Maps a transport error onto the fetch taxonomy, surfacing elapsed
/// deadlines as explicit timeouts.
pub(crate) fn classify_transport_error(
    err: reqwest::Error,
    url: &str,
    timeout_in_ms: u64,
) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            timeout: Duration::from_millis(timeout_in_ms),
        }
    } else {
        FetchError::Transport(err)
    }
}

#[derive(Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
    url: String,
    request_timeout_in_ms: u64,
}

impl HttpFeedSource {
    pub fn new(settings: &NetworkConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(settings)?,
            url: settings.feed_url.clone(),
            request_timeout_in_ms: settings.request_timeout_in_ms,
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, &self.url, self.request_timeout_in_ms))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(FetchError::RateLimited {
                url: self.url.clone(),
            }
            .into());
        }
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let snapshot: Snapshot = response.json().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Malformed {
                    url: self.url.clone(),
                    detail: e.to_string(),
                }
            } else {
                classify_transport_error(e, &self.url, self.request_timeout_in_ms)
            }
        })?;

        debug!(
            "fetched snapshot: {} pilots, {} controllers, {} broadcast stations",
            snapshot.pilots.len(),
            snapshot.controllers.len(),
            snapshot.atis.len()
        );
        Ok(snapshot)
    }
}
