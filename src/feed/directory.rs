use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;

use super::http::build_client;
use crate::NetworkConfig;
use crate::Result;

/// Placeholder returned whenever a display name cannot be resolved.
pub const UNKNOWN_NAME: &str = "N/A";

/// Best-effort account-id to display-name resolution.
///
/// Used only for notification cosmetics, never for matching; failures
/// degrade to the placeholder and never propagate.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn resolve_display_name(&self, cid: u64) -> String;
}

#[derive(Debug, Deserialize)]
struct MemberRecord {
    #[serde(default)]
    fname: String,
    #[serde(default)]
    lname: String,
}

#[derive(Debug, Deserialize)]
struct MemberResponse {
    #[serde(default)]
    data: Option<MemberRecord>,
}

#[derive(Clone)]
pub struct HttpMemberDirectory {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpMemberDirectory {
    pub fn new(settings: &NetworkConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: settings.member_api_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(settings.directory_timeout_in_ms),
        })
    }

    async fn lookup(&self, cid: u64) -> Option<String> {
        let url = format!("{}/{}", self.base_url, cid);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }

        let body: MemberResponse = response.json().await.ok()?;
        let record = body.data?;
        let full = format!("{} {}", record.fname, record.lname);
        let full = full.trim();
        if full.is_empty() {
            None
        } else {
            Some(full.to_string())
        }
    }
}

#[async_trait]
impl MemberDirectory for HttpMemberDirectory {
    async fn resolve_display_name(&self, cid: u64) -> String {
        if cid == 0 {
            return UNKNOWN_NAME.to_string();
        }
        match self.lookup(cid).await {
            Some(name) => name,
            None => UNKNOWN_NAME.to_string(),
        }
    }
}
