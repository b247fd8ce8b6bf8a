use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_ADVISORY_URL;
use crate::constants::DEFAULT_BULLETIN_URL;
use crate::constants::DEFAULT_FEED_URL;
use crate::constants::DEFAULT_MEMBER_API_URL;
use crate::Result;

/// Outbound endpoints and HTTP client tuning.
///
/// One shared shape for all upstream sources: the live snapshot feed, the
/// member directory, the advisory event API and the bulletin page.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NetworkConfig {
    /// Live network snapshot endpoint
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Member directory endpoint (account id -> display name)
    #[serde(default = "default_member_api_url")]
    pub member_api_url: String,

    /// JSON advisory event endpoint
    #[serde(default = "default_advisory_url")]
    pub advisory_url: String,

    /// Low-frequency advisory bulletin page
    #[serde(default = "default_bulletin_url")]
    pub bulletin_url: String,

    /// TCP connect timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_in_ms: u64,

    /// Request completion timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_in_ms: u64,

    /// Budget for best-effort member-directory lookups in milliseconds
    #[serde(default = "default_directory_timeout")]
    pub directory_timeout_in_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            member_api_url: default_member_api_url(),
            advisory_url: default_advisory_url(),
            bulletin_url: default_bulletin_url(),
            connect_timeout_in_ms: default_connect_timeout(),
            request_timeout_in_ms: default_request_timeout(),
            directory_timeout_in_ms: default_directory_timeout(),
        }
    }
}

impl NetworkConfig {
    pub(super) fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("network.feed_url", &self.feed_url),
            ("network.member_api_url", &self.member_api_url),
            ("network.advisory_url", &self.advisory_url),
            ("network.bulletin_url", &self.bulletin_url),
        ] {
            if url.is_empty() {
                return Err(ConfigError::Message(format!("{} must not be empty", name)).into());
            }
        }

        if self.connect_timeout_in_ms == 0 {
            return Err(ConfigError::Message("network.connect_timeout_in_ms cannot be 0".into()).into());
        }

        if self.request_timeout_in_ms == 0 {
            return Err(ConfigError::Message("network.request_timeout_in_ms cannot be 0".into()).into());
        }

        Ok(())
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}
fn default_member_api_url() -> String {
    DEFAULT_MEMBER_API_URL.to_string()
}
fn default_advisory_url() -> String {
    DEFAULT_ADVISORY_URL.to_string()
}
fn default_bulletin_url() -> String {
    DEFAULT_BULLETIN_URL.to_string()
}
// in ms
fn default_connect_timeout() -> u64 {
    3_000
}
fn default_request_timeout() -> u64 {
    10_000
}
fn default_directory_timeout() -> u64 {
    5_000
}
