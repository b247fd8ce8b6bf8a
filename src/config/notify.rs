use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Notification channel settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotifyConfig {
    /// Webhook endpoint that receives every outbound notification
    #[serde(default)]
    pub webhook_url: String,

    /// Sender name attached to each webhook message
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            sender_name: default_sender_name(),
        }
    }
}

impl NotifyConfig {
    pub(super) fn validate(&self) -> Result<()> {
        if self.sender_name.is_empty() {
            return Err(ConfigError::Message("notify.sender_name must not be empty".into()).into());
        }
        Ok(())
    }
}

fn default_sender_name() -> String {
    "skywatch".to_string()
}
