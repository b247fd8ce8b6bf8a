use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Poll and refresh cadence for every monitor task.
///
/// Live watches poll the shared snapshot on a short period; advisory-style
/// sources poll slower. Refresh intervals control how often an unchanged
/// watch is re-rendered so its panel can show fresh position data.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonitorConfig {
    /// Snapshot poll period for live watches, in seconds
    #[serde(default = "default_live_interval")]
    pub live_interval_in_secs: u64,

    /// Advisory event poll period, in seconds
    #[serde(default = "default_advisory_interval")]
    pub advisory_interval_in_secs: u64,

    /// Bulletin page poll period, in seconds
    #[serde(default = "default_bulletin_interval")]
    pub bulletin_interval_in_secs: u64,

    /// Re-render period for unchanged pilot watches, in seconds
    #[serde(default = "default_pilot_refresh")]
    pub pilot_refresh_in_secs: u64,

    /// Re-render period for unchanged controller/broadcast watches, in seconds
    #[serde(default = "default_controller_refresh")]
    pub controller_refresh_in_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            live_interval_in_secs: default_live_interval(),
            advisory_interval_in_secs: default_advisory_interval(),
            bulletin_interval_in_secs: default_bulletin_interval(),
            pilot_refresh_in_secs: default_pilot_refresh(),
            controller_refresh_in_secs: default_controller_refresh(),
        }
    }
}

impl MonitorConfig {
    pub(super) fn validate(&self) -> Result<()> {
        if self.live_interval_in_secs == 0 {
            return Err(ConfigError::Message("monitor.live_interval_in_secs cannot be 0".into()).into());
        }

        if self.advisory_interval_in_secs == 0 {
            return Err(ConfigError::Message("monitor.advisory_interval_in_secs cannot be 0".into()).into());
        }

        if self.bulletin_interval_in_secs == 0 {
            return Err(ConfigError::Message("monitor.bulletin_interval_in_secs cannot be 0".into()).into());
        }

        if self.pilot_refresh_in_secs < self.live_interval_in_secs {
            return Err(ConfigError::Message(format!(
                "pilot_refresh_in_secs {}s should not be shorter than live_interval_in_secs {}s",
                self.pilot_refresh_in_secs, self.live_interval_in_secs
            ))
            .into());
        }

        if self.controller_refresh_in_secs < self.live_interval_in_secs {
            return Err(ConfigError::Message(format!(
                "controller_refresh_in_secs {}s should not be shorter than live_interval_in_secs {}s",
                self.controller_refresh_in_secs, self.live_interval_in_secs
            ))
            .into());
        }

        Ok(())
    }
}

// in seconds
fn default_live_interval() -> u64 {
    15
}
fn default_advisory_interval() -> u64 {
    30
}
fn default_bulletin_interval() -> u64 {
    600
}
fn default_pilot_refresh() -> u64 {
    300
}
fn default_controller_refresh() -> u64 {
    600
}
