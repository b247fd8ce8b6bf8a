//! Configuration management for the watch engine.
//!
//! Provides hierarchical configuration loading from multiple sources with priority:
//! 1. Default values (hardcoded)
//! 2. Base config file (config/default.toml)
//! 3. Explicit override file (argument or CONFIG_PATH)
//! 4. Local overrides (config/local.toml)
//! 5. Environment variables (highest priority)

mod monitor;
mod network;
mod notify;
pub use monitor::*;
pub use network::*;
pub use notify::*;


//---
use std::env;
use std::path::PathBuf;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
    /// Outbound endpoints and HTTP timeouts
    #[serde(default)]
    pub network: NetworkConfig,

    /// Poll and refresh intervals
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Notification channel settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Watch-list store settings
    #[serde(default)]
    pub store: StoreConfig,
}

impl Settings {
    /// Load configuration from multiple sources with priority:
    /// 1. Base config file
    /// 2. Explicit override file (argument, then CONFIG_PATH)
    /// 3. Local overrides
    /// 4. Environment variables
    ///
    /// # Arguments
    /// * `override_path` - Optional path to an extra configuration file
    ///
    /// # Returns
    /// Merged and validated configuration
    pub fn load(override_path: Option<&str>) -> Result<Self> {
        let mut config = Config::builder();

        // 1. Base config
        config = config.add_source(File::with_name("config/default").required(false));

        // 2. Explicit override file
        if let Some(path) = override_path {
            config = config.add_source(File::with_name(path).required(true));
        }
        if let Ok(path) = env::var("CONFIG_PATH") {
            config = config.add_source(File::with_name(&path));
        }

        // 3. Local overrides
        config = config.add_source(File::with_name("config/local").required(false));

        // 4. Environment variables (highest priority)
        config = config.add_source(
            Environment::with_prefix("SKYWATCH")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: Settings = config.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validates all subsystem configurations
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.monitor.validate()?;
        self.notify.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

/// Watch-list store settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    /// Directory holding the JSON watch-list documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory for log output
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_dir: default_log_dir(),
        }
    }
}

impl StoreConfig {
    fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Message("store.data_dir must not be empty".into()).into());
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}
