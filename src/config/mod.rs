//! Configuration management for feederwatch
//!
//! This module handles loading and validating configuration from environment
//! variables, TOML files, and command-line overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::utils::normalize_base_url;

/// Default feeder address on a local network
pub const DEFAULT_BASE_URL: &str = "http://adsb-feeder.local";

/// Allowed refresh interval range, in seconds
pub const REFRESH_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 1..=60;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feeder connection configuration
    pub feeder: FeederConfig,

    /// Refresh cadence configuration
    pub poller: PollerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Feeder connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeederConfig {
    /// Base URL of the feeder web interface
    pub base_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,
}

/// Refresh cadence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Seconds between fetch cycles
    pub refresh_interval_secs: u64,

    /// Delay before the first fetch cycle, in milliseconds
    pub startup_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl FeederConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            request_timeout_secs: 5,
            user_agent: format!("feederwatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5,
            startup_delay_ms: 500,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url = std::env::var("FEEDERWATCH_URL").unwrap_or(defaults.feeder.base_url);

        let request_timeout_secs = std::env::var("FEEDERWATCH_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.feeder.request_timeout_secs);

        let user_agent =
            std::env::var("FEEDERWATCH_USER_AGENT").unwrap_or(defaults.feeder.user_agent);

        let refresh_interval_secs = std::env::var("FEEDERWATCH_REFRESH_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.poller.refresh_interval_secs);

        let startup_delay_ms = std::env::var("FEEDERWATCH_STARTUP_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.poller.startup_delay_ms);

        let level = std::env::var("FEEDERWATCH_LOG_LEVEL").unwrap_or(defaults.logging.level);

        let format = std::env::var("FEEDERWATCH_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            feeder: FeederConfig {
                base_url,
                request_timeout_secs,
                user_agent,
            },
            poller: PollerConfig {
                refresh_interval_secs,
                startup_delay_ms,
            },
            logging: LoggingConfig { level, format },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.feeder.base_url)
            .map_err(|e| anyhow::anyhow!("base_url is not a valid feeder URL: {e}"))?;

        if self.feeder.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if !REFRESH_INTERVAL_RANGE.contains(&self.poller.refresh_interval_secs) {
            anyhow::bail!(
                "refresh_interval_secs must be between {} and {}",
                REFRESH_INTERVAL_RANGE.start(),
                REFRESH_INTERVAL_RANGE.end()
            );
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("logging.format must be 'text' or 'json'");
        }

        Ok(())
    }

    /// Get refresh interval as Duration
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.poller.refresh_interval_secs)
    }

    /// Get startup delay as Duration
    #[must_use]
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.poller.startup_delay_ms)
    }
}
