//! Monitor configuration.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the periodic SLA monitor and its alerting consumer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between ticks
    pub poll_interval_secs: u64,
    /// Seconds a tick may run before it is abandoned
    pub tick_timeout_secs: u64,
    /// Maximum breaches exposed in a snapshot
    pub display_limit: usize,
    /// Seconds before an already-alerted breach may alert again
    pub alert_ttl_secs: u64,
    /// Maximum breach ids remembered by the alerter
    pub alert_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            tick_timeout_secs: 30,
            display_limit: 10,
            alert_ttl_secs: 3600,
            alert_capacity: 500,
        }
    }
}

impl MonitorConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the monitor cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(Error::InvalidConfig(
                "poll_interval_secs must be positive".to_string(),
            ));
        }
        if self.tick_timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "tick_timeout_secs must be positive".to_string(),
            ));
        }
        if self.display_limit == 0 {
            return Err(Error::InvalidConfig(
                "display_limit must be positive".to_string(),
            ));
        }
        if self.alert_capacity == 0 {
            return Err(Error::InvalidConfig(
                "alert_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the polling interval.
    pub fn with_poll_interval(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Set the tick timeout.
    pub fn with_tick_timeout(mut self, secs: u64) -> Self {
        self.tick_timeout_secs = secs;
        self
    }

    /// Set the display cap.
    pub fn with_display_limit(mut self, limit: usize) -> Self {
        self.display_limit = limit;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn tick_timeout(&self) -> Duration {
        Duration::from_secs(self.tick_timeout_secs)
    }

    pub fn alert_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.alert_ttl_secs).unwrap_or(i64::MAX))
    }
}
