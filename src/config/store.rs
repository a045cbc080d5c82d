//! Configuration store access and threshold resolution.

use crate::config::thresholds::{SLAThresholds, ThresholdKey};
use crate::core::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Key/value configuration store holding SLA overrides.
///
/// Absent keys are normal and simply left out of the returned map.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the values stored for `keys`.
    async fn get_values(&self, keys: &[&str]) -> Result<HashMap<String, String>>;
}

/// Configuration store held in memory.
pub struct InMemoryConfigStore {
    values: RwLock<HashMap<String, String>>,
    reachable: RwLock<bool>,
}

impl InMemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            reachable: RwLock::new(true),
        }
    }

    /// Create a store pre-populated with values.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            reachable: RwLock::new(true),
        }
    }

    /// Set a value.
    pub async fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    /// Remove a value.
    pub async fn remove(&self, key: &str) {
        self.values.write().await.remove(key);
    }

    /// Simulate the store going down or coming back.
    pub async fn set_reachable(&self, reachable: bool) {
        *self.reachable.write().await = reachable;
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get_values(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        if !*self.reachable.read().await {
            return Err(Error::ConfigurationRead("store unreachable".to_string()));
        }

        let values = self.values.read().await;
        Ok(keys
            .iter()
            .filter_map(|k| values.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }
}

/// Parse an override. Only positive integers are accepted.
pub fn parse_override(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

/// Resolves named thresholds against the configuration store.
pub struct ThresholdResolver;

impl ThresholdResolver {
    /// Build thresholds from raw key/value pairs, falling back to defaults
    /// for anything missing or unparsable.
    pub fn from_values(values: &HashMap<String, String>) -> SLAThresholds {
        let mut thresholds = SLAThresholds::defaults();

        for key in ThresholdKey::ALL {
            let Some(raw) = values.get(key.config_key()) else {
                continue;
            };

            match parse_override(raw) {
                Some(value) => thresholds = thresholds.with(key, value),
                None => debug!(key = key.config_key(), raw = %raw, "ignoring unusable SLA override"),
            }
        }

        thresholds
    }

    /// Read the full key set once and resolve it. A store failure degrades to
    /// defaults and never fails the caller.
    pub async fn resolve(store: &dyn ConfigStore) -> SLAThresholds {
        let keys: Vec<&str> = ThresholdKey::ALL.iter().map(|k| k.config_key()).collect();

        match store.get_values(&keys).await {
            Ok(values) => Self::from_values(&values),
            Err(error) => {
                warn!(%error, "SLA configuration unavailable, using default thresholds");
                SLAThresholds::defaults()
            }
        }
    }
}
