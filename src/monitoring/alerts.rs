//! Breach alerting.
//!
//! Consumes published snapshots and notifies about breaches that were not
//! already alerted within a TTL. All "already shown" state lives here, not
//! in the engine.

use crate::config::MonitorConfig;
use crate::core::{Result, Timestamp};
use crate::sla::{BreachItem, SLAMetrics, Severity};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

/// An alert raised for one breach.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachAlert {
    /// Breach id
    pub breach_id: String,
    /// Originating record
    pub related_id: Option<String>,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Severity
    pub severity: Severity,
    /// Snapshot time that raised the alert
    pub raised_at: Timestamp,
}

impl BreachAlert {
    /// Create from a breach.
    pub fn from_breach(breach: &BreachItem, raised_at: Timestamp) -> Self {
        Self {
            breach_id: breach.id.clone(),
            related_id: breach.related_id.clone(),
            title: breach.title.clone(),
            description: breach.description.clone(),
            severity: breach.severity,
            raised_at,
        }
    }
}

/// Delivery channel for alerts (toast, email, chat).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert.
    async fn notify(&self, alert: &BreachAlert) -> Result<()>;
}

/// Notifier that writes alerts to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, alert: &BreachAlert) -> Result<()> {
        warn!(
            breach_id = %alert.breach_id,
            severity = %alert.severity,
            "{}: {}",
            alert.title,
            alert.description
        );
        Ok(())
    }
}

/// Bounded map of `breach id -> last shown` with a fixed TTL.
#[derive(Debug)]
pub struct AlertDeduplicator {
    ttl: chrono::Duration,
    capacity: usize,
    shown: HashMap<String, Timestamp>,
}

impl AlertDeduplicator {
    /// Create a deduplicator. A zero capacity is treated as one.
    pub fn new(ttl: chrono::Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            shown: HashMap::new(),
        }
    }

    /// Returns true and records `now` if `id` was never shown or its TTL has
    /// expired.
    pub fn should_alert(&mut self, id: &str, now: Timestamp) -> bool {
        self.evict_expired(now);

        if self.shown.contains_key(id) {
            return false;
        }

        if self.shown.len() >= self.capacity {
            self.evict_oldest();
        }
        self.shown.insert(id.to_string(), now);
        true
    }

    /// Drop the record for `id`, so it may alert again immediately.
    pub fn forget(&mut self, id: &str) {
        self.shown.remove(id);
    }

    /// Drop every entry whose TTL has expired.
    pub fn evict_expired(&mut self, now: Timestamp) {
        let ttl = self.ttl;
        self.shown.retain(|_, shown_at| now - *shown_at < ttl);
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .shown
            .iter()
            .min_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)))
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            self.shown.remove(&id);
        }
    }

    /// Number of remembered ids.
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}

/// Turns snapshots into de-duplicated notifications.
pub struct BreachAlerter {
    notifier: Arc<dyn Notifier>,
    dedup: Mutex<AlertDeduplicator>,
    min_severity: Severity,
}

impl BreachAlerter {
    /// Create an alerter for critical breaches.
    pub fn new(notifier: Arc<dyn Notifier>, config: &MonitorConfig) -> Self {
        Self {
            notifier,
            dedup: Mutex::new(AlertDeduplicator::new(
                config.alert_ttl(),
                config.alert_capacity,
            )),
            min_severity: Severity::Critical,
        }
    }

    /// Alert on breaches at or above `severity`.
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Notify for every qualifying breach in `metrics` not alerted within the
    /// TTL. Returns the alerts delivered. Failed deliveries are logged and
    /// retried on the next snapshot.
    ///
    /// Only the displayed breaches are seen, so the snapshot's display cap
    /// also bounds alerting: a breach ranked below the cap never alerts.
    pub async fn process(&self, metrics: &SLAMetrics) -> Vec<BreachAlert> {
        let now = metrics.computed_at;
        let mut dedup = self.dedup.lock().await;
        let mut delivered = Vec::new();

        for breach in &metrics.breaches {
            if breach.severity < self.min_severity || !dedup.should_alert(&breach.id, now) {
                continue;
            }

            let alert = BreachAlert::from_breach(breach, now);
            match self.notifier.notify(&alert).await {
                Ok(()) => delivered.push(alert),
                Err(error) => {
                    warn!(breach_id = %breach.id, %error, "alert delivery failed");
                    dedup.forget(&breach.id);
                }
            }
        }

        debug!(delivered = delivered.len(), "alerts processed");
        delivered
    }

    /// Process every snapshot published on `snapshots` until the sender is
    /// dropped.
    pub async fn run(self: Arc<Self>, mut snapshots: watch::Receiver<Option<Arc<SLAMetrics>>>) {
        while snapshots.changed().await.is_ok() {
            let latest = snapshots.borrow_and_update().clone();
            if let Some(metrics) = latest {
                self.process(&metrics).await;
            }
        }
    }
}
