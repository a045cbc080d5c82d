//! Metrics façade.
//!
//! One call resolves thresholds, runs every scanner against the record
//! store, and folds the results into an [`SLAMetrics`] snapshot. The engine
//! keeps no state between calls.

use crate::config::{ConfigStore, MonitorConfig, SLAThresholds, ThresholdResolver};
use crate::core::{Error, Result, Timestamp};
use crate::records::RecordStore;
use crate::sla::aggregator::DEFAULT_DISPLAY_LIMIT;
use crate::sla::metrics::SLAMetrics;
use crate::sla::scanners::{default_scanners, BreachScanner, ScanOutcome};
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Computes SLA snapshots.
pub struct SlaEngine {
    records: Arc<dyn RecordStore>,
    config: Arc<dyn ConfigStore>,
    scanners: Vec<Arc<dyn BreachScanner>>,
    display_limit: usize,
    tick_timeout: Duration,
}

impl SlaEngine {
    /// Create an engine with the standard scanner set and default settings.
    pub fn new(records: Arc<dyn RecordStore>, config: Arc<dyn ConfigStore>) -> Self {
        let defaults = MonitorConfig::default();
        Self {
            records,
            config,
            scanners: default_scanners(),
            display_limit: DEFAULT_DISPLAY_LIMIT,
            tick_timeout: defaults.tick_timeout(),
        }
    }

    /// Apply display cap and tick timeout from settings.
    pub fn with_settings(mut self, settings: &MonitorConfig) -> Self {
        self.display_limit = settings.display_limit;
        self.tick_timeout = settings.tick_timeout();
        self
    }

    /// Replace the scanner set.
    pub fn with_scanners(mut self, scanners: Vec<Arc<dyn BreachScanner>>) -> Self {
        self.scanners = scanners;
        self
    }

    /// Add a scanner to the set.
    pub fn add_scanner(&mut self, scanner: Arc<dyn BreachScanner>) {
        self.scanners.push(scanner);
    }

    /// Number of scanners run per tick.
    pub fn scanner_count(&self) -> usize {
        self.scanners.len()
    }

    /// Tick budget.
    pub fn tick_timeout(&self) -> Duration {
        self.tick_timeout
    }

    /// Compute one snapshot as of `now`.
    ///
    /// Any scanner failure, or running past the tick budget, fails the whole
    /// call; no partial snapshot is produced.
    pub async fn compute_sla_metrics(&self, now: Timestamp) -> Result<SLAMetrics> {
        match tokio::time::timeout(self.tick_timeout, self.compute(now)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.tick_timeout, "SLA tick timed out");
                Err(Error::TickTimeout(self.tick_timeout))
            }
        }
    }

    async fn compute(&self, now: Timestamp) -> Result<SLAMetrics> {
        let thresholds = ThresholdResolver::resolve(self.config.as_ref()).await;
        let outcomes = self.run_scanners(now, &thresholds).await?;

        let metrics = SLAMetrics::from_outcomes(outcomes, self.display_limit, now);
        debug!(
            total_breaches = metrics.total_breaches,
            critical = metrics.critical_breaches,
            health_score = metrics.health_score,
            "SLA snapshot computed"
        );
        Ok(metrics)
    }

    /// Run every scanner concurrently against the same thresholds and wait
    /// for all of them. Outcomes come back in scanner order.
    async fn run_scanners(
        &self,
        now: Timestamp,
        thresholds: &SLAThresholds,
    ) -> Result<Vec<ScanOutcome>> {
        let records = self.records.as_ref();
        let scans = self.scanners.iter().map(|scanner| async move {
            scanner.scan(records, now, thresholds).await.map_err(|error| {
                warn!(scanner = %scanner.kind(), %error, "scanner failed");
                error
            })
        });

        try_join_all(scans).await
    }
}
