//! Periodic SLA monitor.
//!
//! Drives the engine on a fixed interval, publishes each snapshot on a
//! `watch` channel and keeps the last good one when a tick fails. At most one
//! tick runs at a time; a tick requested while another is in flight is
//! coalesced into it.

use crate::config::MonitorConfig;
use crate::core::{Error, SharedClock};
use crate::monitoring::metrics::TickMetrics;
use crate::sla::engine::SlaEngine;
use crate::sla::metrics::SLAMetrics;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Monitor lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    /// Waiting for the next tick
    Idle,
    /// A tick is computing
    Scanning,
    /// Last tick published a snapshot
    Ready,
    /// Last tick failed; the previous snapshot is still served
    Failed,
}

/// Result of one `tick()` call.
#[derive(Debug)]
pub enum TickOutcome {
    /// New snapshot published
    Published(Arc<SLAMetrics>),
    /// Tick failed; nothing published
    Failed(Error),
    /// Another tick was already running
    Coalesced,
}

impl TickOutcome {
    /// Check if a snapshot was published.
    pub fn is_published(&self) -> bool {
        matches!(self, TickOutcome::Published(_))
    }
}

/// Periodic driver around [`SlaEngine`].
pub struct SlaMonitor {
    engine: SlaEngine,
    clock: SharedClock,
    config: MonitorConfig,
    in_flight: Mutex<()>,
    state: watch::Sender<MonitorState>,
    snapshot: watch::Sender<Option<Arc<SLAMetrics>>>,
    metrics: TickMetrics,
}

impl SlaMonitor {
    /// Create a monitor. The engine picks up the display cap and tick
    /// timeout from `config`.
    pub fn new(engine: SlaEngine, clock: SharedClock, config: MonitorConfig) -> Self {
        let (state, _) = watch::channel(MonitorState::Idle);
        let (snapshot, _) = watch::channel(None);
        Self {
            engine: engine.with_settings(&config),
            clock,
            config,
            in_flight: Mutex::new(()),
            state,
            snapshot,
            metrics: TickMetrics::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> MonitorState {
        *self.state.borrow()
    }

    /// Watch state transitions.
    pub fn watch_state(&self) -> watch::Receiver<MonitorState> {
        self.state.subscribe()
    }

    /// Last successfully published snapshot.
    pub fn latest(&self) -> Option<Arc<SLAMetrics>> {
        self.snapshot.borrow().clone()
    }

    /// Watch published snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<SLAMetrics>>> {
        self.snapshot.subscribe()
    }

    /// Tick counters.
    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    /// Run one tick now.
    ///
    /// Returns `Coalesced` without waiting if a tick is already in flight.
    /// The state is left at `Ready` or `Failed`.
    pub async fn tick(&self) -> TickOutcome {
        let _guard = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                self.metrics.coalesced.inc();
                debug!("tick already in flight, coalescing");
                return TickOutcome::Coalesced;
            }
        };

        let tick_id = Uuid::new_v4();
        self.scan_once()
            .instrument(info_span!("sla_tick", %tick_id))
            .await
    }

    async fn scan_once(&self) -> TickOutcome {
        let started = Instant::now();
        self.state.send_replace(MonitorState::Scanning);

        let outcome = match self.engine.compute_sla_metrics(self.clock.now()).await {
            Ok(metrics) => {
                let metrics = Arc::new(metrics);
                self.metrics.published.inc();
                self.metrics.health_score.set(f64::from(metrics.health_score));
                self.snapshot.send_replace(Some(Arc::clone(&metrics)));
                self.state.send_replace(MonitorState::Ready);
                info!(
                    breaches = metrics.total_breaches,
                    critical = metrics.critical_breaches,
                    health_score = metrics.health_score,
                    "SLA snapshot published"
                );
                TickOutcome::Published(metrics)
            }
            Err(err) => {
                self.metrics.failed.inc();
                self.state.send_replace(MonitorState::Failed);
                error!(error = %err, "SLA tick failed, keeping last snapshot");
                TickOutcome::Failed(err)
            }
        };

        self.metrics
            .last_tick_seconds
            .set(started.elapsed().as_secs_f64());
        outcome
    }

    /// Tick on the configured interval until `shutdown` completes.
    ///
    /// The first tick fires immediately. Missed intervals are skipped, and a
    /// tick still running at shutdown is dropped.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut interval = tokio::time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval = ?self.config.poll_interval(), "SLA monitor started");

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = interval.tick() => {}
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = self.tick() => {}
            }

            self.state.send_replace(MonitorState::Idle);
        }

        self.state.send_replace(MonitorState::Idle);
        info!("SLA monitor stopped");
    }

    /// Spawn [`run`](Self::run) onto the current runtime.
    pub fn spawn<F>(self: Arc<Self>, shutdown: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InMemoryConfigStore, SLAThresholds};
    use crate::core::{FixedClock, Result, Timestamp};
    use crate::records::{InMemoryRecordStore, Payment, PaymentStatus, RecordCategory, RecordStore};
    use crate::sla::scanners::{BreachScanner, ScanOutcome, ScannerKind};
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use std::time::Duration;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    async fn store_with_overdue_payment() -> Arc<InMemoryRecordStore> {
        let store = Arc::new(InMemoryRecordStore::new());
        store
            .insert_payment(
                Payment::new("p-1", PaymentStatus::Pending, 120.0, "EUR")
                    .due(now() - ChronoDuration::days(2)),
            )
            .await;
        store
    }

    fn monitor(store: Arc<InMemoryRecordStore>) -> SlaMonitor {
        let engine = SlaEngine::new(store, Arc::new(InMemoryConfigStore::new()));
        SlaMonitor::new(engine, Arc::new(FixedClock(now())), MonitorConfig::default())
    }

    #[tokio::test]
    async fn test_tick_publishes() {
        let monitor = monitor(store_with_overdue_payment().await);
        assert_eq!(monitor.state(), MonitorState::Idle);
        assert!(monitor.latest().is_none());

        let outcome = monitor.tick().await;
        assert!(outcome.is_published());
        assert_eq!(monitor.state(), MonitorState::Ready);

        let latest = monitor.latest().unwrap();
        assert_eq!(latest.computed_at, now());
        assert_eq!(latest.health_score, 95);
        assert_eq!(monitor.metrics().published.get(), 1);
        assert_eq!(monitor.metrics().health_score.get(), 95.0);
    }

    #[tokio::test]
    async fn test_failed_tick_keeps_last_snapshot() {
        let store = store_with_overdue_payment().await;
        let monitor = monitor(store.clone());
        assert!(monitor.tick().await.is_published());

        store.set_unavailable(RecordCategory::Payment, true).await;
        let outcome = monitor.tick().await;
        assert!(matches!(outcome, TickOutcome::Failed(Error::RecordQuery { .. })));
        assert_eq!(monitor.state(), MonitorState::Failed);
        assert_eq!(monitor.metrics().failed.get(), 1);

        let latest = monitor.latest().unwrap();
        assert_eq!(latest.total_breaches, 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_snapshots() {
        let monitor = monitor(store_with_overdue_payment().await);
        let mut rx = monitor.subscribe();

        monitor.tick().await;
        tokio_test::assert_ok!(rx.changed().await);
        let seen = rx.borrow_and_update().clone().unwrap();
        assert_eq!(seen.counts.overdue_payments, 1);
    }

    struct SlowScanner;

    #[async_trait]
    impl BreachScanner for SlowScanner {
        fn kind(&self) -> ScannerKind {
            ScannerKind::DocumentReview
        }

        async fn scan(
            &self,
            _store: &dyn RecordStore,
            _now: Timestamp,
            _thresholds: &SLAThresholds,
        ) -> Result<ScanOutcome> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(ScanOutcome::count_only(self.kind(), 0))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_tick_coalesces() {
        let engine = SlaEngine::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(InMemoryConfigStore::new()),
        )
        .with_scanners(vec![Arc::new(SlowScanner)]);
        let monitor = Arc::new(SlaMonitor::new(
            engine,
            Arc::new(FixedClock(now())),
            MonitorConfig::default(),
        ));

        let running = {
            let monitor = Arc::clone(&monitor);
            tokio::spawn(async move { monitor.tick().await })
        };
        tokio::task::yield_now().await;
        assert_eq!(monitor.state(), MonitorState::Scanning);

        assert!(matches!(monitor.tick().await, TickOutcome::Coalesced));
        assert_eq!(monitor.metrics().coalesced.get(), 1);

        assert!(running.await.unwrap().is_published());
        assert_eq!(monitor.metrics().published.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_shutdown() {
        let monitor = Arc::new(monitor(store_with_overdue_payment().await));
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let handle = Arc::clone(&monitor).spawn(async move {
            let _ = stop_rx.await;
        });

        // Ticks at 0s, 60s and 120s.
        tokio::time::sleep(Duration::from_secs(150)).await;
        stop_tx.send(()).unwrap();
        handle.await.unwrap();

        assert_eq!(monitor.metrics().published.get(), 3);
        assert_eq!(monitor.state(), MonitorState::Idle);
        assert!(monitor.latest().is_some());
    }
}
