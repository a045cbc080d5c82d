//! Monitor counters and gauges.
//!
//! Tracks tick outcomes and exports them in Prometheus text format.

use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric (monotonically increasing).
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment by 1.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current value.
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicU64, // f64 bits
}

impl Gauge {
    /// Create a new gauge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gauge value.
    pub fn set(&self, value: f64) {
        self.value.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Get current value.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }
}

/// Outcome counters for the SLA monitor.
#[derive(Debug, Default)]
pub struct TickMetrics {
    /// Ticks that published a snapshot
    pub published: Counter,
    /// Ticks that failed (query error or timeout)
    pub failed: Counter,
    /// Ticks skipped because one was already running
    pub coalesced: Counter,
    /// Health score of the last published snapshot
    pub health_score: Gauge,
    /// Wall time of the last completed tick, in seconds
    pub last_tick_seconds: Gauge,
}

impl TickMetrics {
    /// Create zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Export metrics in Prometheus format.
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        let counters = [
            ("casewatch_ticks_published_total", "Ticks that published a snapshot", self.published.get()),
            ("casewatch_ticks_failed_total", "Ticks that failed", self.failed.get()),
            ("casewatch_ticks_coalesced_total", "Ticks skipped while another was running", self.coalesced.get()),
        ];
        for (name, help, value) in counters {
            output.push_str(&format!("# HELP {} {}\n", name, help));
            output.push_str(&format!("# TYPE {} counter\n", name));
            output.push_str(&format!("{} {}\n", name, value));
        }

        let gauges = [
            ("casewatch_health_score", "Health score of the last snapshot", self.health_score.get()),
            ("casewatch_last_tick_seconds", "Duration of the last tick", self.last_tick_seconds.get()),
        ];
        for (name, help, value) in gauges {
            output.push_str(&format!("# HELP {} {}\n", name, help));
            output.push_str(&format!("# TYPE {} gauge\n", name));
            output.push_str(&format!("{} {}\n", name, value));
        }

        output
    }
}
