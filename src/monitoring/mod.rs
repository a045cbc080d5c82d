//! Monitoring Module
//!
//! Observability around the SLA monitor:
//! - Tick counters with Prometheus export
//! - Breach alerting
//! - Tracing setup

pub mod alerts;
pub mod logging;
pub mod metrics;

pub use alerts::{AlertDeduplicator, BreachAlert, BreachAlerter, LogNotifier, Notifier};
pub use logging::{init_tracing, LogFormat, LogLevel, LoggingConfig};
pub use metrics::{Counter, Gauge, TickMetrics};
