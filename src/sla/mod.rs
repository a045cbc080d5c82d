//! SLA Module
//!
//! Breach detection and health scoring:
//! - Category scanners over the record store
//! - Aggregation and health score
//! - Metrics façade and periodic monitor
//! - Reporting

pub mod aggregator;
pub mod breach;
pub mod engine;
pub mod health;
pub mod metrics;
pub mod monitor;
pub mod reporter;
pub mod scanners;

pub use aggregator::{sort_breaches, Aggregation, CategoryCounts, DEFAULT_DISPLAY_LIMIT};
pub use breach::{BreachCategory, BreachItem, Severity};
pub use engine::SlaEngine;
pub use health::{health_score, score_from_counts};
pub use metrics::SLAMetrics;
pub use monitor::{MonitorState, SlaMonitor, TickOutcome};
pub use reporter::SlaReporter;
pub use scanners::{default_scanners, BreachScanner, ScanOutcome, ScannerKind};
