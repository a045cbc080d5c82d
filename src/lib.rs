//! # casewatch - SLA breach detection for case management
//!
//! Scans a case-management record store for overdue business facts and
//! folds them into a health snapshot:
//! - **Config**: named SLA thresholds with defaults, resolved per tick
//! - **Records**: typed leads, contracts, payments, requirements, documents
//! - **SLA**: category scanners, aggregation, health score, periodic monitor
//! - **Monitoring**: tick counters, breach alerting, tracing setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use casewatch::config::{InMemoryConfigStore, MonitorConfig};
//! use casewatch::core::SystemClock;
//! use casewatch::records::InMemoryRecordStore;
//! use casewatch::sla::{SlaEngine, SlaMonitor, SlaReporter};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = SlaEngine::new(
//!         Arc::new(InMemoryRecordStore::new()),
//!         Arc::new(InMemoryConfigStore::new()),
//!     );
//!     let monitor = SlaMonitor::new(engine, Arc::new(SystemClock), MonitorConfig::default());
//!
//!     monitor.tick().await;
//!     if let Some(metrics) = monitor.latest() {
//!         println!("{}", SlaReporter::to_text(&metrics));
//!     }
//! }
//! ```

pub mod config;
pub mod core;
pub mod monitoring;
pub mod records;
pub mod sla;

pub use core::error::{Error, Result};
