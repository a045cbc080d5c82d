//! Configuration Module
//!
//! - Named SLA thresholds and their defaults
//! - Configuration store and threshold resolution
//! - Monitor settings

pub mod settings;
pub mod store;
pub mod thresholds;

pub use settings::MonitorConfig;
pub use store::{ConfigStore, InMemoryConfigStore, ThresholdResolver};
pub use thresholds::{SLAThresholds, ThresholdKey, ThresholdUnit};
