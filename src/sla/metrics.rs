//! SLA snapshot.

use crate::core::Timestamp;
use crate::sla::aggregator::{Aggregation, CategoryCounts};
use crate::sla::breach::BreachItem;
use crate::sla::health::health_score;
use crate::sla::scanners::ScanOutcome;
use serde::{Deserialize, Serialize};

/// One immutable snapshot of SLA health.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SLAMetrics {
    /// Instant the snapshot was computed for
    pub computed_at: Timestamp,
    /// Per-category counts from the full breach set
    pub counts: CategoryCounts,
    /// Top breaches in priority order, capped
    pub breaches: Vec<BreachItem>,
    /// Breaches before truncation
    pub total_breaches: u64,
    /// Critical breaches before truncation
    pub critical_breaches: u64,
    /// 0-100 health score from the full breach set
    pub health_score: u8,
}

impl SLAMetrics {
    /// Build a snapshot from one tick's scanner outcomes.
    pub fn from_outcomes(
        outcomes: Vec<ScanOutcome>,
        display_limit: usize,
        computed_at: Timestamp,
    ) -> Self {
        let aggregation = Aggregation::merge(outcomes);
        let critical_breaches = aggregation.all.iter().filter(|b| b.is_critical()).count() as u64;

        Self {
            computed_at,
            health_score: health_score(&aggregation.all),
            total_breaches: aggregation.all.len() as u64,
            critical_breaches,
            breaches: aggregation.displayed(display_limit),
            counts: aggregation.counts,
        }
    }

    /// Snapshot with nothing overdue.
    pub fn all_clear(computed_at: Timestamp) -> Self {
        Self::from_outcomes(Vec::new(), 0, computed_at)
    }

    /// Whether any breach exists, shown or not.
    pub fn has_breaches(&self) -> bool {
        self.total_breaches > 0
    }

    /// Whether the breach list was cut.
    pub fn is_truncated(&self) -> bool {
        (self.breaches.len() as u64) < self.total_breaches
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> crate::core::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
