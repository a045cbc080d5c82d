//! Category scanners.
//!
//! Each scanner issues exactly one filtered read against its record
//! category and turns the result into breach items (or a bare count). Scanners
//! are independent and read-only, so a tick may run them in any order or all
//! at once.

pub mod contract;
pub mod document;
pub mod lead;
pub mod payment;
pub mod requirement;

use crate::config::SLAThresholds;
use crate::core::{Result, Timestamp};
use crate::records::RecordStore;
use crate::sla::breach::BreachItem;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use contract::ContractSignatureScanner;
pub use document::DocumentReviewScanner;
pub use lead::{LeadFirstResponseScanner, LeadReengagementScanner};
pub use payment::PaymentOverdueScanner;
pub use requirement::RequirementDeadlineScanner;

/// Identifies a scanner and the count it contributes to a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScannerKind {
    LeadFirstResponse,
    LeadReengagement,
    ContractSignature,
    PaymentOverdue,
    RequirementDeadline,
    DocumentReview,
}

impl std::fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScannerKind::LeadFirstResponse => write!(f, "lead_first_response"),
            ScannerKind::LeadReengagement => write!(f, "lead_reengagement"),
            ScannerKind::ContractSignature => write!(f, "contract_signature"),
            ScannerKind::PaymentOverdue => write!(f, "payment_overdue"),
            ScannerKind::RequirementDeadline => write!(f, "requirement_deadline"),
            ScannerKind::DocumentReview => write!(f, "document_review"),
        }
    }
}

/// What one scanner found in one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Scanner that produced this outcome
    pub kind: ScannerKind,
    /// True number of matching records
    pub matched: u64,
    /// Breach items (empty for count-only scanners)
    pub breaches: Vec<BreachItem>,
}

impl ScanOutcome {
    /// Outcome whose count is the number of breaches.
    pub fn from_breaches(kind: ScannerKind, breaches: Vec<BreachItem>) -> Self {
        Self {
            kind,
            matched: breaches.len() as u64,
            breaches,
        }
    }

    /// Count-only outcome.
    pub fn count_only(kind: ScannerKind, matched: u64) -> Self {
        Self {
            kind,
            matched,
            breaches: Vec::new(),
        }
    }
}

/// A read-only scan of one record category.
#[async_trait]
pub trait BreachScanner: Send + Sync {
    /// Which scanner this is.
    fn kind(&self) -> ScannerKind;

    /// Scan the store as of `now`. Returns an empty outcome when nothing is
    /// overdue; read failures propagate.
    async fn scan(
        &self,
        store: &dyn RecordStore,
        now: Timestamp,
        thresholds: &SLAThresholds,
    ) -> Result<ScanOutcome>;
}

/// The standard scanner set, in a fixed order.
pub fn default_scanners() -> Vec<Arc<dyn BreachScanner>> {
    vec![
        Arc::new(LeadFirstResponseScanner),
        Arc::new(LeadReengagementScanner),
        Arc::new(ContractSignatureScanner),
        Arc::new(PaymentOverdueScanner),
        Arc::new(RequirementDeadlineScanner),
        Arc::new(DocumentReviewScanner),
    ]
}

/// Pluralized unit label for descriptions.
pub(crate) fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_scanners_unique() {
        let scanners = default_scanners();
        assert_eq!(scanners.len(), 6);
        let kinds: HashSet<ScannerKind> = scanners.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds.len(), 6);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "day"), "1 day");
        assert_eq!(plural(3, "day"), "3 days");
        assert_eq!(plural(0, "hour"), "0 hours");
    }

    #[test]
    fn test_outcome_constructors() {
        let outcome = ScanOutcome::count_only(ScannerKind::DocumentReview, 4);
        assert_eq!(outcome.matched, 4);
        assert!(outcome.breaches.is_empty());

        let outcome = ScanOutcome::from_breaches(ScannerKind::PaymentOverdue, Vec::new());
        assert_eq!(outcome.matched, 0);
    }
}
