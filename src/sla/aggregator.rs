//! Breach aggregation.
//!
//! Merges scanner outcomes, orders breaches by priority and caps the list
//! shown to callers. Counts always come from the full set.

use crate::sla::breach::BreachItem;
use crate::sla::scanners::{ScanOutcome, ScannerKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default number of breaches exposed in a snapshot.
pub const DEFAULT_DISPLAY_LIMIT: usize = 10;

/// Per-category counts for one snapshot.
///
/// `upcoming_payments`, `onboarding_incomplete` and `tie_pending_pickup` have
/// no scanner yet and stay zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub leads_without_response: u64,
    pub incomplete_leads: u64,
    pub contracts_pending_signature: u64,
    pub overdue_payments: u64,
    pub upcoming_payments: u64,
    pub pending_requirements: u64,
    pub documents_awaiting_review: u64,
    pub onboarding_incomplete: u64,
    pub tie_pending_pickup: u64,
}

impl CategoryCounts {
    /// Record the count reported by one scanner.
    pub fn record(&mut self, kind: ScannerKind, matched: u64) {
        let slot = match kind {
            ScannerKind::LeadFirstResponse => &mut self.leads_without_response,
            ScannerKind::LeadReengagement => &mut self.incomplete_leads,
            ScannerKind::ContractSignature => &mut self.contracts_pending_signature,
            ScannerKind::PaymentOverdue => &mut self.overdue_payments,
            ScannerKind::RequirementDeadline => &mut self.pending_requirements,
            ScannerKind::DocumentReview => &mut self.documents_awaiting_review,
        };
        *slot += matched;
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.leads_without_response
            + self.incomplete_leads
            + self.contracts_pending_signature
            + self.overdue_payments
            + self.upcoming_payments
            + self.pending_requirements
            + self.documents_awaiting_review
            + self.onboarding_incomplete
            + self.tie_pending_pickup
    }
}

/// Priority order: critical before warning, then longest overdue first.
pub fn breach_priority(a: &BreachItem, b: &BreachItem) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| b.hours_overdue.cmp(&a.hours_overdue))
}

/// Stable sort by priority. Equal items keep scanner order.
pub fn sort_breaches(breaches: &mut [BreachItem]) {
    breaches.sort_by(breach_priority);
}

/// Result of merging one tick's scanner outcomes.
#[derive(Clone, Debug)]
pub struct Aggregation {
    /// Counts from the untruncated set
    pub counts: CategoryCounts,
    /// Every breach, sorted
    pub all: Vec<BreachItem>,
}

impl Aggregation {
    /// Merge outcomes in the order given.
    pub fn merge(outcomes: Vec<ScanOutcome>) -> Self {
        let mut counts = CategoryCounts::default();
        let mut all = Vec::new();

        for outcome in outcomes {
            counts.record(outcome.kind, outcome.matched);
            all.extend(outcome.breaches);
        }

        sort_breaches(&mut all);
        Self { counts, all }
    }

    /// The first `limit` breaches in priority order.
    pub fn displayed(&self, limit: usize) -> Vec<BreachItem> {
        self.all.iter().take(limit).cloned().collect()
    }
}
