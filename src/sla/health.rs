//! Health score.
//!
//! `100 - 15 * critical - 5 * other`, clamped to `[0, 100]`. Computed from
//! the full breach set, so it does not depend on sort order or truncation.

use crate::sla::breach::{BreachItem, Severity};

/// Score with no breaches.
pub const MAX_HEALTH_SCORE: u8 = 100;

/// Points lost per critical breach.
pub const CRITICAL_PENALTY: u64 = 15;

/// Points lost per non-critical breach.
pub const WARNING_PENALTY: u64 = 5;

/// Score a breach set.
pub fn health_score(breaches: &[BreachItem]) -> u8 {
    let critical = breaches
        .iter()
        .filter(|b| b.severity == Severity::Critical)
        .count() as u64;
    let other = breaches.len() as u64 - critical;

    score_from_counts(critical, other)
}

/// Score from pre-computed severity counts.
pub fn score_from_counts(critical: u64, other: u64) -> u8 {
    let penalty = critical
        .saturating_mul(CRITICAL_PENALTY)
        .saturating_add(other.saturating_mul(WARNING_PENALTY));
    let score = u64::from(MAX_HEALTH_SCORE).saturating_sub(penalty);
    score as u8
}
