//! Filtered reads against the record store.

use crate::core::Timestamp;
use crate::records::types::{Record, TimeField};
use serde::{Deserialize, Serialize};

/// Filter for one record category.
///
/// Status membership is an `IN` test (plain equality with one status).
/// Time bounds are strict and apply to `time_field`; a null column never
/// satisfies a bound.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordQuery<S> {
    /// Accepted statuses (empty = any)
    pub statuses: Vec<S>,
    /// Column the time bounds apply to
    pub time_field: Option<TimeField>,
    /// Column value must be strictly before this
    pub before: Option<Timestamp>,
    /// Column value must be strictly after this
    pub after: Option<Timestamp>,
    /// Maximum results
    pub limit: Option<usize>,
}

impl<S> Default for RecordQuery<S> {
    fn default() -> Self {
        Self {
            statuses: Vec::new(),
            time_field: None,
            before: None,
            after: None,
            limit: None,
        }
    }
}

impl<S: Clone + PartialEq> RecordQuery<S> {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match a single status.
    pub fn with_status(mut self, status: S) -> Self {
        self.statuses = vec![status];
        self
    }

    /// Match any of the given statuses.
    pub fn with_statuses(mut self, statuses: Vec<S>) -> Self {
        self.statuses = statuses;
        self
    }

    /// Require `field < at`.
    pub fn before(mut self, field: TimeField, at: Timestamp) -> Self {
        self.time_field = Some(field);
        self.before = Some(at);
        self
    }

    /// Require `field > at`.
    pub fn after(mut self, field: TimeField, at: Timestamp) -> Self {
        self.time_field = Some(field);
        self.after = Some(at);
        self
    }

    /// Set result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check if a record matches this query.
    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: Record<Status = S>,
    {
        if !self.statuses.is_empty() && !self.statuses.contains(record.status()) {
            return false;
        }

        if let Some(field) = self.time_field {
            let Some(value) = record.timestamp(field) else {
                return false;
            };

            if let Some(before) = self.before {
                if value >= before {
                    return false;
                }
            }

            if let Some(after) = self.after {
                if value <= after {
                    return false;
                }
            }
        }

        true
    }

    /// Apply this query to an in-memory slice, honoring `limit`.
    pub fn apply<R>(&self, records: &[R]) -> Vec<R>
    where
        R: Record<Status = S>,
    {
        let matched = records.iter().filter(|r| self.matches(*r)).cloned();
        match self.limit {
            Some(limit) => matched.take(limit).collect(),
            None => matched.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::types::{Lead, LeadStatus, Payment, PaymentStatus};
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_query_matches_all() {
        let lead = Lead::new("l-1", "Ana", LeadStatus::New, t0());
        assert!(RecordQuery::new().matches(&lead));
    }

    #[test]
    fn test_status_filter() {
        let lead = Lead::new("l-1", "Ana", LeadStatus::Contacted, t0());
        assert!(!RecordQuery::new().with_status(LeadStatus::New).matches(&lead));
        assert!(RecordQuery::new()
            .with_statuses(vec![LeadStatus::New, LeadStatus::Contacted])
            .matches(&lead));
    }

    #[test]
    fn test_before_is_strict() {
        let lead = Lead::new("l-1", "Ana", LeadStatus::New, t0());
        let at_boundary = RecordQuery::new().before(TimeField::CreatedAt, t0());
        assert!(!at_boundary.matches(&lead));

        let later = RecordQuery::new().before(TimeField::CreatedAt, t0() + Duration::seconds(1));
        assert!(later.matches(&lead));
    }

    #[test]
    fn test_after_is_strict() {
        let lead = Lead::new("l-1", "Ana", LeadStatus::New, t0());
        assert!(!RecordQuery::new().after(TimeField::CreatedAt, t0()).matches(&lead));
        assert!(RecordQuery::new()
            .after(TimeField::CreatedAt, t0() - Duration::seconds(1))
            .matches(&lead));
    }

    #[test]
    fn test_null_field_never_matches_bound() {
        let payment = Payment::new("p-1", PaymentStatus::Pending, 50.0, "EUR");
        let query = RecordQuery::new()
            .with_status(PaymentStatus::Pending)
            .before(TimeField::DueDate, t0());
        assert!(!query.matches(&payment));

        let scheduled = payment.due(t0() - Duration::days(1));
        assert!(query.matches(&scheduled));
    }

    #[test]
    fn test_apply_limit_preserves_order() {
        let leads: Vec<Lead> = (0..5)
            .map(|i| Lead::new(&format!("l-{}", i), "X", LeadStatus::New, t0()))
            .collect();
        let result = RecordQuery::new().with_limit(2).apply(&leads);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "l-0");
        assert_eq!(result[1].id, "l-1");
    }
}
