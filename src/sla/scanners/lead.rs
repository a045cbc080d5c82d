//! Lead scanners: first response and re-engagement.

use crate::config::{SLAThresholds, ThresholdKey};
use crate::core::{saturating_sub, whole_hours_between, Result, Timestamp};
use crate::records::{LeadStatus, RecordQuery, RecordStore, TimeField};
use crate::sla::breach::{non_negative, BreachCategory, BreachItem, Severity};
use crate::sla::scanners::{BreachScanner, ScanOutcome, ScannerKind};
use async_trait::async_trait;
use tracing::debug;

/// New leads nobody has contacted within the first-response window.
pub struct LeadFirstResponseScanner;

#[async_trait]
impl BreachScanner for LeadFirstResponseScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::LeadFirstResponse
    }

    async fn scan(
        &self,
        store: &dyn RecordStore,
        now: Timestamp,
        thresholds: &SLAThresholds,
    ) -> Result<ScanOutcome> {
        let window = thresholds.get_i64(ThresholdKey::FirstResponseHours);
        let critical_after = u64::from(thresholds.get(ThresholdKey::LeadCriticalHours));
        let cutoff = saturating_sub(now, thresholds.duration(ThresholdKey::FirstResponseHours));

        let query = RecordQuery::new()
            .with_status(LeadStatus::New)
            .before(TimeField::CreatedAt, cutoff);
        let leads = store.leads(&query).await?;

        let breaches: Vec<BreachItem> = leads
            .iter()
            .map(|lead| {
                let waiting = whole_hours_between(lead.created_at, now);
                let overdue = non_negative(waiting - window);
                let severity = if overdue > critical_after {
                    Severity::Critical
                } else {
                    Severity::Warning
                };

                BreachItem::for_record(BreachCategory::Lead, lead, severity)
                    .with_title("Lead awaiting first response")
                    .with_description(format!(
                        "{} has waited {}h for first contact",
                        lead.full_name, waiting
                    ))
                    .with_hours_overdue(overdue)
            })
            .collect();

        debug!(breaches = breaches.len(), "lead first-response scan complete");
        Ok(ScanOutcome::from_breaches(self.kind(), breaches))
    }
}

/// Leads stuck in "incomplete data" without an update. Count only.
pub struct LeadReengagementScanner;

#[async_trait]
impl BreachScanner for LeadReengagementScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::LeadReengagement
    }

    async fn scan(
        &self,
        store: &dyn RecordStore,
        now: Timestamp,
        thresholds: &SLAThresholds,
    ) -> Result<ScanOutcome> {
        let cutoff = saturating_sub(now, thresholds.duration(ThresholdKey::ReengagementDays));
        let query = RecordQuery::new()
            .with_status(LeadStatus::IncompleteData)
            .before(TimeField::UpdatedAt, cutoff);

        let count = store.count_leads(&query).await?;
        Ok(ScanOutcome::count_only(self.kind(), count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{InMemoryRecordStore, Lead, RecordCategory};
    use crate::sla::scanners::fixtures::now;
    use chrono::Duration;

    async fn store_with(leads: Vec<Lead>) -> InMemoryRecordStore {
        let store = InMemoryRecordStore::new();
        for lead in leads {
            store.insert_lead(lead).await;
        }
        store
    }

    #[tokio::test]
    async fn test_one_breach_per_overdue_lead() {
        let store = store_with(vec![
            Lead::new("l-1", "Ana", LeadStatus::New, now() - Duration::hours(3)),
            Lead::new("l-2", "Luis", LeadStatus::New, now() - Duration::hours(10)),
            Lead::new("l-3", "Marta", LeadStatus::New, now() - Duration::hours(1)),
            Lead::new("l-4", "Omar", LeadStatus::Contacted, now() - Duration::hours(30)),
        ])
        .await;

        let outcome = LeadFirstResponseScanner
            .scan(&store, now(), &SLAThresholds::defaults())
            .await
            .unwrap();

        assert_eq!(outcome.matched, 2);
        let ids: Vec<&str> = outcome.breaches.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["lead-l-1", "lead-l-2"]);

        let first = &outcome.breaches[0];
        assert_eq!(first.hours_overdue, 1);
        assert_eq!(first.severity, Severity::Warning);
        assert_eq!(first.category, BreachCategory::Lead);
        assert_eq!(first.related_id.as_deref(), Some("l-1"));

        let second = &outcome.breaches[1];
        assert_eq!(second.hours_overdue, 8);
        assert_eq!(second.severity, Severity::Critical);
    }

    #[tokio::test]
    async fn test_critical_only_above_cutoff() {
        // 6h waiting - 2h window = 4h overdue, not above 4
        let store = store_with(vec![
            Lead::new("l-1", "Ana", LeadStatus::New, now() - Duration::hours(6)),
            Lead::new("l-2", "Luis", LeadStatus::New, now() - Duration::hours(7)),
        ])
        .await;

        let outcome = LeadFirstResponseScanner
            .scan(&store, now(), &SLAThresholds::defaults())
            .await
            .unwrap();

        assert_eq!(outcome.breaches[0].hours_overdue, 4);
        assert_eq!(outcome.breaches[0].severity, Severity::Warning);
        assert_eq!(outcome.breaches[1].hours_overdue, 5);
        assert_eq!(outcome.breaches[1].severity, Severity::Critical);
    }

    #[tokio::test]
    async fn test_partial_hour_floors_to_zero_overdue() {
        let store = store_with(vec![Lead::new(
            "l-1",
            "Ana",
            LeadStatus::New,
            now() - Duration::minutes(150),
        )])
        .await;

        let outcome = LeadFirstResponseScanner
            .scan(&store, now(), &SLAThresholds::defaults())
            .await
            .unwrap();

        assert_eq!(outcome.breaches.len(), 1);
        assert_eq!(outcome.breaches[0].hours_overdue, 0);
    }

    #[tokio::test]
    async fn test_window_override() {
        let store = store_with(vec![Lead::new(
            "l-1",
            "Ana",
            LeadStatus::New,
            now() - Duration::hours(5),
        )])
        .await;
        let thresholds = SLAThresholds::defaults().with(ThresholdKey::FirstResponseHours, 6);

        let outcome = LeadFirstResponseScanner
            .scan(&store, now(), &thresholds)
            .await
            .unwrap();
        assert!(outcome.breaches.is_empty());
    }

    #[tokio::test]
    async fn test_reengagement_counts_only() {
        let store = store_with(vec![
            Lead::new("l-1", "Ana", LeadStatus::IncompleteData, now() - Duration::days(5))
                .with_updated_at(now() - Duration::days(2)),
            Lead::new("l-2", "Luis", LeadStatus::IncompleteData, now() - Duration::days(5))
                .with_updated_at(now() - Duration::hours(3)),
            Lead::new("l-3", "Marta", LeadStatus::New, now() - Duration::days(5)),
        ])
        .await;

        let outcome = LeadReengagementScanner
            .scan(&store, now(), &SLAThresholds::defaults())
            .await
            .unwrap();

        assert_eq!(outcome.kind, ScannerKind::LeadReengagement);
        assert_eq!(outcome.matched, 1);
        assert!(outcome.breaches.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_propagates() {
        let store = InMemoryRecordStore::new();
        store.set_unavailable(RecordCategory::Lead, true).await;

        let result = LeadFirstResponseScanner
            .scan(&store, now(), &SLAThresholds::defaults())
            .await;
        assert!(result.is_err());
    }
}
