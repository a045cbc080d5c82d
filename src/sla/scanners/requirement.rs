//! Authority requirements approaching or past their response deadline.

use crate::config::{SLAThresholds, ThresholdKey};
use crate::core::{saturating_add, whole_hours_between, Result, Timestamp};
use crate::records::{AuthorityRequirement, RecordQuery, RecordStore, RequirementStatus};
use crate::sla::breach::{non_negative, BreachCategory, BreachItem, Severity};
use crate::sla::scanners::{BreachScanner, ScanOutcome, ScannerKind};
use async_trait::async_trait;
use tracing::debug;

/// Deadline in force for a requirement: the internal deadline if one was
/// set, otherwise the default response window from creation.
pub fn effective_deadline(req: &AuthorityRequirement, thresholds: &SLAThresholds) -> Timestamp {
    req.internal_deadline.unwrap_or_else(|| {
        saturating_add(
            req.created_at,
            thresholds.duration(ThresholdKey::RequirementResponseHours),
        )
    })
}

/// Open requirements past their deadline (critical) or due within the
/// look-ahead window (warning, zero hours overdue).
pub struct RequirementDeadlineScanner;

#[async_trait]
impl BreachScanner for RequirementDeadlineScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::RequirementDeadline
    }

    async fn scan(
        &self,
        store: &dyn RecordStore,
        now: Timestamp,
        thresholds: &SLAThresholds,
    ) -> Result<ScanOutcome> {
        let lookahead = thresholds.duration(ThresholdKey::RequirementLookaheadHours);

        let query = RecordQuery::new().with_statuses(RequirementStatus::open());
        let requirements = store.requirements(&query).await?;

        let mut breaches = Vec::new();
        for req in &requirements {
            let deadline = effective_deadline(req, thresholds);

            if deadline < now {
                let hours = non_negative(whole_hours_between(deadline, now));
                breaches.push(
                    BreachItem::for_record(BreachCategory::Requirement, req, Severity::Critical)
                        .with_title("Authority requirement overdue")
                        .with_description(format!(
                            "{} ({}h past deadline)",
                            req.description, hours
                        ))
                        .with_hours_overdue(hours),
                );
            } else if deadline - now <= lookahead {
                let remaining = non_negative(whole_hours_between(now, deadline));
                breaches.push(
                    BreachItem::for_record(BreachCategory::Requirement, req, Severity::Warning)
                        .with_title("Authority requirement due soon")
                        .with_description(format!("{} (due in {}h)", req.description, remaining))
                        .with_hours_overdue(0),
                );
            }
        }

        debug!(breaches = breaches.len(), "requirement deadline scan complete");
        Ok(ScanOutcome::from_breaches(self.kind(), breaches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::InMemoryRecordStore;
    use crate::sla::scanners::fixtures::now;
    use chrono::Duration;

    async fn scan(requirements: Vec<AuthorityRequirement>) -> ScanOutcome {
        let store = InMemoryRecordStore::new();
        for req in requirements {
            store.insert_requirement(req).await;
        }
        RequirementDeadlineScanner
            .scan(&store, now(), &SLAThresholds::defaults())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_default_window_overdue() {
        let outcome = scan(vec![AuthorityRequirement::new(
            "r-1",
            RequirementStatus::Pending,
            "Criminal record certificate",
            now() - Duration::hours(50),
        )])
        .await;

        assert_eq!(outcome.breaches.len(), 1);
        let breach = &outcome.breaches[0];
        assert_eq!(breach.severity, Severity::Critical);
        assert_eq!(breach.hours_overdue, 2);
        assert_eq!(breach.id, "requirement-r-1");
    }

    #[tokio::test]
    async fn test_internal_deadline_wins() {
        let outcome = scan(vec![AuthorityRequirement::new(
            "r-1",
            RequirementStatus::InProgress,
            "Bank statements",
            now() - Duration::hours(50),
        )
        .with_deadline(now() + Duration::days(5))])
        .await;
        assert!(outcome.breaches.is_empty());
    }

    #[tokio::test]
    async fn test_lookahead_warning_has_zero_overdue() {
        let outcome = scan(vec![AuthorityRequirement::new(
            "r-1",
            RequirementStatus::Pending,
            "Sworn translation",
            now() - Duration::hours(30),
        )])
        .await;

        // Default deadline is 18h away, inside the 24h look-ahead.
        assert_eq!(outcome.breaches.len(), 1);
        let breach = &outcome.breaches[0];
        assert_eq!(breach.severity, Severity::Warning);
        assert_eq!(breach.hours_overdue, 0);
        assert!(breach.description.contains("due in 18h"));
    }

    #[tokio::test]
    async fn test_outside_lookahead_ignored() {
        let outcome = scan(vec![AuthorityRequirement::new(
            "r-1",
            RequirementStatus::Pending,
            "Proof of address",
            now() - Duration::hours(10),
        )])
        .await;
        assert!(outcome.breaches.is_empty());
    }

    #[tokio::test]
    async fn test_closed_requirements_ignored() {
        let outcome = scan(vec![
            AuthorityRequirement::new("r-1", RequirementStatus::Responded, "A", now() - Duration::days(9)),
            AuthorityRequirement::new("r-2", RequirementStatus::Closed, "B", now() - Duration::days(9)),
        ])
        .await;
        assert!(outcome.breaches.is_empty());
    }

    #[test]
    fn test_effective_deadline() {
        let created = now();
        let req = AuthorityRequirement::new("r-1", RequirementStatus::Pending, "A", created);
        assert_eq!(
            effective_deadline(&req, &SLAThresholds::defaults()),
            created + Duration::hours(48)
        );

        let thresholds =
            SLAThresholds::defaults().with(ThresholdKey::RequirementResponseHours, 72);
        assert_eq!(effective_deadline(&req, &thresholds), created + Duration::hours(72));
    }
}
