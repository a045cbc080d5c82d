//! Pending payments past their due date.

use crate::config::{SLAThresholds, ThresholdKey};
use crate::core::{whole_days_between, Result, Timestamp};
use crate::records::{Payment, PaymentStatus, RecordQuery, RecordStore, TimeField};
use crate::sla::breach::{non_negative, BreachCategory, BreachItem, Severity};
use crate::sla::scanners::{plural, BreachScanner, ScanOutcome, ScannerKind};
use async_trait::async_trait;
use tracing::debug;

/// Pending payments whose due date has passed.
pub struct PaymentOverdueScanner;

fn describe(payment: &Payment, days: u64) -> String {
    let amount = format!("{:.2} {}", payment.amount, payment.currency);
    match payment.installment_number {
        Some(n) => format!(
            "Installment #{} of {} overdue by {}",
            n,
            amount,
            plural(days, "day")
        ),
        None => format!("Payment of {} overdue by {}", amount, plural(days, "day")),
    }
}

#[async_trait]
impl BreachScanner for PaymentOverdueScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::PaymentOverdue
    }

    async fn scan(
        &self,
        store: &dyn RecordStore,
        now: Timestamp,
        thresholds: &SLAThresholds,
    ) -> Result<ScanOutcome> {
        let critical_at = u64::from(thresholds.get(ThresholdKey::PaymentCriticalDays));

        let query = RecordQuery::new()
            .with_status(PaymentStatus::Pending)
            .before(TimeField::DueDate, now);
        let payments = store.payments(&query).await?;

        let breaches: Vec<BreachItem> = payments
            .iter()
            .filter_map(|payment| {
                let due = payment.due_date?;
                let days = non_negative(whole_days_between(due, now));
                if days == 0 {
                    return None;
                }

                let severity = if days >= critical_at {
                    Severity::Critical
                } else {
                    Severity::Warning
                };

                Some(
                    BreachItem::for_record(BreachCategory::Payment, payment, severity)
                        .with_title("Payment overdue")
                        .with_description(describe(payment, days))
                        .with_days_overdue(days),
                )
            })
            .collect();

        debug!(breaches = breaches.len(), "payment overdue scan complete");
        Ok(ScanOutcome::from_breaches(self.kind(), breaches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::InMemoryRecordStore;
    use crate::sla::scanners::fixtures::now;
    use chrono::Duration;

    async fn scan(payments: Vec<Payment>) -> ScanOutcome {
        let store = InMemoryRecordStore::new();
        for payment in payments {
            store.insert_payment(payment).await;
        }
        PaymentOverdueScanner
            .scan(&store, now(), &SLAThresholds::defaults())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_eight_days_overdue_is_critical() {
        let outcome = scan(vec![Payment::new("p-1", PaymentStatus::Pending, 450.0, "EUR")
            .due(now() - Duration::days(8))
            .installment(2)])
        .await;

        assert_eq!(outcome.breaches.len(), 1);
        let breach = &outcome.breaches[0];
        assert_eq!(breach.category, BreachCategory::Payment);
        assert_eq!(breach.days_overdue(), 8);
        assert_eq!(breach.severity, Severity::Critical);
        assert_eq!(
            breach.description,
            "Installment #2 of 450.00 EUR overdue by 8 days"
        );
    }

    #[tokio::test]
    async fn test_critical_at_seven_days() {
        let outcome = scan(vec![
            Payment::new("p-1", PaymentStatus::Pending, 100.0, "USD").due(now() - Duration::days(6)),
            Payment::new("p-2", PaymentStatus::Pending, 100.0, "USD").due(now() - Duration::days(7)),
        ])
        .await;

        assert_eq!(outcome.breaches[0].severity, Severity::Warning);
        assert_eq!(outcome.breaches[1].severity, Severity::Critical);
        assert_eq!(outcome.breaches[0].description, "Payment of 100.00 USD overdue by 6 days");
    }

    #[tokio::test]
    async fn test_less_than_a_day_not_emitted() {
        let outcome = scan(vec![
            Payment::new("p-1", PaymentStatus::Pending, 80.0, "EUR").due(now() - Duration::hours(20)),
        ])
        .await;
        assert!(outcome.breaches.is_empty());
        assert_eq!(outcome.matched, 0);
    }

    #[tokio::test]
    async fn test_skips_unscheduled_and_settled() {
        let outcome = scan(vec![
            Payment::new("p-1", PaymentStatus::Pending, 80.0, "EUR"),
            Payment::new("p-2", PaymentStatus::Paid, 80.0, "EUR").due(now() - Duration::days(30)),
            Payment::new("p-3", PaymentStatus::Pending, 80.0, "EUR").due(now() + Duration::days(3)),
        ])
        .await;
        assert!(outcome.breaches.is_empty());
    }

    #[tokio::test]
    async fn test_true_count_for_many_payments() {
        let payments = (0..23)
            .map(|i| {
                Payment::new(&format!("p-{}", i), PaymentStatus::Pending, 10.0, "EUR")
                    .due(now() - Duration::days(2))
            })
            .collect();
        let outcome = scan(payments).await;
        assert_eq!(outcome.matched, 23);
        assert_eq!(outcome.breaches.len(), 23);
    }
}
