//! Contracts sent for signature and not signed in time.

use crate::config::{SLAThresholds, ThresholdKey};
use crate::core::{saturating_add, saturating_sub, Result, Timestamp};
use crate::records::{ContractStatus, RecordQuery, RecordStore, TimeField};
use crate::sla::breach::{non_negative, BreachCategory, BreachItem, Severity};
use crate::sla::scanners::{plural, BreachScanner, ScanOutcome, ScannerKind};
use async_trait::async_trait;
use tracing::debug;

const SECONDS_PER_DAY: i64 = 86_400;

/// Days a contract is past its signature deadline. Any started day counts,
/// so the value is positive as soon as the deadline has passed.
pub fn days_past_deadline(deadline: Timestamp, now: Timestamp) -> i64 {
    let overage = (now - deadline).num_seconds();
    if overage <= 0 {
        return 0;
    }
    (overage + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

/// Contracts in "sent" status older than the signature window.
pub struct ContractSignatureScanner;

#[async_trait]
impl BreachScanner for ContractSignatureScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::ContractSignature
    }

    async fn scan(
        &self,
        store: &dyn RecordStore,
        now: Timestamp,
        thresholds: &SLAThresholds,
    ) -> Result<ScanOutcome> {
        let window = thresholds.duration(ThresholdKey::SignatureReminderDays);
        let critical_after = u64::from(thresholds.get(ThresholdKey::ContractCriticalDays));

        let query = RecordQuery::new()
            .with_status(ContractStatus::Sent)
            .before(TimeField::CreatedAt, saturating_sub(now, window));
        let contracts = store.contracts(&query).await?;

        let mut breaches = Vec::with_capacity(contracts.len());
        for contract in &contracts {
            let deadline = signature_deadline(contract.created_at, thresholds);
            let days = non_negative(days_past_deadline(deadline, now));
            if days == 0 {
                continue;
            }

            let severity = if days > critical_after {
                Severity::Critical
            } else {
                Severity::Warning
            };
            let label = contract
                .contract_number
                .clone()
                .unwrap_or_else(|| contract.id.clone());

            breaches.push(
                BreachItem::for_record(BreachCategory::Contract, contract, severity)
                    .with_title("Contract awaiting signature")
                    .with_description(format!(
                        "Contract {} unsigned {} past the reminder window",
                        label,
                        plural(days, "day")
                    ))
                    .with_days_overdue(days),
            );
        }

        debug!(breaches = breaches.len(), "contract signature scan complete");
        Ok(ScanOutcome::from_breaches(self.kind(), breaches))
    }
}

/// When a contract sent at `created_at` should have been signed.
pub fn signature_deadline(created_at: Timestamp, thresholds: &SLAThresholds) -> Timestamp {
    saturating_add(
        created_at,
        thresholds.duration(ThresholdKey::SignatureReminderDays),
    )
}
