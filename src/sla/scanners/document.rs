//! Submitted documents waiting on review. Count only.

use crate::config::{SLAThresholds, ThresholdKey};
use crate::core::{saturating_sub, Result, Timestamp};
use crate::records::{DocumentStatus, RecordQuery, RecordStore, TimeField};
use crate::sla::scanners::{BreachScanner, ScanOutcome, ScannerKind};
use async_trait::async_trait;

pub struct DocumentReviewScanner;

#[async_trait]
impl BreachScanner for DocumentReviewScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::DocumentReview
    }

    async fn scan(
        &self,
        store: &dyn RecordStore,
        now: Timestamp,
        thresholds: &SLAThresholds,
    ) -> Result<ScanOutcome> {
        let cutoff = saturating_sub(now, thresholds.duration(ThresholdKey::DocumentReviewHours));
        let query = RecordQuery::new()
            .with_status(DocumentStatus::Submitted)
            .before(TimeField::UploadedAt, cutoff);

        let count = store.count_documents(&query).await?;
        Ok(ScanOutcome::count_only(self.kind(), count))
    }
}
