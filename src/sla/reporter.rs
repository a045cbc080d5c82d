//! SLA reporting.
//!
//! Renders snapshots as text summaries or JSON.

use crate::core::Result;
use crate::sla::breach::Severity;
use crate::sla::metrics::SLAMetrics;

/// SLA reporter.
pub struct SlaReporter;

impl SlaReporter {
    /// Render a snapshot as JSON.
    pub fn to_json(metrics: &SLAMetrics) -> Result<String> {
        Ok(serde_json::to_string_pretty(metrics)?)
    }

    /// Render a snapshot as text.
    pub fn to_text(metrics: &SLAMetrics) -> String {
        let mut output = String::new();

        output.push_str(&format!("SLA Health: {}/100\n", metrics.health_score));
        output.push_str(&format!("Computed At: {}\n", metrics.computed_at.to_rfc3339()));
        output.push_str(&format!(
            "Status: {}\n",
            if metrics.has_breaches() { "BREACHED" } else { "ALL CLEAR" }
        ));

        let counts = &metrics.counts;
        let rows = [
            ("Leads without response", counts.leads_without_response),
            ("Incomplete leads", counts.incomplete_leads),
            ("Contracts pending signature", counts.contracts_pending_signature),
            ("Overdue payments", counts.overdue_payments),
            ("Upcoming payments", counts.upcoming_payments),
            ("Pending requirements", counts.pending_requirements),
            ("Documents awaiting review", counts.documents_awaiting_review),
            ("Onboarding incomplete", counts.onboarding_incomplete),
            ("TIE pending pickup", counts.tie_pending_pickup),
        ];
        output.push_str("\nCounts:\n");
        for (label, value) in rows {
            output.push_str(&format!("  {}: {}\n", label, value));
        }

        if metrics.breaches.is_empty() {
            return output;
        }

        output.push_str(&format!(
            "\nBreaches: {} ({} critical)\n",
            metrics.total_breaches, metrics.critical_breaches
        ));
        for breach in &metrics.breaches {
            let marker = match breach.severity {
                Severity::Critical => "!!",
                Severity::Warning => "!",
            };
            output.push_str(&format!(
                "  {:<2} [{}] {}: {} ({}h)\n",
                marker, breach.category, breach.title, breach.description, breach.hours_overdue
            ));
        }

        if metrics.is_truncated() {
            let hidden = metrics.total_breaches - metrics.breaches.len() as u64;
            output.push_str(&format!("  ... and {} more\n", hidden));
        }

        output
    }
}
