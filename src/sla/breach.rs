//! Breach items emitted by the scanners.

use crate::records::Record;
use serde::{Deserialize, Serialize};

/// Breach severity. `Critical` orders above `Warning`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Needs attention soon
    Warning,
    /// Needs attention now
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Business category of a breach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachCategory {
    Lead,
    Contract,
    Payment,
    Requirement,
    Document,
    Onboarding,
    Tie,
}

impl std::fmt::Display for BreachCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreachCategory::Lead => write!(f, "lead"),
            BreachCategory::Contract => write!(f, "contract"),
            BreachCategory::Payment => write!(f, "payment"),
            BreachCategory::Requirement => write!(f, "requirement"),
            BreachCategory::Document => write!(f, "document"),
            BreachCategory::Onboarding => write!(f, "onboarding"),
            BreachCategory::Tie => write!(f, "tie"),
        }
    }
}

/// One overdue business fact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachItem {
    /// `<category>-<record id>`, unique within a snapshot
    pub id: String,
    /// Category
    pub category: BreachCategory,
    /// Short title
    pub title: String,
    /// One-line description
    pub description: String,
    /// Severity
    pub severity: Severity,
    /// Hours past the deadline, never negative
    pub hours_overdue: u64,
    /// Originating record, for deep links
    pub related_id: Option<String>,
}

impl BreachItem {
    /// Create a breach for a source record. The id is derived from the
    /// category and record id.
    pub fn new(category: BreachCategory, record_id: &str, severity: Severity) -> Self {
        Self {
            id: Self::derive_id(category, record_id),
            category,
            title: String::new(),
            description: String::new(),
            severity,
            hours_overdue: 0,
            related_id: Some(record_id.to_string()),
        }
    }

    /// Create a breach for a typed record.
    pub fn for_record<R: Record>(category: BreachCategory, record: &R, severity: Severity) -> Self {
        Self::new(category, record.record_id(), severity)
    }

    /// Stable breach id for a record.
    pub fn derive_id(category: BreachCategory, record_id: &str) -> String {
        format!("{}-{}", category, record_id)
    }

    /// Set title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set hours overdue.
    pub fn with_hours_overdue(mut self, hours: u64) -> Self {
        self.hours_overdue = hours;
        self
    }

    /// Set overdue amount in whole days.
    pub fn with_days_overdue(mut self, days: u64) -> Self {
        self.hours_overdue = days.saturating_mul(24);
        self
    }

    /// Whole days overdue.
    pub fn days_overdue(&self) -> u64 {
        self.hours_overdue / 24
    }

    /// Check if critical.
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// Convert a signed elapsed count to a non-negative overdue amount.
pub(crate) fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
    }

    #[test]
    fn test_breach_id_derivation() {
        let item = BreachItem::new(BreachCategory::Payment, "p-42", Severity::Warning);
        assert_eq!(item.id, "payment-p-42");
        assert_eq!(item.related_id.as_deref(), Some("p-42"));

        let other = BreachItem::new(BreachCategory::Contract, "p-42", Severity::Warning);
        assert_ne!(item.id, other.id);
    }

    #[test]
    fn test_for_record_uses_record_id() {
        let lead = crate::records::Lead::new(
            "l-7",
            "Ana",
            crate::records::LeadStatus::New,
            chrono::Utc::now(),
        );
        let item = BreachItem::for_record(BreachCategory::Lead, &lead, Severity::Warning);
        assert_eq!(item.id, "lead-l-7");
        assert_eq!(item.related_id.as_deref(), Some("l-7"));
    }

    #[test]
    fn test_days_overdue() {
        let item = BreachItem::new(BreachCategory::Payment, "p-1", Severity::Critical)
            .with_days_overdue(8);
        assert_eq!(item.hours_overdue, 192);
        assert_eq!(item.days_overdue(), 8);
        assert!(item.is_critical());
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(-5), 0);
        assert_eq!(non_negative(0), 0);
        assert_eq!(non_negative(7), 7);
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&BreachCategory::Requirement).unwrap();
        assert_eq!(json, "\"requirement\"");
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
