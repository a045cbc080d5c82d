//! Named SLA thresholds.
//!
//! Time windows and severity cut-offs share one representation so that
//! every value can be overridden from the configuration store the same way.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unit a threshold is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdUnit {
    Hours,
    Days,
}

/// Every named SLA parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKey {
    /// New leads must be contacted within this many hours
    FirstResponseHours,
    /// Incomplete leads must be re-engaged within this many days
    ReengagementDays,
    /// Sent contracts must be signed within this many days
    SignatureReminderDays,
    /// Pre-due payment reminder window
    PaymentReminderDays,
    /// Authority requirements must be answered within this many hours
    RequirementResponseHours,
    /// Submitted documents must be reviewed within this many hours
    DocumentReviewHours,
    /// Lead breach turns critical above this many hours overdue
    LeadCriticalHours,
    /// Contract breach turns critical above this many days overdue
    ContractCriticalDays,
    /// Payment breach turns critical at this many days overdue
    PaymentCriticalDays,
    /// Requirements due within this many hours raise a warning
    RequirementLookaheadHours,
}

impl ThresholdKey {
    /// All keys, in resolution order.
    pub const ALL: [ThresholdKey; 10] = [
        ThresholdKey::FirstResponseHours,
        ThresholdKey::ReengagementDays,
        ThresholdKey::SignatureReminderDays,
        ThresholdKey::PaymentReminderDays,
        ThresholdKey::RequirementResponseHours,
        ThresholdKey::DocumentReviewHours,
        ThresholdKey::LeadCriticalHours,
        ThresholdKey::ContractCriticalDays,
        ThresholdKey::PaymentCriticalDays,
        ThresholdKey::RequirementLookaheadHours,
    ];

    /// Name of this parameter in the configuration store.
    pub fn config_key(self) -> &'static str {
        match self {
            ThresholdKey::FirstResponseHours => "sla_first_response_hours",
            ThresholdKey::ReengagementDays => "sla_incomplete_lead_days",
            ThresholdKey::SignatureReminderDays => "sla_contract_reminder_days",
            ThresholdKey::PaymentReminderDays => "sla_payment_reminder_days",
            ThresholdKey::RequirementResponseHours => "sla_requirement_response_hours",
            ThresholdKey::DocumentReviewHours => "sla_document_review_hours",
            ThresholdKey::LeadCriticalHours => "sla_lead_critical_hours",
            ThresholdKey::ContractCriticalDays => "sla_contract_critical_days",
            ThresholdKey::PaymentCriticalDays => "sla_payment_critical_days",
            ThresholdKey::RequirementLookaheadHours => "sla_requirement_lookahead_hours",
        }
    }

    /// Built-in value used when the store has no usable override.
    pub fn default_value(self) -> u32 {
        match self {
            ThresholdKey::FirstResponseHours => 2,
            ThresholdKey::ReengagementDays => 1,
            ThresholdKey::SignatureReminderDays => 2,
            ThresholdKey::PaymentReminderDays => 1,
            ThresholdKey::RequirementResponseHours => 48,
            ThresholdKey::DocumentReviewHours => 24,
            ThresholdKey::LeadCriticalHours => 4,
            ThresholdKey::ContractCriticalDays => 3,
            ThresholdKey::PaymentCriticalDays => 7,
            ThresholdKey::RequirementLookaheadHours => 24,
        }
    }

    /// Unit of this parameter.
    pub fn unit(self) -> ThresholdUnit {
        match self {
            ThresholdKey::ReengagementDays
            | ThresholdKey::SignatureReminderDays
            | ThresholdKey::PaymentReminderDays
            | ThresholdKey::ContractCriticalDays
            | ThresholdKey::PaymentCriticalDays => ThresholdUnit::Days,
            _ => ThresholdUnit::Hours,
        }
    }

    /// Look up a key by its configuration-store name.
    pub fn from_config_key(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.config_key() == name)
    }
}

/// Fully resolved thresholds for one tick. Every key always has a value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SLAThresholds {
    values: BTreeMap<ThresholdKey, u32>,
}

impl SLAThresholds {
    /// Thresholds with every key at its built-in default.
    pub fn defaults() -> Self {
        Self {
            values: ThresholdKey::ALL
                .into_iter()
                .map(|k| (k, k.default_value()))
                .collect(),
        }
    }

    /// Value for a key.
    pub fn get(&self, key: ThresholdKey) -> u32 {
        self.values
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_value())
    }

    /// Override one key. Zero is ignored.
    pub fn with(mut self, key: ThresholdKey, value: u32) -> Self {
        if value > 0 {
            self.values.insert(key, value);
        }
        self
    }

    /// Value as a signed count, for time arithmetic.
    pub fn get_i64(&self, key: ThresholdKey) -> i64 {
        i64::from(self.get(key))
    }

    /// Value as a `chrono::Duration` in the key's unit.
    pub fn duration(&self, key: ThresholdKey) -> chrono::Duration {
        match key.unit() {
            ThresholdUnit::Hours => chrono::Duration::hours(self.get_i64(key)),
            ThresholdUnit::Days => chrono::Duration::days(self.get_i64(key)),
        }
    }

    /// Whether any value differs from its default.
    pub fn is_default(&self) -> bool {
        ThresholdKey::ALL
            .into_iter()
            .all(|k| self.get(k) == k.default_value())
    }
}

impl Default for SLAThresholds {
    fn default() -> Self {
        Self::defaults()
    }
}
