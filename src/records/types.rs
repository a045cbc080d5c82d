//! Typed records read by the SLA scanners.
//!
//! The record store may hold loosely shaped rows; scanners only ever see
//! these per-category types.

use crate::core::Timestamp;
use serde::{Deserialize, Serialize};

/// Monitored record category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory {
    Lead,
    Contract,
    Payment,
    AuthorityRequirement,
    ServiceDocument,
}

impl std::fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordCategory::Lead => write!(f, "lead"),
            RecordCategory::Contract => write!(f, "contract"),
            RecordCategory::Payment => write!(f, "payment"),
            RecordCategory::AuthorityRequirement => write!(f, "authority_requirement"),
            RecordCategory::ServiceDocument => write!(f, "service_document"),
        }
    }
}

/// Timestamp columns a query can bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeField {
    CreatedAt,
    UpdatedAt,
    DueDate,
    InternalDeadline,
    UploadedAt,
}

/// Common view over every record type.
pub trait Record: Clone + Send + Sync + 'static {
    /// Status enum of this category.
    type Status: Clone + PartialEq + Send + Sync + std::fmt::Debug;

    /// Category of this record.
    const CATEGORY: RecordCategory;

    /// Stable identifier in the record store.
    fn record_id(&self) -> &str;

    /// Current status.
    fn status(&self) -> &Self::Status;

    /// Value of a timestamp column. `None` if the column is null or does not
    /// exist for this category.
    fn timestamp(&self, field: TimeField) -> Option<Timestamp>;
}

/// Lead pipeline status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    IncompleteData,
    Qualified,
    Converted,
    Lost,
}

/// A prospective client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lead {
    /// Lead ID
    pub id: String,
    /// Display name
    pub full_name: String,
    /// Status
    pub status: LeadStatus,
    /// Creation time
    pub created_at: Timestamp,
    /// Last update time
    pub updated_at: Timestamp,
}

impl Lead {
    /// Create a lead whose `updated_at` equals `created_at`.
    pub fn new(id: &str, full_name: &str, status: LeadStatus, created_at: Timestamp) -> Self {
        Self {
            id: id.to_string(),
            full_name: full_name.to_string(),
            status,
            created_at,
            updated_at: created_at,
        }
    }

    /// Set last update time.
    pub fn with_updated_at(mut self, updated_at: Timestamp) -> Self {
        self.updated_at = updated_at;
        self
    }
}

impl Record for Lead {
    type Status = LeadStatus;
    const CATEGORY: RecordCategory = RecordCategory::Lead;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &LeadStatus {
        &self.status
    }

    fn timestamp(&self, field: TimeField) -> Option<Timestamp> {
        match field {
            TimeField::CreatedAt => Some(self.created_at),
            TimeField::UpdatedAt => Some(self.updated_at),
            _ => None,
        }
    }
}

/// Contract lifecycle status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Sent,
    Signed,
    Cancelled,
}

/// A service contract sent to a client for signature.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contract {
    /// Contract ID
    pub id: String,
    /// Human-readable contract number
    pub contract_number: Option<String>,
    /// Status
    pub status: ContractStatus,
    /// Creation time
    pub created_at: Timestamp,
}

impl Contract {
    /// Create a new contract.
    pub fn new(id: &str, status: ContractStatus, created_at: Timestamp) -> Self {
        Self {
            id: id.to_string(),
            contract_number: None,
            status,
            created_at,
        }
    }

    /// Set contract number.
    pub fn with_number(mut self, number: &str) -> Self {
        self.contract_number = Some(number.to_string());
        self
    }
}

impl Record for Contract {
    type Status = ContractStatus;
    const CATEGORY: RecordCategory = RecordCategory::Contract;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &ContractStatus {
        &self.status
    }

    fn timestamp(&self, field: TimeField) -> Option<Timestamp> {
        match field {
            TimeField::CreatedAt => Some(self.created_at),
            _ => None,
        }
    }
}

/// Payment status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
    Refunded,
}

/// One payment or installment owed by a client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID
    pub id: String,
    /// Status
    pub status: PaymentStatus,
    /// Due date, if scheduled
    pub due_date: Option<Timestamp>,
    /// Amount owed
    pub amount: f64,
    /// ISO currency code
    pub currency: String,
    /// Installment number within a plan
    pub installment_number: Option<u32>,
}

impl Payment {
    /// Create a new payment.
    pub fn new(id: &str, status: PaymentStatus, amount: f64, currency: &str) -> Self {
        Self {
            id: id.to_string(),
            status,
            due_date: None,
            amount,
            currency: currency.to_string(),
            installment_number: None,
        }
    }

    /// Set due date.
    pub fn due(mut self, due_date: Timestamp) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set installment number.
    pub fn installment(mut self, number: u32) -> Self {
        self.installment_number = Some(number);
        self
    }
}

impl Record for Payment {
    type Status = PaymentStatus;
    const CATEGORY: RecordCategory = RecordCategory::Payment;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &PaymentStatus {
        &self.status
    }

    fn timestamp(&self, field: TimeField) -> Option<Timestamp> {
        match field {
            TimeField::DueDate => self.due_date,
            _ => None,
        }
    }
}

/// Status of a requirement issued by an immigration authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Pending,
    InProgress,
    Responded,
    Closed,
}

impl RequirementStatus {
    /// Statuses that still await a response.
    pub fn open() -> Vec<RequirementStatus> {
        vec![RequirementStatus::Pending, RequirementStatus::InProgress]
    }
}

/// A request for information from an authority on an open case.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthorityRequirement {
    /// Requirement ID
    pub id: String,
    /// Status
    pub status: RequirementStatus,
    /// What the authority asked for
    pub description: String,
    /// Creation time
    pub created_at: Timestamp,
    /// Deadline set by the case team, overriding the default window
    pub internal_deadline: Option<Timestamp>,
}

impl AuthorityRequirement {
    /// Create a new requirement.
    pub fn new(
        id: &str,
        status: RequirementStatus,
        description: &str,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: id.to_string(),
            status,
            description: description.to_string(),
            created_at,
            internal_deadline: None,
        }
    }

    /// Set an explicit internal deadline.
    pub fn with_deadline(mut self, deadline: Timestamp) -> Self {
        self.internal_deadline = Some(deadline);
        self
    }
}

impl Record for AuthorityRequirement {
    type Status = RequirementStatus;
    const CATEGORY: RecordCategory = RecordCategory::AuthorityRequirement;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &RequirementStatus {
        &self.status
    }

    fn timestamp(&self, field: TimeField) -> Option<Timestamp> {
        match field {
            TimeField::CreatedAt => Some(self.created_at),
            TimeField::InternalDeadline => self.internal_deadline,
            _ => None,
        }
    }
}

/// Review status of an uploaded case document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Missing,
    Submitted,
    Approved,
    Rejected,
}

/// A document on a case checklist.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceDocument {
    /// Document ID
    pub id: String,
    /// Document name
    pub name: String,
    /// Status
    pub status: DocumentStatus,
    /// Upload time, if uploaded
    pub uploaded_at: Option<Timestamp>,
}

impl ServiceDocument {
    /// Create a new document.
    pub fn new(id: &str, name: &str, status: DocumentStatus) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status,
            uploaded_at: None,
        }
    }

    /// Set upload time.
    pub fn uploaded(mut self, at: Timestamp) -> Self {
        self.uploaded_at = Some(at);
        self
    }
}

impl Record for ServiceDocument {
    type Status = DocumentStatus;
    const CATEGORY: RecordCategory = RecordCategory::ServiceDocument;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &DocumentStatus {
        &self.status
    }

    fn timestamp(&self, field: TimeField) -> Option<Timestamp> {
        match field {
            TimeField::UploadedAt => self.uploaded_at,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_category_display() {
        assert_eq!(RecordCategory::Lead.to_string(), "lead");
        assert_eq!(
            RecordCategory::AuthorityRequirement.to_string(),
            "authority_requirement"
        );
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&LeadStatus::IncompleteData).unwrap();
        assert_eq!(json, "\"incomplete_data\"");

        let status: RequirementStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, RequirementStatus::InProgress);
    }

    #[test]
    fn test_payment_without_due_date() {
        let payment = Payment::new("p-1", PaymentStatus::Pending, 100.0, "EUR");
        assert!(payment.timestamp(TimeField::DueDate).is_none());
        assert!(payment.timestamp(TimeField::CreatedAt).is_none());
    }

    #[test]
    fn test_requirement_timestamps() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let deadline = Utc.with_ymd_and_hms(2024, 5, 3, 8, 0, 0).unwrap();
        let req = AuthorityRequirement::new("r-1", RequirementStatus::Pending, "Proof of funds", created)
            .with_deadline(deadline);

        assert_eq!(req.timestamp(TimeField::CreatedAt), Some(created));
        assert_eq!(req.timestamp(TimeField::InternalDeadline), Some(deadline));
        assert!(RequirementStatus::open().contains(req.status()));
    }
}
