//! Records Module
//!
//! Read-only view of the case-management record store:
//! - Typed per-category records
//! - Filtered queries
//! - Store trait and in-memory store

pub mod query;
pub mod store;
pub mod types;

pub use query::RecordQuery;
pub use store::{InMemoryRecordStore, RecordSet, RecordStore};
pub use types::{
    AuthorityRequirement, Contract, ContractStatus, DocumentStatus, Lead, LeadStatus, Payment,
    PaymentStatus, Record, RecordCategory, RequirementStatus, ServiceDocument, TimeField,
};
