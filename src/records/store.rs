//! RecordStore trait and the in-memory store.

use crate::core::{Error, Result};
use crate::records::query::RecordQuery;
use crate::records::types::{
    AuthorityRequirement, Contract, ContractStatus, DocumentStatus, Lead, LeadStatus, Payment,
    PaymentStatus, Record, RecordCategory, RequirementStatus, ServiceDocument,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Read access to the case-management records.
///
/// One typed read per category. Implementations map their own row shape to
/// the typed records and report failures as [`Error::RecordQuery`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Leads matching a query.
    async fn leads(&self, query: &RecordQuery<LeadStatus>) -> Result<Vec<Lead>>;

    /// Contracts matching a query.
    async fn contracts(&self, query: &RecordQuery<ContractStatus>) -> Result<Vec<Contract>>;

    /// Payments matching a query.
    async fn payments(&self, query: &RecordQuery<PaymentStatus>) -> Result<Vec<Payment>>;

    /// Authority requirements matching a query.
    async fn requirements(
        &self,
        query: &RecordQuery<RequirementStatus>,
    ) -> Result<Vec<AuthorityRequirement>>;

    /// Service documents matching a query.
    async fn documents(&self, query: &RecordQuery<DocumentStatus>)
        -> Result<Vec<ServiceDocument>>;

    /// Count-only lead read.
    async fn count_leads(&self, query: &RecordQuery<LeadStatus>) -> Result<u64> {
        Ok(self.leads(query).await?.len() as u64)
    }

    /// Count-only document read.
    async fn count_documents(&self, query: &RecordQuery<DocumentStatus>) -> Result<u64> {
        Ok(self.documents(query).await?.len() as u64)
    }
}

/// Serializable contents of an in-memory store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSet {
    pub leads: Vec<Lead>,
    pub contracts: Vec<Contract>,
    pub payments: Vec<Payment>,
    pub requirements: Vec<AuthorityRequirement>,
    pub documents: Vec<ServiceDocument>,
}

impl RecordSet {
    /// Parse a record set from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Record store held in memory.
///
/// Results come back in insertion order.
pub struct InMemoryRecordStore {
    records: RwLock<RecordSet>,
    /// Categories whose reads fail
    unavailable: RwLock<HashSet<RecordCategory>>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::from_records(RecordSet::default())
    }

    /// Create a store over an existing record set.
    pub fn from_records(records: RecordSet) -> Self {
        Self {
            records: RwLock::new(records),
            unavailable: RwLock::new(HashSet::new()),
        }
    }

    /// Create a store from a JSON record set.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_records(RecordSet::from_json(json)?))
    }

    /// Insert a lead.
    pub async fn insert_lead(&self, lead: Lead) {
        self.records.write().await.leads.push(lead);
    }

    /// Insert a contract.
    pub async fn insert_contract(&self, contract: Contract) {
        self.records.write().await.contracts.push(contract);
    }

    /// Insert a payment.
    pub async fn insert_payment(&self, payment: Payment) {
        self.records.write().await.payments.push(payment);
    }

    /// Insert an authority requirement.
    pub async fn insert_requirement(&self, requirement: AuthorityRequirement) {
        self.records.write().await.requirements.push(requirement);
    }

    /// Insert a service document.
    pub async fn insert_document(&self, document: ServiceDocument) {
        self.records.write().await.documents.push(document);
    }

    /// Make every read of `category` fail until restored.
    pub async fn set_unavailable(&self, category: RecordCategory, unavailable: bool) {
        let mut set = self.unavailable.write().await;
        if unavailable {
            set.insert(category);
        } else {
            set.remove(&category);
        }
    }

    async fn check_available<R: Record>(&self) -> Result<()> {
        if self.unavailable.read().await.contains(&R::CATEGORY) {
            return Err(Error::record_query(R::CATEGORY, "store unavailable"));
        }
        Ok(())
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn leads(&self, query: &RecordQuery<LeadStatus>) -> Result<Vec<Lead>> {
        self.check_available::<Lead>().await?;
        Ok(query.apply(&self.records.read().await.leads))
    }

    async fn contracts(&self, query: &RecordQuery<ContractStatus>) -> Result<Vec<Contract>> {
        self.check_available::<Contract>().await?;
        Ok(query.apply(&self.records.read().await.contracts))
    }

    async fn payments(&self, query: &RecordQuery<PaymentStatus>) -> Result<Vec<Payment>> {
        self.check_available::<Payment>().await?;
        Ok(query.apply(&self.records.read().await.payments))
    }

    async fn requirements(
        &self,
        query: &RecordQuery<RequirementStatus>,
    ) -> Result<Vec<AuthorityRequirement>> {
        self.check_available::<AuthorityRequirement>().await?;
        Ok(query.apply(&self.records.read().await.requirements))
    }

    async fn documents(
        &self,
        query: &RecordQuery<DocumentStatus>,
    ) -> Result<Vec<ServiceDocument>> {
        self.check_available::<ServiceDocument>().await?;
        Ok(query.apply(&self.records.read().await.documents))
    }

    async fn count_leads(&self, query: &RecordQuery<LeadStatus>) -> Result<u64> {
        self.check_available::<Lead>().await?;
        let records = self.records.read().await;
        Ok(records.leads.iter().filter(|l| query.matches(*l)).count() as u64)
    }

    async fn count_documents(&self, query: &RecordQuery<DocumentStatus>) -> Result<u64> {
        self.check_available::<ServiceDocument>().await?;
        let records = self.records.read().await;
        Ok(records.documents.iter().filter(|d| query.matches(*d)).count() as u64)
    }
}
