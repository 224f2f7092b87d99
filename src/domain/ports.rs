use super::customer::{Customer, CustomerId, LoyaltyTier};
use super::folio::{Folio, FolioId};
use super::transaction::{TransactionId, TransactionRecord};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait FolioStore: Send + Sync {
    async fn store(&self, folio: Folio) -> Result<()>;
    async fn get(&self, folio_id: FolioId) -> Result<Option<Folio>>;
    async fn get_all(&self) -> Result<Vec<Folio>>;
    /// Writes a folio that was just marked paid, only if the stored copy is
    /// still pending. Returns `false` when another writer settled it first.
    async fn settle(&self, folio: Folio) -> Result<bool>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn store(&self, customer: Customer) -> Result<()>;
    async fn get(&self, customer_id: CustomerId) -> Result<Option<Customer>>;
    async fn get_all(&self) -> Result<Vec<Customer>>;
    async fn highest_tier_at_or_below(&self, points: u64) -> Result<Option<LoyaltyTier>>;
}

#[async_trait]
pub trait TransactionRecordStore: Send + Sync {
    /// Inserts a record, replacing any record with the same transaction id.
    async fn insert(&self, record: TransactionRecord) -> Result<()>;
    async fn get(&self, transaction_id: &TransactionId) -> Result<Option<TransactionRecord>>;
    async fn remove(&self, transaction_id: &TransactionId) -> Result<Option<TransactionRecord>>;
    /// Drops every record of the folio, whichever provider it was initiated through.
    async fn remove_for_folio(&self, folio_id: FolioId) -> Result<Vec<TransactionRecord>>;
}

pub type FolioStoreBox = Box<dyn FolioStore>;
pub type CustomerStoreBox = Box<dyn CustomerStore>;
pub type TransactionRecordStoreBox = Box<dyn TransactionRecordStore>;
