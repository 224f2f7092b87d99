use crate::domain::customer::{Customer, CustomerId, LoyaltyTier, LoyaltyTiers};
use crate::domain::folio::{Folio, FolioId, FolioStatus};
use crate::domain::ports::{CustomerStore, FolioStore, TransactionRecordStore};
use crate::domain::transaction::{TransactionId, TransactionRecord};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for folios.
///
/// Uses `Arc<RwLock<HashMap<FolioId, Folio>>>` to allow shared concurrent access.
/// `settle` checks and writes under a single write guard, which gives it
/// compare-and-set semantics.
#[derive(Default, Clone)]
pub struct InMemoryFolioStore {
    folios: Arc<RwLock<HashMap<FolioId, Folio>>>,
}

impl InMemoryFolioStore {
    /// Creates a new, empty in-memory folio store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FolioStore for InMemoryFolioStore {
    async fn store(&self, folio: Folio) -> Result<()> {
        let mut folios = self.folios.write().await;
        folios.insert(folio.id, folio);
        Ok(())
    }

    async fn get(&self, folio_id: FolioId) -> Result<Option<Folio>> {
        let folios = self.folios.read().await;
        Ok(folios.get(&folio_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Folio>> {
        let folios = self.folios.read().await;
        let mut all: Vec<Folio> = folios.values().cloned().collect();
        all.sort_by_key(|f| f.id);
        Ok(all)
    }

    async fn settle(&self, folio: Folio) -> Result<bool> {
        let mut folios = self.folios.write().await;
        match folios.get(&folio.id) {
            Some(current) if current.status() == FolioStatus::Pending => {
                folios.insert(folio.id, folio);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// A thread-safe in-memory store for customers and the loyalty tier table.
#[derive(Default, Clone)]
pub struct InMemoryCustomerStore {
    customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
    tiers: Arc<LoyaltyTiers>,
}

impl InMemoryCustomerStore {
    /// Creates a new, empty customer store with the given tier table.
    pub fn new(tiers: LoyaltyTiers) -> Self {
        Self {
            customers: Arc::default(),
            tiers: Arc::new(tiers),
        }
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn store(&self, customer: Customer) -> Result<()> {
        let mut customers = self.customers.write().await;
        customers.insert(customer.id, customer);
        Ok(())
    }

    async fn get(&self, customer_id: CustomerId) -> Result<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.get(&customer_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Customer>> {
        let customers = self.customers.read().await;
        let mut all: Vec<Customer> = customers.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }

    async fn highest_tier_at_or_below(&self, points: u64) -> Result<Option<LoyaltyTier>> {
        Ok(self.tiers.highest_at_or_below(points).cloned())
    }
}

/// Process-local index of in-flight transactions.
///
/// Lost on restart; settlement by folio id still works because transaction ids
/// are re-derived rather than looked up.
#[derive(Default, Clone)]
pub struct InMemoryTransactionRecordStore {
    records: Arc<RwLock<HashMap<TransactionId, TransactionRecord>>>,
}

impl InMemoryTransactionRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TransactionRecordStore for InMemoryTransactionRecordStore {
    async fn insert(&self, record: TransactionRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.transaction_id.clone(), record);
        Ok(())
    }

    async fn get(&self, transaction_id: &TransactionId) -> Result<Option<TransactionRecord>> {
        let records = self.records.read().await;
        Ok(records.get(transaction_id).cloned())
    }

    async fn remove(&self, transaction_id: &TransactionId) -> Result<Option<TransactionRecord>> {
        let mut records = self.records.write().await;
        Ok(records.remove(transaction_id))
    }

    async fn remove_for_folio(&self, folio_id: FolioId) -> Result<Vec<TransactionRecord>> {
        let mut records = self.records.write().await;
        let ids: Vec<TransactionId> = records
            .values()
            .filter(|r| r.folio_id == folio_id)
            .map(|r| r.transaction_id.clone())
            .collect();
        Ok(ids.iter().filter_map(|id| records.remove(id)).collect())
    }
}
