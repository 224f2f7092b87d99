use crate::domain::customer::{Customer, CustomerId, LoyaltyTier, LoyaltyTiers};
use crate::domain::folio::{Folio, FolioId, FolioStatus};
use crate::domain::ports::{CustomerStore, FolioStore};
use crate::error::{Result, SettlementError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing folios.
pub const CF_FOLIOS: &str = "folios";
/// Column Family for storing customers.
pub const CF_CUSTOMERS: &str = "customers";

/// A persistent billing store implementation using RocksDB.
///
/// Handles storage for both `Folio` and `Customer` entities using separate
/// Column Families. The loyalty tier table is configuration and lives in memory.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    tiers: Arc<LoyaltyTiers>,
    settle_guard: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("folios" and "customers") exist.
    pub fn open<P: AsRef<Path>>(path: P, tiers: LoyaltyTiers) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_folios = ColumnFamilyDescriptor::new(CF_FOLIOS, Options::default());
        let cf_customers = ColumnFamilyDescriptor::new(CF_CUSTOMERS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_folios, cf_customers])?;

        Ok(Self {
            db: Arc::new(db),
            tiers: Arc::new(tiers),
            settle_guard: Arc::new(Mutex::new(())),
        })
    }

    fn put<V: Serialize>(&self, cf_name: &str, key: [u8; 8], value: &V) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value).map_err(|e| {
            SettlementError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;
        self.db.put_cf(&cf, key, bytes)?;
        Ok(())
    }

    fn fetch<V: DeserializeOwned>(&self, cf_name: &str, key: [u8; 8]) -> Result<Option<V>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(&cf, key)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    SettlementError::InternalError(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Deserialization error: {}", e),
                    )))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn scan<V: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<V>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let decoded = serde_json::from_slice(&value).map_err(|e| {
                SettlementError::InternalError(Box::new(std::io::Error::other(format!(
                    "Failed to deserialize {cf_name} entry: {}",
                    e
                ))))
            })?;
            values.push(decoded);
        }
        Ok(values)
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            SettlementError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }
}

#[async_trait]
impl FolioStore for RocksDBStore {
    async fn store(&self, folio: Folio) -> Result<()> {
        self.put(CF_FOLIOS, folio.id.0.to_be_bytes(), &folio)
    }

    async fn get(&self, folio_id: FolioId) -> Result<Option<Folio>> {
        self.fetch(CF_FOLIOS, folio_id.0.to_be_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Folio>> {
        self.scan(CF_FOLIOS)
    }

    async fn settle(&self, folio: Folio) -> Result<bool> {
        let _guard = self.settle_guard.lock().await;
        let key = folio.id.0.to_be_bytes();
        match self.fetch::<Folio>(CF_FOLIOS, key)? {
            Some(current) if current.status() == FolioStatus::Pending => {
                self.put(CF_FOLIOS, key, &folio)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl CustomerStore for RocksDBStore {
    async fn store(&self, customer: Customer) -> Result<()> {
        self.put(CF_CUSTOMERS, customer.id.0.to_be_bytes(), &customer)
    }

    async fn get(&self, customer_id: CustomerId) -> Result<Option<Customer>> {
        self.fetch(CF_CUSTOMERS, customer_id.0.to_be_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Customer>> {
        self.scan(CF_CUSTOMERS)
    }

    async fn highest_tier_at_or_below(&self, points: u64) -> Result<Option<LoyaltyTier>> {
        Ok(self.tiers.highest_at_or_below(points).cloned())
    }
}
