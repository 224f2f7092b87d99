//! Adapters behind the domain ports: billing stores, the transaction index
//! and the gateway integrations.

pub mod in_memory;
pub mod providers;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
