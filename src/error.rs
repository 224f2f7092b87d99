use crate::domain::customer::CustomerId;
use crate::domain::folio::FolioId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("folio not found: {0}")]
    FolioNotFound(FolioId),
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),
    #[error("folio {0} is already paid")]
    AlreadyPaid(FolioId),
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error("provider registered twice: {0}")]
    DuplicateProvider(String),
    #[error("gateway error from {provider}: {reason}")]
    Gateway { provider: String, reason: String },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for SettlementError {
    fn from(e: rocksdb::Error) -> Self {
        Self::InternalError(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, SettlementError>;
