use crate::domain::folio::FolioId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-scoped identifier correlating an initiated payment with a folio.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Plain scheme: `{provider}-{folio}`.
    pub fn plain(provider: &str, folio: FolioId) -> Self {
        Self(format!("{}-{}", provider.to_lowercase(), folio))
    }

    /// Dated partner scheme: `{yyMMdd}_{partner}_{folio}`.
    ///
    /// `date` is a coarse bucket supplied by the caller, never read from the clock.
    pub fn dated(partner_code: &str, folio: FolioId, date: NaiveDate) -> Self {
        Self(format!("{}_{}_{}", date.format("%y%m%d"), partner_code, folio))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// In-flight correlation between a provider transaction and a folio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub folio_id: FolioId,
    pub provider: String,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(transaction_id: TransactionId, folio_id: FolioId, provider: &str) -> Self {
        Self {
            transaction_id,
            folio_id,
            provider: provider.to_lowercase(),
            created_at: Utc::now(),
        }
    }
}
