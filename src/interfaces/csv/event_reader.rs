use crate::error::{Result, SettlementError};
use serde::Deserialize;
use std::io::Read;

/// What a row of the event script asks for.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Start a payment for a folio.
    Initiate,
    /// The customer completes payment at the sandbox gateway.
    Pay,
    /// Verify by folio id.
    Verify,
    /// Verify by transaction id.
    VerifyTxn,
    /// Take the provider's gateway down.
    Outage,
    /// Bring the provider's gateway back.
    Restore,
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct Event {
    pub action: Action,
    pub folio: Option<u64>,
    pub provider: String,
    pub transaction: Option<String>,
}

impl Event {
    pub fn folio(&self) -> Result<u64> {
        self.folio.ok_or_else(|| {
            SettlementError::ValidationError(format!("{:?} requires a folio id", self.action))
        })
    }

    pub fn transaction(&self) -> Result<&str> {
        self.transaction.as_deref().ok_or_else(|| {
            SettlementError::ValidationError(format!(
                "{:?} requires a transaction id",
                self.action
            ))
        })
    }
}

/// Reads settlement events from a CSV source with header
/// `action, folio, provider, transaction`.
pub struct EventReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EventReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: super::reader_builder().from_reader(source),
        }
    }

    pub fn events(self) -> impl Iterator<Item = Result<Event>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(SettlementError::from))
    }
}
