use crate::domain::customer::CustomerId;
use crate::domain::folio::{Amount, Folio, FolioId};
use crate::error::{Result, SettlementError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct FolioRow {
    folio: u64,
    customer: Option<u64>,
    amount: Decimal,
    opened_on: NaiveDate,
}

impl TryFrom<FolioRow> for Folio {
    type Error = SettlementError;

    fn try_from(row: FolioRow) -> Result<Self> {
        Ok(Folio::new(
            FolioId(row.folio),
            row.customer.map(CustomerId),
            Amount::new(row.amount)?,
            row.opened_on,
        ))
    }
}

/// Reads folios from a CSV source with header `folio, customer, amount, opened_on`.
///
/// `customer` may be left empty for guest checkout; `opened_on` is `YYYY-MM-DD`.
pub struct FolioReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> FolioReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: super::reader_builder().from_reader(source),
        }
    }

    /// Lazily deserializes folios; rows with a non-positive amount are errors.
    pub fn folios(self) -> impl Iterator<Item = Result<Folio>> {
        self.reader
            .into_deserialize::<FolioRow>()
            .map(|row| Folio::try_from(row?))
    }
}
