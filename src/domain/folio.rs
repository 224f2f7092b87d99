use crate::domain::customer::CustomerId;
use crate::error::SettlementError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a billing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolioId(pub u64);

impl fmt::Display for FolioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents the positive amount owed on a folio.
///
/// Amounts are expressed in the major currency unit, e.g. `60000` VND.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, SettlementError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(SettlementError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Loyalty points earned by settling this amount: one point per 100 units.
    pub fn loyalty_points(&self) -> u64 {
        (self.0 / Decimal::ONE_HUNDRED)
            .floor()
            .to_u64()
            .unwrap_or(u64::MAX)
    }

    /// The amount in minor units (x100), as gateways expect it.
    pub fn minor_units(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).round()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = SettlementError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum FolioStatus {
    #[default]
    Pending,
    Paid,
}

impl fmt::Display for FolioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolioStatus::Pending => f.write_str("PENDING"),
            FolioStatus::Paid => f.write_str("PAID"),
        }
    }
}

/// A billing record for one stay.
///
/// The status only ever moves from `Pending` to `Paid`, through [`Folio::mark_paid`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Folio {
    pub id: FolioId,
    /// Owning customer, `None` for guest checkout.
    pub owner: Option<CustomerId>,
    pub amount: Amount,
    status: FolioStatus,
    pub updated_at: DateTime<Utc>,
    /// The date the folio was opened, used as the date bucket of dated transaction ids.
    pub opened_on: NaiveDate,
}

impl Folio {
    pub fn new(
        id: FolioId,
        owner: Option<CustomerId>,
        amount: Amount,
        opened_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            owner,
            amount,
            status: FolioStatus::Pending,
            updated_at: Utc::now(),
            opened_on,
        }
    }

    pub fn status(&self) -> FolioStatus {
        self.status
    }

    pub fn is_paid(&self) -> bool {
        self.status == FolioStatus::Paid
    }

    /// Transitions the folio to `Paid`. Fails if it is already paid.
    pub fn mark_paid(&mut self, at: DateTime<Utc>) -> Result<(), SettlementError> {
        match self.status {
            FolioStatus::Pending => {
                self.status = FolioStatus::Paid;
                self.updated_at = at;
                Ok(())
            }
            FolioStatus::Paid => Err(SettlementError::AlreadyPaid(self.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn folio() -> Folio {
        Folio::new(
            FolioId(1),
            None,
            Amount::new(dec!(60000)).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(SettlementError::ValidationError(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(SettlementError::ValidationError(_))
        ));
    }

    #[test]
    fn test_loyalty_points_round_down() {
        assert_eq!(Amount::new(dec!(60000)).unwrap().loyalty_points(), 600);
        assert_eq!(Amount::new(dec!(199.99)).unwrap().loyalty_points(), 1);
        assert_eq!(Amount::new(dec!(99)).unwrap().loyalty_points(), 0);
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Amount::new(dec!(12.34)).unwrap().minor_units(), dec!(1234));
        assert_eq!(Amount::new(dec!(60000)).unwrap().minor_units(), dec!(6000000));
    }

    #[test]
    fn test_mark_paid_once() {
        let mut folio = folio();
        assert_eq!(folio.status(), FolioStatus::Pending);
        let at = Utc::now();
        folio.mark_paid(at).unwrap();
        assert_eq!(folio.status(), FolioStatus::Paid);
        assert!(folio.is_paid());
        assert_eq!(folio.updated_at, at);

        assert!(matches!(
            folio.mark_paid(Utc::now()),
            Err(SettlementError::AlreadyPaid(FolioId(1)))
        ));
        assert_eq!(folio.updated_at, at);
    }

    #[test]
    fn test_folio_json_roundtrip_keeps_status() {
        let mut folio = folio();
        folio.mark_paid(Utc::now()).unwrap();
        let json = serde_json::to_string(&folio).unwrap();
        assert!(json.contains("\"PAID\""));
        let back: Folio = serde_json::from_str(&json).unwrap();
        assert_eq!(back, folio);
    }
}
