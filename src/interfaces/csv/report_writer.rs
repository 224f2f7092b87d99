use crate::domain::customer::Customer;
use crate::domain::folio::Folio;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct FolioLine {
    folio: u64,
    customer: Option<u64>,
    amount: String,
    status: String,
}

#[derive(Serialize)]
struct CustomerLine<'a> {
    customer: u64,
    points: u64,
    tier: Option<&'a str>,
}

/// Writes the end-of-run folio and customer reports as two CSV tables.
pub struct ReportWriter<W: Write> {
    sink: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_folios(&mut self, folios: &[Folio]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut self.sink);
        writer.write_record(["folio", "customer", "amount", "status"])?;
        for folio in folios {
            writer.serialize(FolioLine {
                folio: folio.id.0,
                customer: folio.owner.map(|c| c.0),
                amount: folio.amount.to_string(),
                status: folio.status().to_string(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_customers(&mut self, customers: &[Customer]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut self.sink);
        writer.write_record(["customer", "points", "tier"])?;
        for customer in customers {
            writer.serialize(CustomerLine {
                customer: customer.id.0,
                points: customer.points,
                tier: customer.tier.as_ref().map(|t| t.name.as_str()),
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::{CustomerId, LoyaltyTier};
    use crate::domain::folio::{Amount, FolioId};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_write_reports() {
        let mut paid = Folio::new(
            FolioId(1),
            Some(CustomerId(7)),
            Amount::new(dec!(60000.00)).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        );
        paid.mark_paid(Utc::now()).unwrap();
        let guest = Folio::new(
            FolioId(2),
            None,
            Amount::new(dec!(12.5)).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        );
        let mut customer = Customer::new(CustomerId(7));
        customer.points = 600;
        customer.tier = Some(LoyaltyTier::new("Gold", 500));

        let mut out = Vec::new();
        let mut writer = ReportWriter::new(&mut out);
        writer.write_folios(&[paid, guest]).unwrap();
        writer.write_customers(&[customer, Customer::new(CustomerId(8))]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "folio,customer,amount,status\n1,7,60000,PAID\n2,,12.5,PENDING\n\
             customer,points,tier\n7,600,Gold\n8,0,\n"
        );
    }
}
