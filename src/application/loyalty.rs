use crate::domain::customer::{Customer, CustomerId};
use crate::domain::folio::Amount;
use crate::domain::ports::CustomerStoreBox;
use crate::error::{Result, SettlementError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Credits loyalty points for settled folios and promotes customers.
pub struct LoyaltyAccrual {
    customers: CustomerStoreBox,
    // One lock per customer; accruals for different customers run in parallel.
    locks: Mutex<HashMap<CustomerId, Arc<Mutex<()>>>>,
}

impl LoyaltyAccrual {
    pub fn new(customers: CustomerStoreBox) -> Self {
        Self {
            customers,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, customer_id: CustomerId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(customer_id).or_default().clone()
    }

    /// Adds `amount / 100` points to the customer and moves them up to the
    /// highest tier their new total reaches. Returns the updated customer.
    pub async fn accrue(&self, customer_id: CustomerId, amount: Amount) -> Result<Customer> {
        let lock = self.lock_for(customer_id).await;
        let _guard = lock.lock().await;

        let mut customer = self
            .customers
            .get(customer_id)
            .await?
            .ok_or(SettlementError::CustomerNotFound(customer_id))?;

        let points = amount.loyalty_points();
        let total = customer.points.saturating_add(points);
        let candidate = self.customers.highest_tier_at_or_below(total).await?;

        if customer.accrue(points, candidate) {
            info!(
                customer = %customer_id,
                points = customer.points,
                tier = customer.tier.as_ref().map(|t| t.name.as_str()).unwrap_or_default(),
                "Customer promoted"
            );
        }

        self.customers.store(customer.clone()).await?;
        Ok(customer)
    }
}
