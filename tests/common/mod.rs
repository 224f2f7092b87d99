#![allow(dead_code)]

use chrono::NaiveDate;
use folio_settle::application::orchestrator::SettlementOrchestrator;
use folio_settle::application::registry::ProviderRegistry;
use folio_settle::domain::customer::{Customer, CustomerId, LoyaltyTier, LoyaltyTiers};
use folio_settle::domain::folio::{Amount, Folio, FolioId};
use folio_settle::domain::ports::{CustomerStore, FolioStore};
use folio_settle::infrastructure::in_memory::{
    InMemoryCustomerStore, InMemoryFolioStore, InMemoryTransactionRecordStore,
};
use folio_settle::infrastructure::providers::{
    self, GatewaySandbox, VnPayConfig, ZaloPayConfig,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

pub const CUSTOMER: CustomerId = CustomerId(100);

/// An orchestrator wired to in-memory stores and sandbox gateways, plus
/// handles onto the shared state for assertions.
pub struct Harness {
    pub orchestrator: Arc<SettlementOrchestrator>,
    pub folios: InMemoryFolioStore,
    pub customers: InMemoryCustomerStore,
    pub records: InMemoryTransactionRecordStore,
    pub sandboxes: HashMap<String, GatewaySandbox>,
}

impl Harness {
    pub async fn new() -> Self {
        let folios = InMemoryFolioStore::new();
        let customers = InMemoryCustomerStore::new(tiers());
        let records = InMemoryTransactionRecordStore::new();

        let mut customer = Customer::new(CUSTOMER);
        customer.tier = Some(LoyaltyTier::new("Silver", 0));
        customers.store(customer).await.unwrap();

        let built = providers::build(&VnPayConfig::default(), &ZaloPayConfig::default());
        let registry = ProviderRegistry::new(built.providers).unwrap();

        let orchestrator = SettlementOrchestrator::new(
            registry,
            Box::new(folios.clone()),
            Box::new(customers.clone()),
            Box::new(records.clone()),
        );

        Self {
            orchestrator: Arc::new(orchestrator),
            folios,
            customers,
            records,
            sandboxes: built.sandboxes,
        }
    }

    pub async fn add_folio(&self, id: u64, owner: Option<CustomerId>, amount: Decimal) -> FolioId {
        let folio = Folio::new(FolioId(id), owner, Amount::new(amount).unwrap(), opened_on());
        self.folios.store(folio).await.unwrap();
        FolioId(id)
    }

    pub fn sandbox(&self, provider: &str) -> &GatewaySandbox {
        &self.sandboxes[provider]
    }

    /// Simulates the customer paying the folio at the provider's gateway.
    pub async fn pay(&self, folio: FolioId, provider: &str) {
        let id = self
            .orchestrator
            .transaction_id_for(folio, provider)
            .await
            .unwrap();
        self.sandbox(provider).mark_paid(id).await;
    }

    pub async fn customer(&self) -> Customer {
        self.customers.get(CUSTOMER).await.unwrap().unwrap()
    }

    pub async fn folio(&self, id: FolioId) -> Folio {
        self.folios.get(id).await.unwrap().unwrap()
    }
}

pub fn tiers() -> LoyaltyTiers {
    LoyaltyTiers::new(vec![
        LoyaltyTier::new("Silver", 0),
        LoyaltyTier::new("Gold", 500),
        LoyaltyTier::new("Platinum", 2000),
    ])
}

pub fn opened_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}
