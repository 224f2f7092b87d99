use crate::application::loyalty::LoyaltyAccrual;
use crate::application::registry::ProviderRegistry;
use crate::domain::folio::{Folio, FolioId};
use crate::domain::ports::{CustomerStoreBox, FolioStoreBox, TransactionRecordStoreBox};
use crate::domain::provider::{PaymentTarget, ProviderRef, VerificationOutcome};
use crate::domain::transaction::{TransactionId, TransactionRecord};
use crate::error::{Result, SettlementError};
use chrono::Utc;
use std::collections::BTreeSet;
use tracing::{debug, error, info, instrument, warn};

/// Result of a verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// This call moved the folio to `Paid`.
    Settled,
    /// The folio was already paid, by an earlier call or a concurrent one.
    AlreadySettled,
    /// The gateway has not confirmed the payment yet.
    Pending,
    /// The gateway could not be reached; the folio was left untouched.
    GatewayUnavailable(String),
    /// No in-flight record exists for the transaction id.
    UnknownTransaction,
}

impl SettlementOutcome {
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SettlementOutcome::Settled | SettlementOutcome::AlreadySettled
        )
    }
}

/// Initiates payments through the registered providers and settles folios
/// exactly once.
///
/// All methods take `&self`; share the orchestrator across tasks with an `Arc`.
pub struct SettlementOrchestrator {
    registry: ProviderRegistry,
    folios: FolioStoreBox,
    records: TransactionRecordStoreBox,
    loyalty: LoyaltyAccrual,
}

impl SettlementOrchestrator {
    pub fn new(
        registry: ProviderRegistry,
        folios: FolioStoreBox,
        customers: CustomerStoreBox,
        records: TransactionRecordStoreBox,
    ) -> Self {
        Self {
            registry,
            folios,
            records,
            loyalty: LoyaltyAccrual::new(customers),
        }
    }

    pub fn list_providers(&self) -> BTreeSet<String> {
        self.registry.list_providers()
    }

    /// Asks the provider for a payment target and records the in-flight transaction.
    #[instrument(skip(self), fields(folio = %folio_id))]
    pub async fn initiate_payment(&self, folio_id: FolioId, provider: &str) -> Result<PaymentTarget> {
        let folio = self.load(folio_id).await?;
        if folio.is_paid() {
            return Err(SettlementError::AlreadyPaid(folio_id));
        }

        let provider = self.registry.resolve(provider)?;
        let transaction_id = provider.transaction_id(&folio);
        let target = provider
            .create_payment(&folio, &transaction_id)
            .await
            .map_err(|e| SettlementError::Gateway {
                provider: provider.name().to_string(),
                reason: e.to_string(),
            })?;

        self.records
            .insert(TransactionRecord::new(
                transaction_id.clone(),
                folio_id,
                provider.name(),
            ))
            .await?;

        info!(transaction = %transaction_id, provider = provider.name(), "Payment initiated");
        Ok(target)
    }

    /// Verifies the folio's payment with the provider and settles it on confirmation.
    ///
    /// Safe to call any number of times: a paid folio short-circuits without
    /// contacting the provider, and only one concurrent caller can win the
    /// `Pending` to `Paid` transition.
    #[instrument(skip(self), fields(folio = %folio_id))]
    pub async fn verify_and_update_payment(
        &self,
        folio_id: FolioId,
        provider: &str,
    ) -> Result<SettlementOutcome> {
        let folio = self.load(folio_id).await?;
        if folio.is_paid() {
            return self.already_settled(folio_id).await;
        }

        let provider = self.registry.resolve(provider)?;
        let transaction_id = provider.transaction_id(&folio);
        self.verify_and_settle(folio, &provider, &transaction_id).await
    }

    /// Settles the folio recorded for `transaction_id`, if any.
    ///
    /// `provider` must be the provider the transaction was initiated through.
    #[instrument(skip(self), fields(transaction = %transaction_id))]
    pub async fn verify_and_update_payment_by_transaction(
        &self,
        transaction_id: &TransactionId,
        provider: &str,
    ) -> Result<SettlementOutcome> {
        let Some(record) = self.records.get(transaction_id).await? else {
            debug!("No in-flight record for transaction");
            return Ok(SettlementOutcome::UnknownTransaction);
        };
        if record.provider != provider.to_lowercase() {
            return Err(SettlementError::ValidationError(format!(
                "transaction {} was initiated through {}, not {}",
                transaction_id, record.provider, provider
            )));
        }

        let folio = self.load(record.folio_id).await?;
        if folio.is_paid() {
            return self.already_settled(record.folio_id).await;
        }

        let provider = self.registry.resolve(provider)?;
        self.verify_and_settle(folio, &provider, &record.transaction_id)
            .await
    }

    async fn verify_and_settle(
        &self,
        mut folio: Folio,
        provider: &ProviderRef,
        transaction_id: &TransactionId,
    ) -> Result<SettlementOutcome> {
        match provider.verify(transaction_id).await {
            VerificationOutcome::Confirmed => {}
            VerificationOutcome::Pending => {
                debug!(transaction = %transaction_id, "Payment not confirmed yet");
                return Ok(SettlementOutcome::Pending);
            }
            VerificationOutcome::Unavailable(reason) => {
                warn!(
                    transaction = %transaction_id,
                    provider = provider.name(),
                    %reason,
                    "Gateway unavailable during verification"
                );
                return Ok(SettlementOutcome::GatewayUnavailable(reason));
            }
        }

        folio.mark_paid(Utc::now())?;
        if !self.folios.settle(folio.clone()).await? {
            debug!(transaction = %transaction_id, "Folio settled by a concurrent verification");
            return self.already_settled(folio.id).await;
        }

        // The folio is committed as paid from here on; later failures are logged only.
        if let Some(owner) = folio.owner {
            match self.loyalty.accrue(owner, folio.amount).await {
                Ok(_) => {}
                Err(SettlementError::CustomerNotFound(_)) => {
                    debug!(customer = %owner, "Owner is not a registered customer, no points accrued");
                }
                Err(e) => {
                    error!(customer = %owner, error = %e, "Loyalty accrual failed after settlement");
                }
            }
        }
        if let Err(e) = self.records.remove_for_folio(folio.id).await {
            error!(error = %e, "Failed to drop transaction records of settled folio");
        }

        info!(
            transaction = %transaction_id,
            provider = provider.name(),
            amount = %folio.amount,
            "Folio settled"
        );
        Ok(SettlementOutcome::Settled)
    }

    async fn already_settled(&self, folio_id: FolioId) -> Result<SettlementOutcome> {
        self.records.remove_for_folio(folio_id).await?;
        Ok(SettlementOutcome::AlreadySettled)
    }

    /// The transaction id `provider` uses for the folio.
    pub async fn transaction_id_for(&self, folio_id: FolioId, provider: &str) -> Result<TransactionId> {
        let folio = self.load(folio_id).await?;
        Ok(self.registry.resolve(provider)?.transaction_id(&folio))
    }

    async fn load(&self, folio_id: FolioId) -> Result<Folio> {
        self.folios
            .get(folio_id)
            .await?
            .ok_or(SettlementError::FolioNotFound(folio_id))
    }
}
