//! The capability contract every payment gateway integration satisfies.

use crate::domain::folio::Folio;
use crate::domain::transaction::TransactionId;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failures raised inside a provider while talking to its gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("gateway unreachable: {0}")]
    Unreachable(String),
    #[error("gateway rejected request: {0}")]
    Rejected(String),
    #[error("invalid provider configuration: {0}")]
    Misconfigured(String),
}

/// What the caller is sent to in order to pay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentTarget {
    /// A gateway page the customer is redirected to.
    Redirect(String),
    /// A payload rendered as a QR code by the client.
    QrPayload(String),
}

impl fmt::Display for PaymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentTarget::Redirect(url) => f.write_str(url),
            PaymentTarget::QrPayload(payload) => f.write_str(payload),
        }
    }
}

/// The gateway's answer about a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The gateway confirms the payment was received.
    Confirmed,
    /// The gateway knows nothing conclusive yet; polling again is fine.
    Pending,
    /// The gateway could not be asked (transport error, bad signature, outage).
    Unavailable(String),
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Stable, lower-case provider name.
    fn name(&self) -> &str;

    /// Deterministic transaction id for a folio. Must not depend on the wall clock.
    fn transaction_id(&self, folio: &Folio) -> TransactionId {
        TransactionId::plain(self.name(), folio.id)
    }

    async fn create_payment(
        &self,
        folio: &Folio,
        transaction_id: &TransactionId,
    ) -> Result<PaymentTarget, ProviderError>;

    async fn verify(&self, transaction_id: &TransactionId) -> VerificationOutcome;
}

pub type ProviderRef = Arc<dyn PaymentProvider>;
