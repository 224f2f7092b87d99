use super::{GatewaySandbox, sign};
use crate::domain::folio::Folio;
use crate::domain::provider::{PaymentProvider, PaymentTarget, ProviderError, VerificationOutcome};
use crate::domain::transaction::TransactionId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const NAME: &str = "zalopay";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ZaloPayConfig {
    pub enabled: bool,
    pub app_id: u32,
    pub partner_code: String,
    pub key: String,
    pub endpoint: String,
}

impl Default for ZaloPayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_id: 2553,
            partner_code: "HOTEL01".to_string(),
            key: "zalopay-sandbox-key".to_string(),
            endpoint: "https://sb-openapi.zalopay.vn/v2/create".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct QrOrder<'a> {
    app_id: u32,
    app_trans_id: &'a str,
    amount: String,
    description: String,
    endpoint: &'a str,
    mac: String,
}

/// QR-based gateway whose transaction ids fold in a date bucket and a partner code.
pub struct ZaloPayProvider {
    config: ZaloPayConfig,
    sandbox: GatewaySandbox,
}

impl ZaloPayProvider {
    pub fn new(config: ZaloPayConfig, sandbox: GatewaySandbox) -> Self {
        Self { config, sandbox }
    }
}

#[async_trait]
impl PaymentProvider for ZaloPayProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn transaction_id(&self, folio: &Folio) -> TransactionId {
        TransactionId::dated(&self.config.partner_code, folio.id, folio.opened_on)
    }

    async fn create_payment(
        &self,
        folio: &Folio,
        transaction_id: &TransactionId,
    ) -> Result<PaymentTarget, ProviderError> {
        if self.config.key.is_empty() {
            return Err(ProviderError::Misconfigured(
                "zalopay key is required".to_string(),
            ));
        }
        if self.sandbox.is_down() {
            return Err(ProviderError::Unreachable(self.config.endpoint.clone()));
        }

        let amount = folio.amount.value().normalize().to_string();
        let mac = sign(
            &self.config.key,
            &format!("{}|{}|{}", self.config.app_id, transaction_id, amount),
        );
        let order = QrOrder {
            app_id: self.config.app_id,
            app_trans_id: transaction_id.as_str(),
            amount,
            description: format!("Payment for folio #{}", folio.id),
            endpoint: &self.config.endpoint,
            mac,
        };
        let payload =
            serde_json::to_string(&order).map_err(|e| ProviderError::Rejected(e.to_string()))?;

        Ok(PaymentTarget::QrPayload(payload))
    }

    async fn verify(&self, transaction_id: &TransactionId) -> VerificationOutcome {
        self.sandbox.query(transaction_id).await
    }
}
