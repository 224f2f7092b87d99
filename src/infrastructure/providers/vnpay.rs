use super::{GatewaySandbox, sign};
use crate::domain::folio::Folio;
use crate::domain::provider::{PaymentProvider, PaymentTarget, ProviderError, VerificationOutcome};
use crate::domain::transaction::TransactionId;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const NAME: &str = "vnpay";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VnPayConfig {
    pub enabled: bool,
    pub tmn_code: String,
    pub hash_secret: String,
    pub payment_url: String,
    pub return_url: String,
}

impl Default for VnPayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tmn_code: "SANDBOX1".to_string(),
            hash_secret: "vnpay-sandbox-secret".to_string(),
            payment_url: "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string(),
            return_url: "http://localhost:8080/payments/vnpay/return".to_string(),
        }
    }
}

/// Redirect-based gateway using the plain transaction id scheme.
pub struct VnPayProvider {
    config: VnPayConfig,
    sandbox: GatewaySandbox,
}

impl VnPayProvider {
    pub fn new(config: VnPayConfig, sandbox: GatewaySandbox) -> Self {
        Self { config, sandbox }
    }
}

#[async_trait]
impl PaymentProvider for VnPayProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn create_payment(
        &self,
        folio: &Folio,
        transaction_id: &TransactionId,
    ) -> Result<PaymentTarget, ProviderError> {
        if self.config.tmn_code.is_empty() || self.config.hash_secret.is_empty() {
            return Err(ProviderError::Misconfigured(
                "vnpay tmn_code and hash_secret are required".to_string(),
            ));
        }
        if self.sandbox.is_down() {
            return Err(ProviderError::Unreachable(self.config.payment_url.clone()));
        }

        // Sorted so the signed string is reproducible. Values are signed encoded.
        let mut params = BTreeMap::new();
        params.insert("vnp_Amount", folio.amount.minor_units().to_string());
        params.insert("vnp_OrderInfo", format!("folio-{}", folio.id));
        params.insert("vnp_ReturnUrl", self.config.return_url.clone());
        params.insert("vnp_TmnCode", self.config.tmn_code.clone());
        params.insert("vnp_TxnRef", transaction_id.to_string());

        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let hash = sign(&self.config.hash_secret, &query);

        Ok(PaymentTarget::Redirect(format!(
            "{}?{}&vnp_SecureHash={}",
            self.config.payment_url, query, hash
        )))
    }

    async fn verify(&self, transaction_id: &TransactionId) -> VerificationOutcome {
        self.sandbox.query(transaction_id).await
    }
}
