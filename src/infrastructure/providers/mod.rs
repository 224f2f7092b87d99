//! Sandbox-backed gateway integrations.
//!
//! Each provider owns its credentials and request format and answers
//! verification queries from a [`GatewaySandbox`] instead of a live gateway.

pub mod sandbox;
pub mod vnpay;
pub mod zalopay;

pub use sandbox::GatewaySandbox;
pub use vnpay::{VnPayConfig, VnPayProvider};
pub use zalopay::{ZaloPayConfig, ZaloPayProvider};

use crate::domain::provider::ProviderRef;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// Hex SHA-256 over a secret followed by the payload.
pub(crate) fn sign(secret: &str, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

/// Enabled providers together with the sandbox each one answers from,
/// keyed by provider name.
pub struct SandboxedProviders {
    pub providers: Vec<ProviderRef>,
    pub sandboxes: HashMap<String, GatewaySandbox>,
}

/// Builds every provider whose configuration is enabled.
pub fn build(vnpay: &VnPayConfig, zalopay: &ZaloPayConfig) -> SandboxedProviders {
    let mut providers: Vec<ProviderRef> = Vec::new();
    let mut sandboxes = HashMap::new();

    if vnpay.enabled {
        let sandbox = GatewaySandbox::new();
        sandboxes.insert(vnpay::NAME.to_string(), sandbox.clone());
        providers.push(Arc::new(VnPayProvider::new(vnpay.clone(), sandbox)));
    }
    if zalopay.enabled {
        let sandbox = GatewaySandbox::new();
        sandboxes.insert(zalopay::NAME.to_string(), sandbox.clone());
        providers.push(Arc::new(ZaloPayProvider::new(zalopay.clone(), sandbox)));
    }

    SandboxedProviders {
        providers,
        sandboxes,
    }
}
