use crate::domain::provider::VerificationOutcome;
use crate::domain::transaction::TransactionId;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory stand-in for the remote side of a gateway.
///
/// Records which transactions the customer has paid and whether the gateway
/// is currently reachable. Clones share state.
#[derive(Default, Clone)]
pub struct GatewaySandbox {
    paid: Arc<RwLock<HashSet<TransactionId>>>,
    outage: Arc<AtomicBool>,
}

impl GatewaySandbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the customer completing payment at the gateway.
    pub async fn mark_paid(&self, transaction_id: TransactionId) {
        self.paid.write().await.insert(transaction_id);
    }

    pub fn set_outage(&self, down: bool) {
        self.outage.store(down, Ordering::SeqCst);
    }

    pub fn is_down(&self) -> bool {
        self.outage.load(Ordering::SeqCst)
    }

    /// Answers a verification query the way the remote gateway would.
    pub async fn query(&self, transaction_id: &TransactionId) -> VerificationOutcome {
        if self.is_down() {
            return VerificationOutcome::Unavailable("gateway sandbox is down".to_string());
        }
        if self.paid.read().await.contains(transaction_id) {
            VerificationOutcome::Confirmed
        } else {
            VerificationOutcome::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sandbox_outcomes() {
        let sandbox = GatewaySandbox::new();
        let id = TransactionId::new("vnpay-1");

        assert_eq!(sandbox.query(&id).await, VerificationOutcome::Pending);

        sandbox.mark_paid(id.clone()).await;
        assert_eq!(sandbox.query(&id).await, VerificationOutcome::Confirmed);

        sandbox.set_outage(true);
        assert!(matches!(
            sandbox.query(&id).await,
            VerificationOutcome::Unavailable(_)
        ));

        sandbox.set_outage(false);
        assert_eq!(sandbox.query(&id).await, VerificationOutcome::Confirmed);
    }
}
