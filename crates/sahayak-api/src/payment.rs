use async_trait::async_trait;

/// Payment gateway check for a subscription identifier
#[async_trait]
pub trait PaymentValidator: Send + Sync {
    /// `Ok(false)` means the gateway rejected the payment; `Err` means the
    /// gateway could not be asked
    async fn verify(&self, subscription_id: &str) -> anyhow::Result<bool>;
}

/// Validator used until a real gateway is wired in: every subscription
/// identifier is accepted
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllPayments;

#[async_trait]
impl PaymentValidator for AcceptAllPayments {
    async fn verify(&self, subscription_id: &str) -> anyhow::Result<bool> {
        tracing::warn!(subscription_id = %subscription_id, "Payment accepted without gateway verification");
        Ok(true)
    }
}
