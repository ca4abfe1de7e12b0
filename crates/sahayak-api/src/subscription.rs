use std::sync::Arc;

use chrono::Utc;
use sahayak_persist::{PersistenceClient, SubscriptionUpdate, Tier};

use crate::config::QuotaConfig;
use crate::error::{ApiError, ApiResult};
use crate::payment::PaymentValidator;

/// Validated subscription change
#[derive(Debug, Clone)]
pub struct SubscriptionInput {
    pub user_id: String,
    pub subscription_id: String,
    pub plan: String,
    pub status: String,
}

/// Token balance granted when a plan starts
pub fn starting_tokens(tier: &Tier, quota: &QuotaConfig) -> i64 {
    match tier {
        Tier::Premium => quota.premium_tokens,
        _ => quota.free_tokens,
    }
}

#[derive(Clone)]
pub struct SubscriptionHandler {
    store: Arc<dyn PersistenceClient>,
    payments: Arc<dyn PaymentValidator>,
    quota: QuotaConfig,
}

impl SubscriptionHandler {
    pub fn new(
        store: Arc<dyn PersistenceClient>,
        payments: Arc<dyn PaymentValidator>,
        quota: QuotaConfig,
    ) -> Self {
        Self { store, payments, quota }
    }

    /// Verify the payment, then overwrite tier, status and token balance.
    ///
    /// A rejected payment leaves the user record untouched.
    pub async fn apply(&self, input: SubscriptionInput) -> ApiResult<()> {
        let verified = self
            .payments
            .verify(&input.subscription_id)
            .await
            .map_err(|e| ApiError::Internal(format!("Payment verification failed: {e:#}")))?;

        if !verified {
            tracing::info!(
                user_id = %input.user_id,
                subscription_id = %input.subscription_id,
                "Payment rejected"
            );
            return Err(ApiError::InvalidPayment);
        }

        let tier = Tier::from(input.plan);
        let update = SubscriptionUpdate {
            tokens: starting_tokens(&tier, &self.quota),
            tier,
            status: input.status,
            updated_at: Utc::now(),
        };

        tracing::info!(
            user_id = %input.user_id,
            tier = %update.tier,
            tokens = update.tokens,
            "Applying subscription"
        );
        self.store
            .apply_subscription(&input.user_id, update)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))
    }
}
