use std::sync::Arc;

use sahayak_persist::PersistenceClient;

/// Daily reset of free-tier counters and token balances
#[derive(Clone)]
pub struct QuotaResetJob {
    store: Arc<dyn PersistenceClient>,
    free_tokens: i64,
}

impl QuotaResetJob {
    pub fn new(store: Arc<dyn PersistenceClient>, free_tokens: i64) -> Self {
        Self { store, free_tokens }
    }

    /// One batch write over every free-tier user; returns how many matched
    pub async fn run(&self) -> sahayak_persist::Result<u64> {
        self.store.reset_free_tier(self.free_tokens).await
    }

    /// Scheduler entry point: failures are logged and the next tick proceeds
    pub async fn run_logged(&self) -> Option<u64> {
        match self.run().await {
            Ok(count) => {
                tracing::info!(users = count, tokens = self.free_tokens, "Free-tier limits reset");
                Some(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "Free-tier reset failed");
                None
            }
        }
    }
}
