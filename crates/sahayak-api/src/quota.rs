use std::sync::Arc;

use chrono::Utc;
use sahayak_persist::{PersistenceClient, UserRecord};

use crate::error::{ApiError, ApiResult};

/// Current wall clock as epoch milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Free-tier users must wait `cooldown_ms` after their last successful
/// completion. Users without a record, premium users and users on any
/// other plan are never throttled.
pub fn is_throttled(user: Option<&UserRecord>, now_ms: i64, cooldown_ms: i64) -> bool {
    let Some(user) = user else {
        return false;
    };
    if !user.is_free_tier() {
        return false;
    }
    let last = user.last_request.unwrap_or(0);
    now_ms.saturating_sub(last) < cooldown_ms
}

/// Per-user cooldown gate backed by the user's `last_request` stamp
///
/// Check and record are separate calls with the language-model round trip
/// in between, so two concurrent requests from one user can both pass.
#[derive(Clone)]
pub struct QuotaTracker {
    store: Arc<dyn PersistenceClient>,
    cooldown_ms: i64,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn PersistenceClient>, cooldown_ms: i64) -> Self {
        Self { store, cooldown_ms }
    }

    pub async fn check(&self, user_id: &str, now_ms: i64) -> ApiResult<()> {
        let user = self.store.get_user(user_id).await?;
        if is_throttled(user.as_ref(), now_ms, self.cooldown_ms) {
            tracing::info!(user_id = %user_id, "Free-tier cooldown active");
            return Err(ApiError::RateLimited);
        }
        Ok(())
    }

    /// Stamp a successful completion
    pub async fn record(&self, user_id: &str, now_ms: i64) -> ApiResult<()> {
        self.store.record_request(user_id, now_ms).await?;
        Ok(())
    }
}
