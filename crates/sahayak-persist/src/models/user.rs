use std::fmt;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Subscription class stored on the user record.
///
/// Plans other than `free` and `premium` are kept verbatim: they are neither
/// rate limited nor touched by the daily reset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tier {
    Free,
    Premium,
    Other(String),
}

impl Tier {
    pub fn as_str(&self) -> &str {
        match self {
            Tier::Free => "free",
            Tier::Premium => "premium",
            Tier::Other(plan) => plan,
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Tier::Free)
    }
}

impl From<&str> for Tier {
    fn from(plan: &str) -> Self {
        match plan {
            "free" => Tier::Free,
            "premium" => Tier::Premium,
            other => Tier::Other(other.to_string()),
        }
    }
}

impl From<String> for Tier {
    fn from(plan: String) -> Self {
        match plan.as_str() {
            "free" => Tier::Free,
            "premium" => Tier::Premium,
            _ => Tier::Other(plan),
        }
    }
}

impl From<Tier> for String {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Other(plan) => plan,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database-agnostic user model, keyed by `user_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub subscription: Option<Tier>,
    pub subscription_status: Option<String>,
    pub subscription_updated: Option<DateTime<Utc>>,
    /// Epoch milliseconds of the last successful completion
    pub last_request: Option<i64>,
    /// Audit counter; never read back to enforce a limit
    pub requests_used: i64,
    pub tokens: i64,
}

impl UserRecord {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            subscription: None,
            subscription_status: None,
            subscription_updated: None,
            last_request: None,
            requests_used: 0,
            tokens: 0,
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.subscription = Some(tier);
        self
    }

    pub fn with_last_request(mut self, at_ms: i64) -> Self {
        self.last_request = Some(at_ms);
        self
    }

    pub fn is_free_tier(&self) -> bool {
        self.subscription.as_ref().is_some_and(Tier::is_free)
    }
}

/// Fields written to a user record after a verified payment
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionUpdate {
    pub tier: Tier,
    pub status: String,
    pub tokens: i64,
    pub updated_at: DateTime<Utc>,
}
