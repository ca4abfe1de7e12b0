mod user;
mod chat;
mod document;

// Export database-agnostic models
pub use user::{SubscriptionUpdate, Tier, UserRecord};
pub use chat::ChatRecord;
pub use document::{DocumentRecord, DocumentStatus};
