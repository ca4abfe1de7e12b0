pub mod models;
pub mod error;
pub mod trait_client;
pub mod dbs;

pub use models::{
    ChatRecord, DocumentRecord, DocumentStatus, SubscriptionUpdate, Tier, UserRecord,
};
pub use trait_client::PersistenceClient;
pub use error::{PersistError, Result};
pub use dbs::memory::InMemoryPersistenceClient;

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
