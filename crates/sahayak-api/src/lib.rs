//! HTTP surface and background jobs for the Sahayak assistant backend.

pub mod completion;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ingestion;
pub mod middleware;
pub mod payment;
pub mod quota;
pub mod reset;
pub mod routes;
pub mod scheduler;
pub mod state;
pub mod subscription;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use state::{AppState, Collaborators};
