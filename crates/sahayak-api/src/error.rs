use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub const MISSING_FIELDS: &str = "Missing required fields";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Rate limit exceeded. Please upgrade to premium.")]
    RateLimited,

    #[error("Invalid payment")]
    InvalidPayment,

    #[error("Request timed out")]
    Timeout,

    /// Failure of a downstream call whose message is echoed as `details`
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Failure reported with a generic body only
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing_fields() -> Self {
        ApiError::BadRequest(MISSING_FIELDS.to_string())
    }
}

impl From<sahayak_persist::PersistError> for ApiError {
    fn from(err: sahayak_persist::PersistError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Upstream(format!("{err:#}"))
    }
}

/// JSON body of every non-2xx response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error: self.to_string(), details: None },
            ),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorBody { error: self.to_string(), details: None },
            ),
            ApiError::InvalidPayment => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error: self.to_string(), details: None },
            ),
            ApiError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                ErrorBody { error: self.to_string(), details: None },
            ),
            ApiError::Upstream(ref details) => {
                tracing::error!("Upstream error: {}", details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Internal server error".to_string(),
                        details: Some(details.clone()),
                    },
                )
            }
            ApiError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody { error: "Internal server error".to_string(), details: None },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
