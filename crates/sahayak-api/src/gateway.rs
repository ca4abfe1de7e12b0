//! Request intake shared by the HTTP endpoints: body parsing with
//! JSON error bodies, and required-field checks.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};

use crate::error::ApiError;

/// `Json<T>` whose rejection is reported as a 400 `ApiError`
/// instead of axum's plain-text body
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(ApiError::BadRequest(rejection.body_text()))
            }
        }
    }
}

/// Present and non-empty
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Unwrap every field or fail the whole request with "Missing required fields"
pub fn require<const N: usize>(fields: [Option<String>; N]) -> Result<[String; N], ApiError> {
    let mut out: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = present(field).ok_or_else(ApiError::missing_fields)?;
    }
    Ok(out)
}
