use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{ingestion::StorageObject, state::AppState};

/// Storage finalize notification
///
/// Always acknowledged with 204, whatever happened to the object, so the
/// event source never redelivers.
#[utoipa::path(
    post,
    path = "/events/storage/finalize",
    request_body = StorageObject,
    responses(
        (status = 204, description = "Event consumed")
    ),
    tag = "events"
)]
pub async fn storage_finalized(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StorageObject>, JsonRejection>,
) -> StatusCode {
    match payload {
        Ok(Json(object)) => {
            let outcome = state.ingestion.handle(&object).await;
            tracing::debug!(object = ?object.name, outcome = ?outcome, "Finalize event handled");
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Unreadable finalize event dropped");
        }
    }
    StatusCode::NO_CONTENT
}
