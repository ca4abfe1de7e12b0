use axum::Json;
use utoipa::OpenApi;

use crate::{completion, error, ingestion};

use super::{chat, events, health, subscription};

#[derive(OpenApi)]
#[openapi(
    info(title = "Sahayak API", description = "Chat, subscription and document-ingestion endpoints"),
    paths(
        health::health_check,
        chat::chat_completion,
        subscription::handle_subscription,
        events::storage_finalized,
    ),
    components(schemas(
        chat::ChatCompletionRequest,
        chat::ChatCompletionResponse,
        completion::ContextTurn,
        subscription::SubscriptionRequest,
        subscription::SubscriptionResponse,
        ingestion::StorageObject,
        health::HealthResponse,
        error::ErrorBody,
    )),
    tags(
        (name = "chat", description = "Language-model completions"),
        (name = "subscriptions", description = "Plan changes"),
        (name = "events", description = "Storage notifications"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// OpenAPI document for every public endpoint
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
