use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    completion::{CompletionInput, ContextTurn},
    error::ApiResult,
    gateway::{require, ValidJson},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletionRequest {
    pub prompt: Option<String>,
    /// `ne` for Nepali replies; anything else gets English
    pub language: Option<String>,
    pub user_id: Option<String>,
    pub context: Option<Vec<ContextTurn>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatCompletionResponse {
    pub response: String,
}

/// Generate a reply to `prompt`, replaying `context` first
#[utoipa::path(
    post,
    path = "/chatCompletion",
    request_body = ChatCompletionRequest,
    responses(
        (status = 200, description = "Completion generated", body = ChatCompletionResponse),
        (status = 400, description = "Missing prompt or userId", body = crate::error::ErrorBody),
        (status = 429, description = "Free-tier cooldown active", body = crate::error::ErrorBody),
        (status = 500, description = "Upstream failure", body = crate::error::ErrorBody)
    ),
    tag = "chat"
)]
pub async fn chat_completion(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<ChatCompletionRequest>,
) -> ApiResult<Json<ChatCompletionResponse>> {
    let [prompt, user_id] = require([req.prompt, req.user_id])?;

    let response = state
        .completion
        .complete(CompletionInput {
            user_id,
            prompt,
            language: req.language,
            context: req.context.unwrap_or_default(),
        })
        .await?;

    Ok(Json(ChatCompletionResponse { response }))
}
