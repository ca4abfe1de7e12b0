use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::ApiResult,
    gateway::{require, ValidJson},
    state::AppState,
    subscription::SubscriptionInput,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub user_id: Option<String>,
    /// Payment-gateway reference checked before anything is written
    pub subscription_id: Option<String>,
    pub plan: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub success: bool,
}

/// Apply a paid plan change to a user
#[utoipa::path(
    post,
    path = "/handleSubscription",
    request_body = SubscriptionRequest,
    responses(
        (status = 200, description = "Subscription applied", body = SubscriptionResponse),
        (status = 400, description = "Invalid payment or missing fields", body = crate::error::ErrorBody),
        (status = 500, description = "Storage or gateway failure", body = crate::error::ErrorBody)
    ),
    tag = "subscriptions"
)]
pub async fn handle_subscription(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<SubscriptionRequest>,
) -> ApiResult<Json<SubscriptionResponse>> {
    let [user_id, subscription_id, plan, status] =
        require([req.user_id, req.subscription_id, req.plan, req.status])?;

    state
        .subscriptions
        .apply(SubscriptionInput { user_id, subscription_id, plan, status })
        .await?;

    Ok(Json(SubscriptionResponse { success: true }))
}
