pub mod chat;
pub mod docs;
pub mod events;
pub mod health;
pub mod subscription;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::CorsConfig,
    middleware::{logging, timeout},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health & docs
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        // Callable endpoints
        .route("/chatCompletion", post(chat::chat_completion))
        .route("/handleSubscription", post(subscription::handle_subscription))
        // Storage trigger
        .route("/events/storage/finalize", post(events::storage_finalized));

    api_routes
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(state.config.server.request_timeout()))
        .layer(middleware::map_response(timeout::timeout_as_json))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Every endpoint accepts cross-origin callers. `*` (or no list) echoes the
/// caller's origin back; otherwise only listed origins are allowed.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if config.origins.is_empty() || config.origins.iter().any(|o| o == "*") {
        cors.allow_origin(AllowOrigin::mirror_request())
    } else {
        let parsed_origins: Vec<HeaderValue> = config
            .origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();

        cors.allow_origin(parsed_origins)
    }
}
