use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Give the bare 408 emitted by `TimeoutLayer` the same JSON body as every
/// other error. Must sit outside the timeout layer.
pub async fn timeout_as_json(response: Response) -> Response {
    let bare = response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE);
    if bare {
        tracing::warn!("Request timed out");
        return ApiError::Timeout.into_response();
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        middleware,
        routing::get,
        Router,
    };
    use std::time::Duration;
    use tower::ServiceExt;
    use tower_http::timeout::TimeoutLayer;

    fn slow_router(limit: Duration) -> Router {
        Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    "done"
                }),
            )
            .route("/late", get(|| async { (StatusCode::REQUEST_TIMEOUT, "custom") }))
            .layer(TimeoutLayer::new(limit))
            .layer(middleware::map_response(timeout_as_json))
    }

    #[tokio::test]
    async fn test_timeout_gets_json_body() {
        let response = slow_router(Duration::from_millis(5))
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Request timed out" }));
    }

    #[tokio::test]
    async fn test_handler_408_with_body_passes_through() {
        let response = slow_router(Duration::from_secs(5))
            .oneshot(Request::get("/late").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"custom");
    }
}
