mod common;

use axum::http::StatusCode;
use serde_json::json;

use std::sync::Arc;

use common::{DownStore, FixedPayments, TestApp};
use sahayak_persist::{Tier, UserRecord};

fn subscription(plan: &str) -> serde_json::Value {
    json!({
        "userId": "u1",
        "subscriptionId": "sub_123",
        "plan": plan,
        "status": "active"
    })
}

#[tokio::test]
async fn test_premium_plan_grants_premium_tokens() {
    let app = TestApp::new();
    app.store
        .insert_user(UserRecord::new("u1").with_tier(Tier::Free).with_last_request(1_000))
        .await;

    let (status, body) = app.post_json("/handleSubscription", subscription("premium")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
    assert_eq!(app.payments.checked.lock().unwrap().as_slice(), ["sub_123"]);

    let user = app.store.user("u1").await.unwrap();
    assert_eq!(user.subscription, Some(Tier::Premium));
    assert_eq!(user.subscription_status.as_deref(), Some("active"));
    assert!(user.subscription_updated.is_some());
    assert_eq!(user.tokens, 1000);
    assert_eq!(user.last_request, Some(1_000));
}

#[tokio::test]
async fn test_other_plans_grant_free_tokens() {
    for plan in ["free", "basic", "family"] {
        let app = TestApp::new();

        let (status, _) = app.post_json("/handleSubscription", subscription(plan)).await;
        assert_eq!(status, StatusCode::OK);

        let user = app.store.user("u1").await.unwrap();
        assert_eq!(user.tokens, 100, "plan {plan}");
        assert_eq!(user.subscription.as_ref().map(Tier::as_str), Some(plan));
    }
}

#[tokio::test]
async fn test_downgrade_resets_balance() {
    let app = TestApp::new();
    let mut user = UserRecord::new("u1").with_tier(Tier::Premium);
    user.tokens = 870;
    app.store.insert_user(user).await;

    let (status, _) = app.post_json("/handleSubscription", subscription("free")).await;

    assert_eq!(status, StatusCode::OK);
    let user = app.store.user("u1").await.unwrap();
    assert!(user.is_free_tier());
    assert_eq!(user.tokens, 100);
}

#[tokio::test]
async fn test_rejected_payment_changes_nothing() {
    let app = TestApp::builder().payments(FixedPayments::rejecting()).build();
    let before = UserRecord::new("u1").with_tier(Tier::Free);
    app.store.insert_user(before.clone()).await;

    let (status, body) = app.post_json("/handleSubscription", subscription("premium")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid payment" }));
    assert_eq!(app.store.user("u1").await.unwrap(), before);
}

#[tokio::test]
async fn test_unreachable_gateway_is_an_internal_error_without_details() {
    let app = TestApp::builder().payments(FixedPayments::unreachable()).build();

    let (status, body) = app.post_json("/handleSubscription", subscription("premium")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal server error" }));
    assert!(app.store.user("u1").await.is_none());
}

#[tokio::test]
async fn test_missing_fields_skip_payment_check() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/handleSubscription",
            json!({ "userId": "u1", "plan": "premium", "status": "active" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(app.payments.calls(), 0);
}

#[tokio::test]
async fn test_database_outage_is_an_internal_error_without_details() {
    let app = TestApp::builder().persist(Arc::new(DownStore)).build();

    let (status, body) = app.post_json("/handleSubscription", subscription("premium")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal server error" }));
    assert_eq!(app.payments.calls(), 1);
}
