//! Web API Profile Tests
//!
//! Integration tests for reading and updating the authenticated profile.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{access_token, register_user, setup};

// ============================================================================
// Get Profile Tests
// ============================================================================

#[tokio::test]
async fn test_get_profile() {
    let ctx = setup().await;

    register_user(&ctx.server, "jane@example.com", "password123").await;
    let token = access_token(&ctx.server, "jane@example.com", "password123").await;

    let response = ctx
        .server
        .get("/api/auth/profile")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["email"], "jane@example.com");
    assert_eq!(body["data"]["username"], "jane");
    assert_eq!(body["data"]["first_name"], "Test");
    assert_eq!(body["data"]["last_name"], "User");
    assert_eq!(body["data"]["is_email_verified"], false);
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"]["password"].is_null());
}

#[tokio::test]
async fn test_get_profile_requires_auth() {
    let ctx = setup().await;

    let response = ctx.server.get("/api/auth/profile").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_profile_rejects_garbage_token() {
    let ctx = setup().await;

    let response = ctx
        .server
        .get("/api/auth/profile")
        .add_header(AUTHORIZATION, "Bearer not-a-jwt")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid or expired token");
}

// ============================================================================
// Update Profile Tests
// ============================================================================

#[tokio::test]
async fn test_update_profile_names() {
    let ctx = setup().await;

    register_user(&ctx.server, "jane@example.com", "password123").await;
    let token = access_token(&ctx.server, "jane@example.com", "password123").await;

    let response = ctx
        .server
        .put("/api/auth/profile/update")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({"first_name": "Janet", "last_name": "Smith"}))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["first_name"], "Janet");
    assert_eq!(body["data"]["last_name"], "Smith");

    // Persisted, not just echoed
    let response = ctx
        .server
        .get("/api/auth/profile")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["first_name"], "Janet");
    assert_eq!(body["data"]["last_name"], "Smith");
}

#[tokio::test]
async fn test_update_profile_partial() {
    let ctx = setup().await;

    register_user(&ctx.server, "jane@example.com", "password123").await;
    let token = access_token(&ctx.server, "jane@example.com", "password123").await;

    let response = ctx
        .server
        .put("/api/auth/profile/update")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({"first_name": "Janet"}))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["first_name"], "Janet");
    assert_eq!(body["data"]["last_name"], "User");
}

#[tokio::test]
async fn test_update_profile_ignores_immutable_fields() {
    let ctx = setup().await;

    register_user(&ctx.server, "jane@example.com", "password123").await;
    let token = access_token(&ctx.server, "jane@example.com", "password123").await;

    let response = ctx
        .server
        .put("/api/auth/profile/update")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({
            "id": 9999,
            "email": "hijack@example.com",
            "username": "hijacker",
            "is_email_verified": true,
            "first_name": "Janet"
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["email"], "jane@example.com");
    assert_eq!(body["data"]["username"], "jane");
    assert_eq!(body["data"]["is_email_verified"], false);
    assert_eq!(body["data"]["first_name"], "Janet");
}

#[tokio::test]
async fn test_update_profile_empty_body_returns_current() {
    let ctx = setup().await;

    register_user(&ctx.server, "jane@example.com", "password123").await;
    let token = access_token(&ctx.server, "jane@example.com", "password123").await;

    let response = ctx
        .server
        .put("/api/auth/profile/update")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({}))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["first_name"], "Test");
    assert_eq!(body["data"]["last_name"], "User");
}

#[tokio::test]
async fn test_update_profile_rejects_oversized_name() {
    let ctx = setup().await;

    register_user(&ctx.server, "jane@example.com", "password123").await;
    let token = access_token(&ctx.server, "jane@example.com", "password123").await;

    let response = ctx
        .server
        .put("/api/auth/profile/update")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({"first_name": "x".repeat(151)}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_profile_requires_auth() {
    let ctx = setup().await;

    let response = ctx
        .server
        .put("/api/auth/profile/update")
        .json(&json!({"first_name": "Janet"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
