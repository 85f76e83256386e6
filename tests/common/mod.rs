//! Shared helpers for Web API integration tests.

#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use vendauth::config::{ServerConfig, TokenConfig};
use vendauth::web::handlers::AppState;
use vendauth::web::middleware::JwtState;
use vendauth::web::router::{create_health_router, create_router};
use vendauth::{Database, StubMailer};

/// A running test server plus hooks into its collaborators.
pub struct TestContext {
    pub server: TestServer,
    pub db: Database,
    pub mailer: Arc<StubMailer>,
}

fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        jwt_secret: "test-secret-key-for-testing-only".to_string(),
        access_token_expiry_secs: 900,
        refresh_token_expiry_days: 7,
    }
}

fn test_token_config() -> TokenConfig {
    TokenConfig {
        verification_expiry_hours: 24,
        reset_expiry_mins: 60,
    }
}

/// Spin up a test server on an in-memory database with a stub mailer.
pub async fn setup() -> TestContext {
    let server_config = test_server_config();
    let token_config = test_token_config();

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let mailer = Arc::new(StubMailer::new());

    let app_state = Arc::new(AppState::new(
        db.clone(),
        mailer.clone(),
        &server_config,
        &token_config,
    ));
    let jwt_state = Arc::new(JwtState::new(&server_config.jwt_secret));

    let router = create_router(app_state, jwt_state, &server_config.cors_origins)
        .merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");

    TestContext { server, db, mailer }
}

/// Register a user and return the response body.
pub async fn register_user(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": email,
            "password": password,
            "password_confirm": password,
            "first_name": "Test",
            "last_name": "User"
        }))
        .await;

    response.json::<Value>()
}

/// Log in and return the response body.
pub async fn login_user(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .await;

    response.json::<Value>()
}

/// Log in and return just the access token.
pub async fn access_token(server: &TestServer, email: &str, password: &str) -> String {
    let body = login_user(server, email, password).await;
    body["data"]["access_token"]
        .as_str()
        .expect("login should return an access token")
        .to_string()
}

/// The token embedded in the most recent recorded email of the given kind.
pub fn last_emailed_token(mailer: &StubMailer, kind: &str) -> String {
    mailer
        .sent()
        .iter()
        .rev()
        .find(|m| m.kind == kind)
        .map(|m| m.token.clone())
        .expect("no recorded email of the requested kind")
}
