//! Shared harness for the HTTP integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use taskflow_api::auth::jwt::{generate_access_token, JwtConfig};
use taskflow_api::auth::password::hash_password;
use taskflow_api::config::ServerConfig;
use taskflow_api::router::build_app_router;
use taskflow_api::state::AppState;
use taskflow_db::models::profile::{CreateProfile, Profile};
use taskflow_db::repositories::ProfileRepo;
use taskflow_events::Mailer;

pub const TEST_PASSWORD: &str = "correct-horse-battery";
pub const PUBLIC_APP_URL: &str = "http://app.test";

/// A `ServerConfig` with safe defaults and public signup disabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_app_url: PUBLIC_APP_URL.to_string(),
        app_name: "TaskFlow".to_string(),
        allow_public_signup: false,
        jwt: JwtConfig {
            secret: "integration-test-secret-at-least-32-bytes".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the production router over `pool`, with email simulated.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: Arc::new(Mailer::simulated()),
    };
    build_app_router(state, &config)
}

/// Insert a profile directly and return it with a valid access token.
pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> (Profile, String) {
    let name = email.split('@').next().unwrap_or(email).to_string();
    let input = CreateProfile {
        full_name: name,
        email: email.to_lowercase(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
        position: None,
    };
    let profile = ProfileRepo::create(pool, &input)
        .await
        .expect("profile creation should succeed");
    let token = generate_access_token(profile.id, &profile.role, &test_config().jwt)
        .expect("token generation should succeed");
    (profile, token)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}
