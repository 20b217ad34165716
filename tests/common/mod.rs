//! Shared helpers for driving the full route tree with `warp::test`

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use warp::http::StatusCode;

use rusty_folio::auth::{AuthProvider, IdentityProviders, StaticIdentityProvider};
use rusty_folio::config::ServerConfig;
use rusty_folio::core::AppState;
use rusty_folio::handlers::routes;
use rusty_folio::storage::{create_memory_revocation_store, create_memory_storage};

pub const GOOGLE_ASSERTION: &str = "google-id-token-for-gina";

pub fn test_state_with(config: ServerConfig) -> AppState {
    let providers = IdentityProviders::new().add_provider(Arc::new(
        StaticIdentityProvider::new(AuthProvider::Google).with_identity(
            GOOGLE_ASSERTION,
            "gina@example.com",
            Some("Gina"),
        ),
    ));
    AppState::new(
        config,
        create_memory_storage(),
        create_memory_revocation_store(),
        providers,
    )
}

pub fn test_state() -> AppState {
    test_state_with(ServerConfig::for_testing())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: warp::http::HeaderMap,
    pub body: Value,
}

pub async fn send(
    state: &AppState,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut request = warp::test::request().method(method).path(path);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {}", token));
    }
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.reply(&routes(state.clone())).await;
    let body = serde_json::from_slice(response.body()).unwrap_or(Value::Null);
    TestResponse {
        status: response.status(),
        headers: response.headers().clone(),
        body,
    }
}

pub async fn get(state: &AppState, path: &str, token: Option<&str>) -> TestResponse {
    send(state, "GET", path, token, None).await
}

/// Register and log in, returning (user id, session token)
pub async fn sign_up(state: &AppState, email: &str) -> (String, String) {
    let registered = send(
        state,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": "p1", "name": "Test User" })),
    )
    .await;
    assert_eq!(registered.status, StatusCode::CREATED, "{:?}", registered.body);

    let login = send(
        state,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "p1" })),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);

    let user_id = login.body["user"]["id"].as_str().unwrap().to_string();
    let token = login.body["token"].as_str().unwrap().to_string();
    (user_id, token)
}

pub fn skill_body(name: &str, level: i64, published: bool) -> Value {
    json!({ "name": name, "category": "Backend", "level": level, "published": published })
}
