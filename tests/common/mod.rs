// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use fit_journal::config::Config;
use fit_journal::db::{FirestoreDb, JournalDb};
use fit_journal::middleware::auth::{create_jwt, AuthUser};
use fit_journal::routes::create_router;
use fit_journal::theme::{Theme, ThemeState};
use fit_journal::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a Firestore connection against the emulator.
#[allow(dead_code)]
pub async fn test_firestore() -> JournalDb {
    JournalDb::Firestore(
        FirestoreDb::new("test-project")
            .await
            .expect("Failed to connect to Firestore emulator"),
    )
}

/// Unique owner id for test isolation.
#[allow(dead_code)]
pub fn unique_owner() -> String {
    format!("owner-{}", uuid::Uuid::new_v4())
}

#[allow(dead_code)]
pub fn session(owner_id: &str) -> AuthUser {
    AuthUser {
        user_id: owner_id.to_string(),
    }
}

/// Create a test app backed by a fresh memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_frontend_url("http://localhost:5173")
}

#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();

    let state = Arc::new(AppState {
        config,
        db: JournalDb::in_memory(),
        theme: ThemeState::fixed(Theme::Light),
    });

    (create_router(state.clone()), state)
}

/// Signed session token for `owner_id`.
#[allow(dead_code)]
pub fn create_test_jwt(state: &AppState, owner_id: &str) -> String {
    create_jwt(owner_id, &state.config.jwt_signing_key).unwrap()
}

/// Build a request carrying a bearer token and optional JSON body.
#[allow(dead_code)]
pub fn authed_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as text.
#[allow(dead_code)]
pub async fn text_body(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
