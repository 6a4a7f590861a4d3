// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: exchange a signed token for the session cookie.

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{verify_jwt, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/session", post(create_session))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize)]
pub struct SessionRequest {
    token: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub user_id: String,
}

/// Cookies are marked `Secure` unless the frontend is served over plain http.
fn secure_cookies(frontend_url: &str) -> bool {
    !frontend_url.starts_with("http://")
}

fn session_cookie(value: &str, max_age: usize, secure: bool) -> Result<HeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, value, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid cookie header: {}", e)))
}

/// Verify a signed token and store it in the session cookie.
async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SessionRequest>,
) -> Result<Response> {
    let token = body.token.trim();
    let user = verify_jwt(token, &state.config.jwt_signing_key)?;

    tracing::info!(user_id = %user.user_id, "Session started");

    let cookie = session_cookie(
        token,
        SESSION_TTL_SECS,
        secure_cookies(&state.config.frontend_url),
    )?;
    let mut response = Json(SessionResponse {
        user_id: user.user_id,
    })
    .into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// Clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>) -> Result<Response> {
    let cookie = session_cookie("", 0, secure_cookies(&state.config.frontend_url))?;
    let mut response = StatusCode::NO_CONTENT.into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}
