// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use fit_journal::error::AppError;

mod common;

async fn status_and_body(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    (status, common::json_body(response).await)
}

#[tokio::test]
async fn test_status_codes() {
    assert_eq!(
        status_and_body(AppError::Unauthorized).await.0,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status_and_body(AppError::NotFound("x".into())).await.0,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_and_body(AppError::BadRequest("x".into())).await.0,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_and_body(AppError::Conflict("x".into())).await.0,
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn test_client_errors_carry_details() {
    let (_, body) = status_and_body(AppError::BadRequest("Invalid date 'x'".into())).await;
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["details"], "Invalid date 'x'");
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let (status, body) = status_and_body(AppError::Database("connection reset".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
    assert!(body.get("details").is_none());

    let (status, body) =
        status_and_body(AppError::Internal(anyhow::anyhow!("secret internals"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.to_string().contains("secret internals"));
}

#[test]
fn test_is_client_error() {
    assert!(AppError::Unauthorized.is_client_error());
    assert!(AppError::Conflict("busy".into()).is_client_error());
    assert!(!AppError::Database("down".into()).is_client_error());
    assert!(!AppError::Internal(anyhow::anyhow!("boom")).is_client_error());
}

#[test]
fn test_malformed_json_is_bad_request() {
    let err: AppError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, AppError::BadRequest(msg) if msg.starts_with("Malformed JSON")));
}
