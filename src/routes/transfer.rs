// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export (JSON backup, CSV report) and import.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;

use super::RangeQuery;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::repositories::{BackupRepository, RestoreSummary};
use crate::services::export::{attachment_name, backup_json};
use crate::time_utils::today;
use crate::AppState;

/// Largest accepted backup document.
const MAX_IMPORT_BYTES: usize = 16 * 1024 * 1024;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/export/json", get(export_json))
        .route("/api/export/csv", get(export_csv))
        .route(
            "/api/settings/import",
            post(import_backup).layer(DefaultBodyLimit::max(MAX_IMPORT_BYTES)),
        )
}

/// Log an export failure and hide its details from the caller.
fn export_failed(user: &AuthUser, kind: &str, err: AppError) -> AppError {
    if err.is_client_error() {
        return err;
    }
    tracing::error!(user_id = %user.user_id, kind, error = %err, "Export failed");
    AppError::Internal(anyhow::anyhow!("Export failed"))
}

fn attachment(content_type: &str, file_name: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

async fn export_json(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response> {
    let backup = BackupRepository::new(&state.db, Some(&user))
        .export()
        .await
        .map_err(|e| export_failed(&user, "json", e))?;
    let body = backup_json(&backup).map_err(|e| export_failed(&user, "json", e))?;

    Ok(attachment(
        "application/json",
        attachment_name("backup", today(), "json"),
        body,
    ))
}

async fn export_csv(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> Result<Response> {
    let (from, to) = query.resolve()?;
    let body = BackupRepository::new(&state.db, Some(&user))
        .metrics_csv(from, to)
        .await
        .map_err(|e| export_failed(&user, "csv", e))?;

    Ok(attachment(
        "text/csv; charset=utf-8",
        attachment_name("metrics", to, "csv"),
        body,
    ))
}

/// Restore from a JSON backup in the request body.
async fn import_backup(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<RestoreSummary>> {
    let summary = BackupRepository::new(&state.db, Some(&user))
        .restore(&body)
        .await?;
    Ok(Json(summary))
}
