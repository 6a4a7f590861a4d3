// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared exercise catalog.

use axum::{extract::State, http::StatusCode, routing::get, Extension, Json, Router};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{CatalogExercise, NewCatalogExercise};
use crate::repositories::CatalogRepository;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/catalog", get(list_catalog).post(add_catalog_entry))
}

async fn list_catalog(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<CatalogExercise>>> {
    let entries = CatalogRepository::new(&state.db, Some(&user)).list().await?;
    Ok(Json(entries))
}

async fn add_catalog_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(fields): Json<NewCatalogExercise>,
) -> Result<(StatusCode, Json<CatalogExercise>)> {
    let entry = CatalogRepository::new(&state.db, Some(&user))
        .add(&fields)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
