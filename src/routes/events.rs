// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar events annotating date ranges.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use std::sync::Arc;

use super::RangeQuery;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Event, NewEvent};
use crate::repositories::EventsRepository;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/{id}", delete(delete_event))
}

/// Events overlapping `[from, to]`.
async fn list_events(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<Event>>> {
    let (from, to) = query.resolve()?;
    let events = EventsRepository::new(&state.db, Some(&user))
        .get_overlapping(from, to)
        .await?;
    Ok(Json(events))
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(fields): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = EventsRepository::new(&state.db, Some(&user))
        .create(&fields)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn delete_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    EventsRepository::new(&state.db, Some(&user))
        .delete(&id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
