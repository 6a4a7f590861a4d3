// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Week view: Monday-to-Sunday summary compared against the prior week.

use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::repositories::{EventsRepository, MetricsRepository};
use crate::services::aggregation::{week_summary, WeekSummary};
use crate::time_utils::{parse_iso_date, previous_week_start, today, week_end, week_start};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/week", get(get_current_week))
        .route("/api/week/{date}", get(get_week))
}

async fn get_current_week(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<WeekSummary>> {
    load_week(&state, &user, today()).await.map(Json)
}

async fn get_week(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<WeekSummary>> {
    let anchor = parse_iso_date(&date)?;
    load_week(&state, &user, anchor).await.map(Json)
}

/// The three reads are independent and run concurrently.
async fn load_week(state: &AppState, user: &AuthUser, anchor: NaiveDate) -> Result<WeekSummary> {
    let start = week_start(anchor);
    let end = week_end(anchor);
    let previous_start = previous_week_start(anchor);
    let previous_end = start - chrono::Days::new(1);

    let metrics = MetricsRepository::new(&state.db, Some(user));
    let events = EventsRepository::new(&state.db, Some(user));

    let (current, previous, week_events) = tokio::try_join!(
        metrics.get_range(start, end),
        metrics.get_range(previous_start, previous_end),
        events.get_overlapping(start, end),
    )?;

    tracing::debug!(
        user_id = %user.user_id,
        week_start = %start,
        current_rows = current.len(),
        previous_rows = previous.len(),
        events = week_events.len(),
        "Week loaded"
    );

    Ok(week_summary(anchor, &current, &previous, week_events))
}
