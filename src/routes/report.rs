// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Print-friendly report over an arbitrary date range.

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

use super::RangeQuery;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::repositories::{EventsRepository, MetricsRepository};
use crate::services::aggregation::{range_report, RangeReport};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/report", get(get_report))
}

async fn get_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RangeReport>> {
    let (from, to) = query.resolve()?;

    let metrics = MetricsRepository::new(&state.db, Some(&user));
    let events = EventsRepository::new(&state.db, Some(&user));
    let (rows, overlapping) = tokio::try_join!(
        metrics.get_range(from, to),
        events.get_overlapping(from, to),
    )?;

    Ok(Json(range_report(from, to, &rows, overlapping)))
}
