// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod catalog;
pub mod days;
pub mod events;
pub mod report;
pub mod settings;
pub mod transfer;
pub mod weeks;

use crate::error::Result;
use crate::middleware::auth::require_auth;
use crate::time_utils::{parse_iso_date, today, week_end, week_start};
use crate::AppState;
use axum::http::{header, Method};
use axum::response::Redirect;
use axum::{middleware, routing::get, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Landing view for the client; unknown paths are sent here.
pub const DAY_VIEW_PATH: &str = "/api/day";

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
    pub store: String,
}

/// Health check response
async fn health_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
        store: state.db.backend_name().to_string(),
    })
}

async fn fallback() -> Redirect {
    Redirect::temporary(DAY_VIEW_PATH)
}

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both optional.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RangeQuery {
    /// Resolve to an inclusive range. A missing bound defaults to the
    /// matching end of the current week.
    pub fn resolve(&self) -> Result<(NaiveDate, NaiveDate)> {
        let today = today();
        let from = match self.from.as_deref() {
            Some(s) => parse_iso_date(s)?,
            None => week_start(today),
        };
        let to = match self.to.as_deref() {
            Some(s) => parse_iso_date(s)?,
            None => week_end(today),
        };
        Ok((from, to))
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes());

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .merge(days::routes())
        .merge(weeks::routes())
        .merge(catalog::routes())
        .merge(events::routes())
        .merge(transfer::routes())
        .merge(report::routes())
        .merge(settings::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(fallback)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_query_parses_both_bounds() {
        let query = RangeQuery {
            from: Some("2025-06-02".to_string()),
            to: Some("2025-06-08".to_string()),
        };
        let (from, to) = query.resolve().unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 6, 8).unwrap());
    }

    #[test]
    fn test_range_query_defaults_to_current_week() {
        let (from, to) = RangeQuery::default().resolve().unwrap();
        assert_eq!(from, week_start(today()));
        assert_eq!(to, week_end(today()));
    }

    #[test]
    fn test_range_query_rejects_garbage() {
        let query = RangeQuery {
            from: Some("June 2nd".to_string()),
            to: None,
        };
        assert!(query.resolve().is_err());
    }
}
