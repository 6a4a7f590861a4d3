// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Theme setting.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::theme::Theme;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/settings/theme", get(get_theme).put(put_theme))
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ThemeSetting {
    pub theme: Theme,
}

async fn get_theme(State(state): State<Arc<AppState>>) -> Json<ThemeSetting> {
    Json(ThemeSetting {
        theme: state.theme.current().await,
    })
}

async fn put_theme(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ThemeSetting>,
) -> Result<Json<ThemeSetting>> {
    let theme = state.theme.set(body.theme).await?;
    Ok(Json(ThemeSetting { theme }))
}
