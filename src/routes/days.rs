// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Day view: metrics, the day's workout and active events.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{DailyMetrics, Event, MetricsFields, NewExercise, Workout, WorkoutExercise};
use crate::repositories::{EventsRepository, MetricsRepository, WorkoutRepository};
use crate::time_utils::{parse_iso_date, today};
use crate::units::{format_kg, parse_kg};
use crate::AppState;

/// Day routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/day", get(get_today))
        .route("/api/day/{date}", get(get_day))
        .route("/api/day/{date}/metrics", put(put_metrics))
        .route("/api/day/{date}/exercises", post(add_exercise))
        .route("/api/exercises/{id}", delete(delete_exercise))
}

/// Exercise with its load rendered for display.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseView {
    #[serde(flatten)]
    pub exercise: WorkoutExercise,
    pub load_display: String,
}

impl From<WorkoutExercise> for ExerciseView {
    fn from(exercise: WorkoutExercise) -> Self {
        let load_display = exercise.load.describe();
        Self {
            exercise,
            load_display,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DayView {
    pub date: NaiveDate,
    pub metrics: Option<DailyMetrics>,
    pub weight_display: Option<String>,
    pub workout: Workout,
    pub exercises: Vec<ExerciseView>,
    pub events: Vec<Event>,
}

async fn get_today(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DayView>> {
    load_day(&state, &user, today()).await.map(Json)
}

async fn get_day(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<DayView>> {
    let date = parse_iso_date(&date)?;
    load_day(&state, &user, date).await.map(Json)
}

async fn load_day(state: &AppState, user: &AuthUser, date: NaiveDate) -> Result<DayView> {
    let metrics_repo = MetricsRepository::new(&state.db, Some(user));
    let workouts = WorkoutRepository::new(&state.db, Some(user));
    let events_repo = EventsRepository::new(&state.db, Some(user));

    let (metrics, workout, events) = tokio::try_join!(
        metrics_repo.get_by_date(date),
        workouts.get_or_create_for_date(date),
        events_repo.get_overlapping(date, date),
    )?;
    let exercises = workouts.list_exercises(&workout.id).await?;

    Ok(DayView {
        date,
        weight_display: metrics
            .as_ref()
            .and_then(|m| m.weight_grams)
            .map(format_kg),
        metrics,
        workout,
        exercises: exercises.into_iter().map(ExerciseView::from).collect(),
        events,
    })
}

// ─── Metrics ─────────────────────────────────────────────────

/// Metrics form input. Weight is decimal kilogram text such as `72,5`.
#[derive(Debug, Default, Deserialize)]
pub struct MetricsInput {
    pub steps: Option<u32>,
    pub calories: Option<u32>,
    pub weight: Option<String>,
    pub note: Option<String>,
}

impl MetricsInput {
    /// Blank text fields are treated as absent.
    pub fn into_fields(self) -> Result<MetricsFields> {
        let weight_grams = match self.weight.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(parse_kg(text)?),
        };
        let note = self
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(MetricsFields {
            steps: self.steps,
            calories: self.calories,
            weight_grams,
            note,
        })
    }
}

async fn put_metrics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    Json(input): Json<MetricsInput>,
) -> Result<Json<DailyMetrics>> {
    let date = parse_iso_date(&date)?;
    let fields = input.into_fields()?;
    let record = MetricsRepository::new(&state.db, Some(&user))
        .upsert_by_date(date, &fields)
        .await?;
    Ok(Json(record))
}

// ─── Exercises ───────────────────────────────────────────────

async fn add_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    Json(fields): Json<NewExercise>,
) -> Result<(StatusCode, Json<ExerciseView>)> {
    let date = parse_iso_date(&date)?;
    let workouts = WorkoutRepository::new(&state.db, Some(&user));
    let workout = workouts.get_or_create_for_date(date).await?;
    let exercise = workouts.add_exercise(&workout.id, &fields).await?;
    Ok((StatusCode::CREATED, Json(exercise.into())))
}

async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    WorkoutRepository::new(&state.db, Some(&user))
        .delete_exercise(&id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_metrics_input_parses_decimal_weight() {
        let fields = MetricsInput {
            steps: Some(1000),
            weight: Some(" 72,5 ".to_string()),
            note: Some("   ".to_string()),
            ..Default::default()
        }
        .into_fields()
        .unwrap();

        assert_eq!(fields.steps, Some(1000));
        assert_eq!(fields.weight_grams, Some(72_500));
        assert_eq!(fields.note, None);
    }

    #[test]
    fn test_metrics_input_blank_weight_is_absent() {
        let fields = MetricsInput {
            weight: Some(String::new()),
            ..Default::default()
        }
        .into_fields()
        .unwrap();
        assert_eq!(fields.weight_grams, None);
    }

    #[test]
    fn test_metrics_input_rejects_bad_weight() {
        let err = MetricsInput {
            weight: Some("seventy".to_string()),
            ..Default::default()
        }
        .into_fields()
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
