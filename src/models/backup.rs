// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Full-journal backup document.
//!
//! Shape: `{ daily_metrics: [..], workouts: [..], workout_exercises: [..],
//! exercise_catalog: [..], events: [..], export_date: "<RFC3339>" }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::models::{CatalogExercise, DailyMetrics, Event, Workout, WorkoutExercise};
use crate::time_utils::format_utc_rfc3339;

/// Row sets of every backed-up table.
///
/// All five tables are required when deserializing; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupTables {
    pub daily_metrics: Vec<DailyMetrics>,
    pub workouts: Vec<Workout>,
    pub workout_exercises: Vec<WorkoutExercise>,
    pub exercise_catalog: Vec<CatalogExercise>,
    pub events: Vec<Event>,
}

impl BackupTables {
    /// Total number of rows across all tables.
    pub fn row_count(&self) -> usize {
        self.daily_metrics.len()
            + self.workouts.len()
            + self.workout_exercises.len()
            + self.exercise_catalog.len()
            + self.events.len()
    }

    /// Sort every table into its canonical order so row sets compare equal
    /// regardless of store iteration order.
    pub fn sort(&mut self) {
        self.daily_metrics.sort_by(|a, b| a.id.cmp(&b.id));
        self.workouts.sort_by(|a, b| a.id.cmp(&b.id));
        self.workout_exercises.sort_by(|a, b| a.id.cmp(&b.id));
        self.exercise_catalog.sort_by(|a, b| a.id.cmp(&b.id));
        self.events.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

/// Backup document as written by the JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    #[serde(flatten)]
    pub tables: BackupTables,
    /// Absent in hand-written documents; always set by the export.
    #[serde(default, serialize_with = "serialize_export_date")]
    pub export_date: Option<DateTime<Utc>>,
}

fn serialize_export_date<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(date) => serializer.serialize_some(&format_utc_rfc3339(*date)),
        None => serializer.serialize_none(),
    }
}
