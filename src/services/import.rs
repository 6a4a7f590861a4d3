// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backup restore: parse, validate, normalize.
//!
//! Nothing here touches the store. A document is fully checked and rewritten
//! for the importing owner before the atomic replace in
//! [`JournalDb::restore_tables`](crate::db::JournalDb::restore_tables), so a
//! document that cannot be imported never destroys existing rows.

use std::collections::{HashMap, HashSet};

use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::workout::MAX_EXERCISE_POSITION;
use crate::models::{Backup, BackupTables, DailyMetrics, MetricsFields, Workout, WorkoutExercise};

/// Parse a backup document. All five tables must be present.
pub fn parse_backup(bytes: &[u8]) -> Result<Backup> {
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid backup document: {}", e)))
}

fn invalid(message: String) -> AppError {
    AppError::BadRequest(format!("Invalid backup document: {}", message))
}

/// Validate `backup` and rewrite it so every owned row belongs to `owner_id`.
///
/// Row ids in the document are not trusted:
/// - metrics ids are re-derived from (owner, date); duplicate dates are rejected
/// - workout ids are re-derived from (owner, date); a second workout on the
///   same date gets a fresh id
/// - exercises must reference a workout in the document; ids are re-derived
///   from (workout, position) and duplicate positions are rejected
/// - events keep their id only when it is the importer's own and not in
///   `foreign_event_ids`; every other event gets a fresh id
/// - catalog ids must be unique
///
/// Every row must pass the same checks as the matching create payload.
pub fn prepare_restore(
    owner_id: &str,
    backup: Backup,
    foreign_event_ids: &HashSet<String>,
) -> Result<BackupTables> {
    let BackupTables {
        daily_metrics,
        workouts,
        workout_exercises,
        exercise_catalog,
        events,
    } = backup.tables;

    // Metrics
    let mut seen_dates = HashSet::new();
    let mut metrics_out = Vec::with_capacity(daily_metrics.len());
    for mut row in daily_metrics {
        if !seen_dates.insert(row.date) {
            return Err(invalid(format!("duplicate metrics for {}", row.date)));
        }
        MetricsFields {
            steps: row.steps,
            calories: row.calories,
            weight_grams: row.weight_grams,
            note: row.note.clone(),
        }
        .validate()
        .map_err(|e| invalid(format!("metrics for {}: {}", row.date, e)))?;

        row.id = DailyMetrics::derived_id(owner_id, row.date);
        row.owner_id = owner_id.to_string();
        metrics_out.push(row);
    }

    // Workouts
    let mut workout_ids: HashMap<String, String> = HashMap::new();
    let mut used_ids = HashSet::new();
    let mut workouts_out = Vec::with_capacity(workouts.len());
    for mut row in workouts {
        let derived = Workout::derived_id(owner_id, row.date);
        let new_id = if used_ids.contains(&derived) {
            uuid::Uuid::new_v4().to_string()
        } else {
            derived
        };

        if workout_ids.insert(row.id.clone(), new_id.clone()).is_some() {
            return Err(invalid(format!("duplicate workout id {}", row.id)));
        }
        used_ids.insert(new_id.clone());

        row.id = new_id;
        row.owner_id = owner_id.to_string();
        workouts_out.push(row);
    }

    // Exercises
    let mut seen_positions = HashSet::new();
    let mut exercises_out = Vec::with_capacity(workout_exercises.len());
    for mut row in workout_exercises {
        let workout_id = workout_ids.get(&row.workout_id).ok_or_else(|| {
            invalid(format!(
                "exercise {} references unknown workout {}",
                row.id, row.workout_id
            ))
        })?;
        row.fields()
            .validate()
            .map_err(|e| invalid(format!("exercise {}: {}", row.id, e)))?;
        if row.position > MAX_EXERCISE_POSITION {
            return Err(invalid(format!(
                "exercise {} position {} is above {}",
                row.id, row.position, MAX_EXERCISE_POSITION
            )));
        }
        if !seen_positions.insert((workout_id.clone(), row.position)) {
            return Err(invalid(format!(
                "duplicate position {} in workout {}",
                row.position, row.workout_id
            )));
        }

        row.workout_id = workout_id.clone();
        row.id = WorkoutExercise::derived_id(workout_id, row.position);
        row.owner_id = owner_id.to_string();
        exercises_out.push(row);
    }

    // Events
    let mut event_ids = HashSet::new();
    let mut events_out = Vec::with_capacity(events.len());
    for mut row in events {
        row.fields()
            .validate()
            .map_err(|e| invalid(format!("event {}: {}", row.id, e)))?;
        if row.owner_id != owner_id || foreign_event_ids.contains(&row.id) {
            row.id = uuid::Uuid::new_v4().to_string();
            row.owner_id = owner_id.to_string();
        }
        if !event_ids.insert(row.id.clone()) {
            return Err(invalid(format!("duplicate event id {}", row.id)));
        }
        events_out.push(row);
    }

    // Catalog
    let mut catalog_ids = HashSet::new();
    for row in &exercise_catalog {
        if !catalog_ids.insert(row.id.as_str()) {
            return Err(invalid(format!("duplicate catalog id {}", row.id)));
        }
        row.fields()
            .validate()
            .map_err(|e| invalid(format!("catalog entry {}: {}", row.id, e)))?;
    }

    let mut tables = BackupTables {
        daily_metrics: metrics_out,
        workouts: workouts_out,
        workout_exercises: exercises_out,
        exercise_catalog,
        events: events_out,
    };
    tables.sort();
    Ok(tables)
}
