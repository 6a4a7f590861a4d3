// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store with the same contract as the Firestore backend.
//!
//! All tables sit behind one async `RwLock`, so every operation, including
//! fetch-or-create, next-position assignment and a full restore, observes and
//! updates a consistent snapshot.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::catalog::sort_catalog;
use crate::models::workout::next_position;
use crate::models::{
    BackupTables, CatalogExercise, DailyMetrics, Event, MetricsFields, NewCatalogExercise,
    NewEvent, NewExercise, Workout, WorkoutExercise,
};

#[derive(Debug, Default)]
struct Tables {
    daily_metrics: BTreeMap<String, DailyMetrics>,
    workouts: BTreeMap<String, Workout>,
    workout_exercises: BTreeMap<String, WorkoutExercise>,
    exercise_catalog: BTreeMap<String, CatalogExercise>,
    events: BTreeMap<String, Event>,
}

/// Memory-backed journal store. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDb {
    // ─── Daily Metrics ───────────────────────────────────────────

    pub async fn get_metrics(
        &self,
        owner_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyMetrics>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .daily_metrics
            .get(&DailyMetrics::derived_id(owner_id, date))
            .cloned())
    }

    pub async fn upsert_metrics(
        &self,
        owner_id: &str,
        date: NaiveDate,
        fields: &MetricsFields,
        now: DateTime<Utc>,
    ) -> Result<DailyMetrics, AppError> {
        let mut tables = self.tables.write().await;
        let record = tables
            .daily_metrics
            .entry(DailyMetrics::derived_id(owner_id, date))
            .and_modify(|existing| existing.apply(fields, now))
            .or_insert_with(|| DailyMetrics::new(owner_id, date, fields, now));
        Ok(record.clone())
    }

    pub async fn get_metrics_range(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyMetrics>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<DailyMetrics> = tables
            .daily_metrics
            .values()
            .filter(|m| m.owner_id == owner_id && m.date >= from && m.date <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.date);
        Ok(rows)
    }

    // ─── Workouts ────────────────────────────────────────────────

    pub async fn get_or_create_workout(
        &self,
        owner_id: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Workout, AppError> {
        let mut tables = self.tables.write().await;

        let earliest = tables
            .workouts
            .values()
            .filter(|w| w.owner_id == owner_id && w.date == date)
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        if let Some(workout) = earliest {
            return Ok(workout.clone());
        }

        let workout = Workout::new_for_date(owner_id, date, now);
        tables.workouts.insert(workout.id.clone(), workout.clone());
        Ok(workout)
    }

    pub async fn list_exercises(
        &self,
        owner_id: &str,
        workout_id: &str,
    ) -> Result<Vec<WorkoutExercise>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<WorkoutExercise> = tables
            .workout_exercises
            .values()
            .filter(|e| e.owner_id == owner_id && e.workout_id == workout_id)
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.position);
        Ok(rows)
    }

    pub async fn add_exercise(
        &self,
        owner_id: &str,
        workout_id: &str,
        fields: &NewExercise,
        now: DateTime<Utc>,
    ) -> Result<WorkoutExercise, AppError> {
        let mut tables = self.tables.write().await;

        let workout = tables
            .workouts
            .get(workout_id)
            .filter(|w| w.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", workout_id)))?;

        let position = next_position(
            tables
                .workout_exercises
                .values()
                .filter(|e| e.workout_id == workout_id),
        )?;

        let exercise = WorkoutExercise::new(&workout, position, fields, now);
        tables
            .workout_exercises
            .insert(exercise.id.clone(), exercise.clone());
        Ok(exercise)
    }

    pub async fn delete_exercise(&self, owner_id: &str, id: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .workout_exercises
            .get(id)
            .is_some_and(|e| e.owner_id == owner_id);
        if owned {
            tables.workout_exercises.remove(id);
        }
        Ok(owned)
    }

    // ─── Exercise Catalog ────────────────────────────────────────

    pub async fn list_catalog(&self) -> Result<Vec<CatalogExercise>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<CatalogExercise> = tables.exercise_catalog.values().cloned().collect();
        sort_catalog(&mut rows);
        Ok(rows)
    }

    pub async fn add_catalog_exercise(
        &self,
        fields: &NewCatalogExercise,
        now: DateTime<Utc>,
    ) -> Result<CatalogExercise, AppError> {
        let entry = CatalogExercise::new(fields, now);
        let mut tables = self.tables.write().await;
        tables
            .exercise_catalog
            .insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    // ─── Events ──────────────────────────────────────────────────

    pub async fn get_events_overlapping(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Event>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Event> = tables
            .events
            .values()
            .filter(|e| e.owner_id == owner_id && e.overlaps(from, to))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(rows)
    }

    pub async fn create_event(
        &self,
        owner_id: &str,
        fields: &NewEvent,
        now: DateTime<Utc>,
    ) -> Result<Event, AppError> {
        let event = Event::new(owner_id, fields, now);
        let mut tables = self.tables.write().await;
        tables.events.insert(event.id.clone(), event.clone());
        Ok(event)
    }

    pub async fn delete_event(&self, owner_id: &str, id: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .events
            .get(id)
            .is_some_and(|e| e.owner_id == owner_id);
        if owned {
            tables.events.remove(id);
        }
        Ok(owned)
    }

    // ─── Backup ──────────────────────────────────────────────────

    pub async fn export_tables(&self, owner_id: &str) -> Result<BackupTables, AppError> {
        let tables = self.tables.read().await;
        let mut backup = BackupTables {
            daily_metrics: owned_rows(&tables.daily_metrics, owner_id, |m| &m.owner_id),
            workouts: owned_rows(&tables.workouts, owner_id, |w| &w.owner_id),
            workout_exercises: owned_rows(&tables.workout_exercises, owner_id, |e| &e.owner_id),
            exercise_catalog: tables.exercise_catalog.values().cloned().collect(),
            events: owned_rows(&tables.events, owner_id, |e| &e.owner_id),
        };
        backup.sort();
        Ok(backup)
    }

    pub async fn foreign_event_ids(
        &self,
        owner_id: &str,
        ids: &[String],
    ) -> Result<HashSet<String>, AppError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter(|id| {
                tables
                    .events
                    .get(id.as_str())
                    .is_some_and(|e| e.owner_id != owner_id)
            })
            .cloned()
            .collect())
    }

    pub async fn restore_tables(
        &self,
        owner_id: &str,
        backup: &BackupTables,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;

        tables.daily_metrics.retain(|_, m| m.owner_id != owner_id);
        tables.workouts.retain(|_, w| w.owner_id != owner_id);
        tables.workout_exercises.retain(|_, e| e.owner_id != owner_id);
        tables.events.retain(|_, e| e.owner_id != owner_id);

        for row in &backup.daily_metrics {
            tables.daily_metrics.insert(row.id.clone(), row.clone());
        }
        for row in &backup.workouts {
            tables.workouts.insert(row.id.clone(), row.clone());
        }
        for row in &backup.workout_exercises {
            tables.workout_exercises.insert(row.id.clone(), row.clone());
        }
        for row in &backup.exercise_catalog {
            tables.exercise_catalog.insert(row.id.clone(), row.clone());
        }
        for row in &backup.events {
            tables.events.insert(row.id.clone(), row.clone());
        }

        Ok(())
    }
}

fn owned_rows<T: Clone>(
    table: &BTreeMap<String, T>,
    owner_id: &str,
    owner_of: impl Fn(&T) -> &String,
) -> Vec<T> {
    table
        .values()
        .filter(|row| owner_of(row) == owner_id)
        .cloned()
        .collect()
}
