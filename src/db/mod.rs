// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! `JournalDb` fronts the two stores that implement the journal's storage
//! contract: hosted Firestore and an in-process memory store used for local
//! development and tests. Both enforce the same uniqueness keys through
//! derived document ids.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{
    BackupTables, CatalogExercise, DailyMetrics, Event, MetricsFields, NewCatalogExercise,
    NewEvent, NewExercise, Workout, WorkoutExercise,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;

/// Collection names as constants.
pub mod collections {
    pub const DAILY_METRICS: &str = "daily_metrics";
    pub const WORKOUTS: &str = "workouts";
    pub const WORKOUT_EXERCISES: &str = "workout_exercises";
    pub const EXERCISE_CATALOG: &str = "exercise_catalog";
    pub const EVENTS: &str = "events";
}

/// Storage handle shared by all repositories.
#[derive(Clone)]
pub enum JournalDb {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

macro_rules! dispatch {
    ($self:ident, $method:ident($($arg:expr),*)) => {
        match $self {
            JournalDb::Firestore(db) => db.$method($($arg),*).await,
            JournalDb::Memory(db) => db.$method($($arg),*).await,
        }
    };
}

impl JournalDb {
    /// Fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        JournalDb::Memory(MemoryDb::default())
    }

    /// Short backend name for logs.
    pub fn backend_name(&self) -> &'static str {
        match self {
            JournalDb::Firestore(_) => "firestore",
            JournalDb::Memory(_) => "memory",
        }
    }

    // ─── Daily Metrics ───────────────────────────────────────────

    pub async fn get_metrics(
        &self,
        owner_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyMetrics>, AppError> {
        dispatch!(self, get_metrics(owner_id, date))
    }

    pub async fn upsert_metrics(
        &self,
        owner_id: &str,
        date: NaiveDate,
        fields: &MetricsFields,
        now: DateTime<Utc>,
    ) -> Result<DailyMetrics, AppError> {
        dispatch!(self, upsert_metrics(owner_id, date, fields, now))
    }

    pub async fn get_metrics_range(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyMetrics>, AppError> {
        dispatch!(self, get_metrics_range(owner_id, from, to))
    }

    // ─── Workouts ────────────────────────────────────────────────

    pub async fn get_or_create_workout(
        &self,
        owner_id: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Workout, AppError> {
        dispatch!(self, get_or_create_workout(owner_id, date, now))
    }

    pub async fn list_exercises(
        &self,
        owner_id: &str,
        workout_id: &str,
    ) -> Result<Vec<WorkoutExercise>, AppError> {
        dispatch!(self, list_exercises(owner_id, workout_id))
    }

    pub async fn add_exercise(
        &self,
        owner_id: &str,
        workout_id: &str,
        fields: &NewExercise,
        now: DateTime<Utc>,
    ) -> Result<WorkoutExercise, AppError> {
        dispatch!(self, add_exercise(owner_id, workout_id, fields, now))
    }

    pub async fn delete_exercise(&self, owner_id: &str, id: &str) -> Result<bool, AppError> {
        dispatch!(self, delete_exercise(owner_id, id))
    }

    // ─── Exercise Catalog ────────────────────────────────────────

    pub async fn list_catalog(&self) -> Result<Vec<CatalogExercise>, AppError> {
        dispatch!(self, list_catalog())
    }

    pub async fn add_catalog_exercise(
        &self,
        fields: &NewCatalogExercise,
        now: DateTime<Utc>,
    ) -> Result<CatalogExercise, AppError> {
        dispatch!(self, add_catalog_exercise(fields, now))
    }

    // ─── Events ──────────────────────────────────────────────────

    pub async fn get_events_overlapping(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Event>, AppError> {
        dispatch!(self, get_events_overlapping(owner_id, from, to))
    }

    pub async fn create_event(
        &self,
        owner_id: &str,
        fields: &NewEvent,
        now: DateTime<Utc>,
    ) -> Result<Event, AppError> {
        dispatch!(self, create_event(owner_id, fields, now))
    }

    pub async fn delete_event(&self, owner_id: &str, id: &str) -> Result<bool, AppError> {
        dispatch!(self, delete_event(owner_id, id))
    }

    // ─── Backup ──────────────────────────────────────────────────

    /// All rows visible to `owner_id`, in canonical order.
    pub async fn export_tables(&self, owner_id: &str) -> Result<BackupTables, AppError> {
        dispatch!(self, export_tables(owner_id))
    }

    /// Those of `ids` naming an event that belongs to someone other than `owner_id`.
    pub async fn foreign_event_ids(
        &self,
        owner_id: &str,
        ids: &[String],
    ) -> Result<HashSet<String>, AppError> {
        dispatch!(self, foreign_event_ids(owner_id, ids))
    }

    /// Replace the owner's rows with `tables` in one atomic operation.
    ///
    /// `tables` must already be validated and normalized for `owner_id`.
    pub async fn restore_tables(
        &self,
        owner_id: &str,
        tables: &BackupTables,
    ) -> Result<(), AppError> {
        dispatch!(self, restore_tables(owner_id, tables))
    }
}
