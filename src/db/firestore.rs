// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Daily metrics (one document per owner and date)
//! - Workouts and their ordered exercises
//! - The shared exercise catalog
//! - Date-range events
//! - Whole-journal export and atomic restore
//!
//! Uniqueness keys are enforced by derived document ids written with
//! insert-if-absent (Firestore `create`), so concurrent writers converge.

use crate::db::collections;
use crate::error::AppError;
use crate::models::catalog::sort_catalog;
use crate::models::{
    BackupTables, CatalogExercise, DailyMetrics, Event, MetricsFields, NewCatalogExercise,
    NewEvent, NewExercise, Workout, WorkoutExercise,
};
use crate::time_utils::iso_date;
use chrono::{DateTime, NaiveDate, Utc};
use firestore::errors::FirestoreError;
use firestore::FirestoreQueryDirection;
use std::collections::HashSet;

/// Attempts at claiming the next exercise position before giving up.
const MAX_POSITION_ATTEMPTS: usize = 5;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

fn db_error(e: FirestoreError) -> AppError {
    AppError::Database(e.to_string())
}

fn is_already_exists(e: &FirestoreError) -> bool {
    matches!(e, FirestoreError::DataConflictError(_))
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── Daily Metrics ───────────────────────────────────────────

    /// Get the metrics document for (owner, date).
    pub async fn get_metrics(
        &self,
        owner_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyMetrics>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::DAILY_METRICS)
            .obj()
            .one(&DailyMetrics::derived_id(owner_id, date))
            .await
            .map_err(db_error)
    }

    /// Insert or overwrite the metrics for (owner, date).
    ///
    /// The document id is derived from the conflict key, so repeated calls
    /// update one document. The original `created_at` is kept.
    pub async fn upsert_metrics(
        &self,
        owner_id: &str,
        date: NaiveDate,
        fields: &MetricsFields,
        now: DateTime<Utc>,
    ) -> Result<DailyMetrics, AppError> {
        let record = match self.get_metrics(owner_id, date).await? {
            Some(mut existing) => {
                existing.apply(fields, now);
                existing
            }
            None => DailyMetrics::new(owner_id, date, fields, now),
        };

        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::DAILY_METRICS)
            .document_id(&record.id)
            .object(&record)
            .execute()
            .await
            .map_err(db_error)?;

        Ok(record)
    }

    /// Metrics for an inclusive date range, ascending by date.
    pub async fn get_metrics_range(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyMetrics>, AppError> {
        let owner_id = owner_id.to_string();
        let from = iso_date(from);
        let to = iso_date(to);

        self.client
            .fluent()
            .select()
            .from(collections::DAILY_METRICS)
            .filter(move |q| {
                q.for_all([
                    q.field("owner_id").eq(owner_id.clone()),
                    q.field("date").greater_than_or_equal(from.clone()),
                    q.field("date").less_than_or_equal(to.clone()),
                ])
            })
            .order_by([("date", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(db_error)
    }

    // ─── Workouts ────────────────────────────────────────────────

    async fn earliest_workout(
        &self,
        owner_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Workout>, AppError> {
        let owner_id = owner_id.to_string();
        let date = iso_date(date);

        let workouts: Vec<Workout> = self
            .client
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(move |q| {
                q.for_all([
                    q.field("owner_id").eq(owner_id.clone()),
                    q.field("date").eq(date.clone()),
                ])
            })
            .order_by([("created_at", FirestoreQueryDirection::Ascending)])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(db_error)?;

        Ok(workouts.into_iter().next())
    }

    /// Return the earliest workout for (owner, date), creating one if none exists.
    ///
    /// A created workout uses the id derived from (owner, date). If a concurrent
    /// caller created it first, the insert conflicts and the winner is re-read.
    pub async fn get_or_create_workout(
        &self,
        owner_id: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Workout, AppError> {
        if let Some(existing) = self.earliest_workout(owner_id, date).await? {
            return Ok(existing);
        }

        let workout = Workout::new_for_date(owner_id, date, now);
        let created: Result<Workout, FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collections::WORKOUTS)
            .document_id(&workout.id)
            .object(&workout)
            .execute()
            .await;

        match created {
            Ok(created) => {
                tracing::debug!(owner_id, workout_id = %created.id, "Created workout");
                Ok(created)
            }
            Err(e) if is_already_exists(&e) => {
                tracing::debug!(owner_id, date = %date, "Workout created concurrently, re-reading");
                self.earliest_workout(owner_id, date)
                    .await?
                    .ok_or_else(|| {
                        AppError::Conflict(format!("Workout for {} vanished after conflict", date))
                    })
            }
            Err(e) => Err(db_error(e)),
        }
    }

    async fn get_owned_workout(
        &self,
        owner_id: &str,
        workout_id: &str,
    ) -> Result<Workout, AppError> {
        let workout: Option<Workout> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::WORKOUTS)
            .obj()
            .one(workout_id)
            .await
            .map_err(db_error)?;

        workout
            .filter(|w| w.owner_id == owner_id)
            .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", workout_id)))
    }

    /// Exercises of one workout, ascending by position.
    pub async fn list_exercises(
        &self,
        owner_id: &str,
        workout_id: &str,
    ) -> Result<Vec<WorkoutExercise>, AppError> {
        let owner_id = owner_id.to_string();
        let workout_id = workout_id.to_string();

        self.client
            .fluent()
            .select()
            .from(collections::WORKOUT_EXERCISES)
            .filter(move |q| {
                q.for_all([
                    q.field("owner_id").eq(owner_id.clone()),
                    q.field("workout_id").eq(workout_id.clone()),
                ])
            })
            .order_by([("position", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(db_error)
    }

    async fn next_exercise_position(
        &self,
        owner_id: &str,
        workout_id: &str,
    ) -> Result<u32, AppError> {
        let owner_id = owner_id.to_string();
        let workout_id = workout_id.to_string();

        let last: Vec<WorkoutExercise> = self
            .client
            .fluent()
            .select()
            .from(collections::WORKOUT_EXERCISES)
            .filter(move |q| {
                q.for_all([
                    q.field("owner_id").eq(owner_id.clone()),
                    q.field("workout_id").eq(workout_id.clone()),
                ])
            })
            .order_by([("position", FirestoreQueryDirection::Descending)])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(db_error)?;

        crate::models::workout::next_position(&last)
    }

    /// Append an exercise at position max + 1 (0 for the first one).
    ///
    /// The (workout, position) pair is claimed with an insert-if-absent on
    /// the derived id; on conflict the position is recomputed and retried.
    pub async fn add_exercise(
        &self,
        owner_id: &str,
        workout_id: &str,
        fields: &NewExercise,
        now: DateTime<Utc>,
    ) -> Result<WorkoutExercise, AppError> {
        let workout = self.get_owned_workout(owner_id, workout_id).await?;

        for attempt in 1..=MAX_POSITION_ATTEMPTS {
            let position = self.next_exercise_position(owner_id, workout_id).await?;
            let exercise = WorkoutExercise::new(&workout, position, fields, now);

            let created: Result<WorkoutExercise, FirestoreError> = self
                .client
                .fluent()
                .insert()
                .into(collections::WORKOUT_EXERCISES)
                .document_id(&exercise.id)
                .object(&exercise)
                .execute()
                .await;

            match created {
                Ok(created) => return Ok(created),
                Err(e) if is_already_exists(&e) => {
                    tracing::debug!(
                        workout_id,
                        position,
                        attempt,
                        "Exercise position taken, retrying"
                    );
                }
                Err(e) => return Err(db_error(e)),
            }
        }

        Err(AppError::Conflict(format!(
            "Could not claim an exercise position in workout {}",
            workout_id
        )))
    }

    /// Delete one exercise if it belongs to the owner. Returns whether it existed.
    pub async fn delete_exercise(&self, owner_id: &str, id: &str) -> Result<bool, AppError> {
        let existing: Option<WorkoutExercise> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::WORKOUT_EXERCISES)
            .obj()
            .one(id)
            .await
            .map_err(db_error)?;

        if !existing.is_some_and(|e| e.owner_id == owner_id) {
            return Ok(false);
        }

        self.client
            .fluent()
            .delete()
            .from(collections::WORKOUT_EXERCISES)
            .document_id(id)
            .execute()
            .await
            .map_err(db_error)?;
        Ok(true)
    }

    // ─── Exercise Catalog ────────────────────────────────────────

    pub async fn list_catalog(&self) -> Result<Vec<CatalogExercise>, AppError> {
        let mut entries: Vec<CatalogExercise> = self
            .client
            .fluent()
            .select()
            .from(collections::EXERCISE_CATALOG)
            .obj()
            .query()
            .await
            .map_err(db_error)?;
        // Case-insensitive order is not expressible as a Firestore order_by
        sort_catalog(&mut entries);
        Ok(entries)
    }

    pub async fn add_catalog_exercise(
        &self,
        fields: &NewCatalogExercise,
        now: DateTime<Utc>,
    ) -> Result<CatalogExercise, AppError> {
        let entry = CatalogExercise::new(fields, now);
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::EXERCISE_CATALOG)
            .document_id(&entry.id)
            .object(&entry)
            .execute()
            .await
            .map_err(db_error)?;
        Ok(entry)
    }

    // ─── Events ──────────────────────────────────────────────────

    /// Events with `start_date <= to AND end_date >= from`, ascending by start.
    ///
    /// Only the start bound is pushed into the query; the end bound is applied
    /// here to avoid a second inequality field.
    pub async fn get_events_overlapping(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Event>, AppError> {
        let owner = owner_id.to_string();
        let to_key = iso_date(to);

        let events: Vec<Event> = self
            .client
            .fluent()
            .select()
            .from(collections::EVENTS)
            .filter(move |q| {
                q.for_all([
                    q.field("owner_id").eq(owner.clone()),
                    q.field("start_date").less_than_or_equal(to_key.clone()),
                ])
            })
            .order_by([
                ("start_date", FirestoreQueryDirection::Ascending),
                ("created_at", FirestoreQueryDirection::Ascending),
            ])
            .obj()
            .query()
            .await
            .map_err(db_error)?;

        Ok(events
            .into_iter()
            .filter(|e| e.overlaps(from, to))
            .collect())
    }

    pub async fn create_event(
        &self,
        owner_id: &str,
        fields: &NewEvent,
        now: DateTime<Utc>,
    ) -> Result<Event, AppError> {
        let event = Event::new(owner_id, fields, now);
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::EVENTS)
            .document_id(&event.id)
            .object(&event)
            .execute()
            .await
            .map_err(db_error)?;
        Ok(event)
    }

    pub async fn delete_event(&self, owner_id: &str, id: &str) -> Result<bool, AppError> {
        let existing: Option<Event> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::EVENTS)
            .obj()
            .one(id)
            .await
            .map_err(db_error)?;

        if !existing.is_some_and(|e| e.owner_id == owner_id) {
            return Ok(false);
        }

        self.client
            .fluent()
            .delete()
            .from(collections::EVENTS)
            .document_id(id)
            .execute()
            .await
            .map_err(db_error)?;
        Ok(true)
    }

    // ─── Backup ──────────────────────────────────────────────────

    async fn owned_documents<T>(&self, collection: &str, owner_id: &str) -> Result<Vec<T>, AppError>
    where
        for<'de> T: serde::Deserialize<'de> + Send,
    {
        let owner_id = owner_id.to_string();
        self.client
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field("owner_id").eq(owner_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(db_error)
    }

    /// Every row owned by `owner_id` plus the shared catalog.
    pub async fn export_tables(&self, owner_id: &str) -> Result<BackupTables, AppError> {
        let (daily_metrics, workouts, workout_exercises, events, exercise_catalog) =
            futures_util::future::try_join5(
                self.owned_documents::<DailyMetrics>(collections::DAILY_METRICS, owner_id),
                self.owned_documents::<Workout>(collections::WORKOUTS, owner_id),
                self.owned_documents::<WorkoutExercise>(collections::WORKOUT_EXERCISES, owner_id),
                self.owned_documents::<Event>(collections::EVENTS, owner_id),
                self.list_catalog(),
            )
            .await?;

        let mut tables = BackupTables {
            daily_metrics,
            workouts,
            workout_exercises,
            exercise_catalog,
            events,
        };
        tables.sort();
        Ok(tables)
    }

    pub async fn foreign_event_ids(
        &self,
        owner_id: &str,
        ids: &[String],
    ) -> Result<HashSet<String>, AppError> {
        let found: Vec<Option<Event>> =
            futures_util::future::try_join_all(ids.iter().map(|id| async move {
                self.client
                    .fluent()
                    .select()
                    .by_id_in(collections::EVENTS)
                    .obj()
                    .one(id)
                    .await
                    .map_err(db_error)
            }))
            .await?;

        Ok(found
            .into_iter()
            .flatten()
            .filter(|e| e.owner_id != owner_id)
            .map(|e| e.id)
            .collect())
    }

    /// Replace the owner's rows with `backup` in a single transaction.
    ///
    /// Existing owner documents not present in the backup are deleted; every
    /// backup row is written. A document is written at most once per commit.
    ///
    /// The owner's current documents are listed by queries, which do not take
    /// part in the transaction. A document the owner creates after that listing
    /// and before the commit is neither deleted nor overwritten.
    pub async fn restore_tables(
        &self,
        owner_id: &str,
        backup: &BackupTables,
    ) -> Result<(), AppError> {
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let existing = match self.export_tables(owner_id).await {
            Ok(existing) => existing,
            Err(e) => {
                let _ = transaction.rollback().await;
                return Err(e);
            }
        };

        let mut deletions = 0usize;

        let stale = stale_ids(&existing.daily_metrics, &backup.daily_metrics, |m| &m.id);
        deletions += self.delete_in_transaction(collections::DAILY_METRICS, &stale, &mut transaction)?;
        let stale = stale_ids(&existing.workouts, &backup.workouts, |w| &w.id);
        deletions += self.delete_in_transaction(collections::WORKOUTS, &stale, &mut transaction)?;
        let stale = stale_ids(&existing.workout_exercises, &backup.workout_exercises, |e| &e.id);
        deletions +=
            self.delete_in_transaction(collections::WORKOUT_EXERCISES, &stale, &mut transaction)?;
        let stale = stale_ids(&existing.events, &backup.events, |e| &e.id);
        deletions += self.delete_in_transaction(collections::EVENTS, &stale, &mut transaction)?;

        for row in &backup.daily_metrics {
            self.write_in_transaction(collections::DAILY_METRICS, &row.id, row, &mut transaction)?;
        }
        for row in &backup.workouts {
            self.write_in_transaction(collections::WORKOUTS, &row.id, row, &mut transaction)?;
        }
        for row in &backup.workout_exercises {
            self.write_in_transaction(collections::WORKOUT_EXERCISES, &row.id, row, &mut transaction)?;
        }
        for row in &backup.exercise_catalog {
            self.write_in_transaction(collections::EXERCISE_CATALOG, &row.id, row, &mut transaction)?;
        }
        for row in &backup.events {
            self.write_in_transaction(collections::EVENTS, &row.id, row, &mut transaction)?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Restore commit failed: {}", e)))?;

        tracing::info!(
            owner_id,
            deleted = deletions,
            written = backup.row_count(),
            "Journal restored atomically"
        );

        Ok(())
    }

    fn delete_in_transaction(
        &self,
        collection: &str,
        ids: &[String],
        transaction: &mut firestore::FirestoreTransaction<'_>,
    ) -> Result<usize, AppError> {
        for id in ids {
            self.client
                .fluent()
                .delete()
                .from(collection)
                .document_id(id)
                .add_to_transaction(transaction)
                .map_err(|e| {
                    AppError::Database(format!(
                        "Failed to add deletion to transaction for {}: {}",
                        collection, e
                    ))
                })?;
        }
        Ok(ids.len())
    }

    fn write_in_transaction<T>(
        &self,
        collection: &str,
        id: &str,
        row: &T,
        transaction: &mut firestore::FirestoreTransaction<'_>,
    ) -> Result<(), AppError>
    where
        T: serde::Serialize + for<'de> serde::Deserialize<'de> + Sync + Send,
    {
        self.client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(row)
            .add_to_transaction(transaction)
            .map_err(|e| {
                AppError::Database(format!(
                    "Failed to add {} write to transaction: {}",
                    collection, e
                ))
            })?;
        Ok(())
    }
}

/// Ids present in `existing` but not in `replacement`.
fn stale_ids<T>(existing: &[T], replacement: &[T], id_of: impl Fn(&T) -> &String) -> Vec<String> {
    let keep: HashSet<&String> = replacement.iter().map(&id_of).collect();
    existing
        .iter()
        .map(&id_of)
        .filter(|id| !keep.contains(id))
        .cloned()
        .collect()
}
