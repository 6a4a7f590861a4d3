// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout repository: lazily created sessions and their ordered exercises.

use chrono::{NaiveDate, Utc};
use validator::Validate;

use super::require_owner;
use crate::db::JournalDb;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{NewExercise, Workout, WorkoutExercise};

pub struct WorkoutRepository<'a> {
    db: &'a JournalDb,
    session: Option<&'a AuthUser>,
}

impl<'a> WorkoutRepository<'a> {
    pub fn new(db: &'a JournalDb, session: Option<&'a AuthUser>) -> Self {
        Self { db, session }
    }

    /// The earliest workout on `date`, created on first access.
    pub async fn get_or_create_for_date(&self, date: NaiveDate) -> Result<Workout> {
        let owner_id = require_owner(self.session)?;
        self.db
            .get_or_create_workout(owner_id, date, Utc::now())
            .await
    }

    /// Exercises of a workout, ascending by position.
    pub async fn list_exercises(&self, workout_id: &str) -> Result<Vec<WorkoutExercise>> {
        let owner_id = require_owner(self.session)?;
        self.db.list_exercises(owner_id, workout_id).await
    }

    /// Append an exercise; its position is one past the current maximum.
    pub async fn add_exercise(
        &self,
        workout_id: &str,
        fields: &NewExercise,
    ) -> Result<WorkoutExercise> {
        let owner_id = require_owner(self.session)?;
        fields.validate()?;

        let exercise = self
            .db
            .add_exercise(owner_id, workout_id, fields, Utc::now())
            .await?;

        tracing::info!(
            owner_id,
            workout_id,
            exercise_id = %exercise.id,
            position = exercise.position,
            "Exercise added"
        );

        Ok(exercise)
    }

    /// Remove one exercise. Remaining positions are left as they are.
    pub async fn delete_exercise(&self, id: &str) -> Result<()> {
        let owner_id = require_owner(self.session)?;
        let deleted = self.db.delete_exercise(owner_id, id).await?;
        tracing::info!(owner_id, exercise_id = id, deleted, "Exercise delete requested");
        Ok(())
    }
}
