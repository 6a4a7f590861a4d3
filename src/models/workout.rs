// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout sessions and their ordered exercises.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::error::AppError;
use crate::time_utils::iso_date;

/// Highest exercise position a workout may hold.
pub const MAX_EXERCISE_POSITION: u32 = 10_000;

/// A workout session on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Workout {
    pub id: String,
    pub owner_id: String,
    pub date: NaiveDate,
    pub title: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Workout {
    /// Id used when a workout is created lazily for (owner, date).
    pub fn derived_id(owner_id: &str, date: NaiveDate) -> String {
        format!("{}_{}", urlencoding::encode(owner_id), iso_date(date))
    }

    /// Default workout created on first access to a date.
    pub fn new_for_date(owner_id: &str, date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id: Self::derived_id(owner_id, date),
            owner_id: owner_id.to_string(),
            date,
            title: format!("Workout {}", iso_date(date)),
            note: None,
            created_at: now,
        }
    }
}

/// How an exercise was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Load {
    /// Body weight only
    BodyWeight,
    /// Body weight plus an added load (vest, belt)
    BodyWeightPlus { grams: u32 },
    /// External fixed weight (dumbbell, bar)
    Fixed { grams: u32 },
    /// Anything else, described literally ("red band")
    Text { text: String },
}

impl Load {
    /// Short human-readable description, masses in kilograms.
    pub fn describe(&self) -> String {
        match self {
            Load::BodyWeight => "BW".to_string(),
            Load::BodyWeightPlus { grams } => format!("BW + {} kg", crate::units::format_kg(*grams)),
            Load::Fixed { grams } => format!("{} kg", crate::units::format_kg(*grams)),
            Load::Text { text } => text.clone(),
        }
    }
}

/// One exercise line inside a workout.
///
/// `position` orders lines within the workout. Positions are never
/// renumbered, so gaps after deletions are expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutExercise {
    /// Document id, `{workout_id}_{position}`
    pub id: String,
    pub workout_id: String,
    pub owner_id: String,
    pub name: String,
    pub load: Load,
    pub reps: Option<u32>,
    pub comment: Option<String>,
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

impl WorkoutExercise {
    /// Derived id for the (workout, position) uniqueness key.
    pub fn derived_id(workout_id: &str, position: u32) -> String {
        format!("{}_{}", urlencoding::encode(workout_id), position)
    }

    pub fn new(
        workout: &Workout,
        position: u32,
        fields: &NewExercise,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Self::derived_id(&workout.id, position),
            workout_id: workout.id.clone(),
            owner_id: workout.owner_id.clone(),
            name: fields.name.trim().to_string(),
            load: fields.load.clone(),
            reps: fields.reps,
            comment: fields.comment.clone(),
            position,
            created_at: now,
        }
    }

    /// The user-editable part of this row, for re-validation.
    pub fn fields(&self) -> NewExercise {
        NewExercise {
            name: self.name.clone(),
            load: self.load.clone(),
            reps: self.reps,
            comment: self.comment.clone(),
        }
    }
}

/// Next position after the given existing ones: max + 1, or 0 when empty.
///
/// Fails with `Conflict` once the workout has reached [`MAX_EXERCISE_POSITION`].
pub fn next_position<'a>(
    existing: impl IntoIterator<Item = &'a WorkoutExercise>,
) -> Result<u32, AppError> {
    let next = match existing.into_iter().map(|exercise| exercise.position).max() {
        None => Some(0),
        Some(max) => max.checked_add(1),
    };
    next.filter(|position| *position <= MAX_EXERCISE_POSITION)
        .ok_or_else(|| AppError::Conflict("Workout has no free exercise position".to_string()))
}

/// Payload for adding an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewExercise {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "valid_load"))]
    pub load: Load,
    #[validate(range(max = 10_000))]
    pub reps: Option<u32>,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn valid_load(load: &Load) -> Result<(), ValidationError> {
    match load {
        Load::Text { text } if text.trim().is_empty() || text.len() > 100 => {
            Err(ValidationError::new("load_text"))
        }
        Load::BodyWeightPlus { grams } | Load::Fixed { grams } if *grams > 1_000_000 => {
            Err(ValidationError::new("load_grams"))
        }
        _ => Ok(()),
    }
}
