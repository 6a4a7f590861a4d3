// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily metrics record (steps, calories, weight).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::time_utils::iso_date;

/// One day of biometric readings for one owner.
///
/// At most one record exists per (owner, date); the id is derived from that
/// pair so the store enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyMetrics {
    /// Document id, `{owner}_{date}`
    pub id: String,
    /// Owner identity (session `sub`)
    pub owner_id: String,
    /// Calendar date
    pub date: NaiveDate,
    /// Step count
    pub steps: Option<u32>,
    /// Calories (kcal)
    pub calories: Option<u32>,
    /// Weight in whole grams
    pub weight_grams: Option<u32>,
    /// Free-text note
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of a metrics record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct MetricsFields {
    #[validate(range(max = 200_000))]
    pub steps: Option<u32>,
    #[validate(range(max = 50_000))]
    pub calories: Option<u32>,
    #[validate(range(min = 1_000, max = 500_000))]
    pub weight_grams: Option<u32>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

impl DailyMetrics {
    /// Derived document id for the (owner, date) uniqueness key.
    pub fn derived_id(owner_id: &str, date: NaiveDate) -> String {
        format!("{}_{}", urlencoding::encode(owner_id), iso_date(date))
    }

    /// Build a fresh record.
    pub fn new(owner_id: &str, date: NaiveDate, fields: &MetricsFields, now: DateTime<Utc>) -> Self {
        Self {
            id: Self::derived_id(owner_id, date),
            owner_id: owner_id.to_string(),
            date,
            steps: fields.steps,
            calories: fields.calories,
            weight_grams: fields.weight_grams,
            note: fields.note.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite all writable fields, keeping identity and creation time.
    pub fn apply(&mut self, fields: &MetricsFields, now: DateTime<Utc>) {
        self.steps = fields.steps;
        self.calories = fields.calories;
        self.weight_grams = fields.weight_grams;
        self.note = fields.note.clone();
        self.updated_at = now;
    }
}
