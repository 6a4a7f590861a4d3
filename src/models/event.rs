// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar events annotating inclusive date ranges (vacations, injuries).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Events are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Event {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    /// First day (inclusive)
    pub start_date: NaiveDate,
    /// Last day (inclusive)
    pub end_date: NaiveDate,
    /// Display color, e.g. `#f59e0b`
    pub color: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(owner_id: &str, fields: &NewEvent, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: fields.title.trim().to_string(),
            start_date: fields.start_date,
            end_date: fields.end_date,
            color: fields.color.clone(),
            note: fields.note.clone(),
            created_at: now,
        }
    }

    /// The user-editable part of this row, for re-validation.
    pub fn fields(&self) -> NewEvent {
        NewEvent {
            title: self.title.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            color: self.color.clone(),
            note: self.note.clone(),
        }
    }

    /// True when the event covers `day`.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// True when `[start, end]` intersects `[from, to]`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start_date <= to && self.end_date >= from
    }
}

/// Payload for creating an event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "valid_range"))]
pub struct NewEvent {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_color")]
    #[validate(length(min = 1, max = 32))]
    pub color: String,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

pub const DEFAULT_EVENT_COLOR: &str = "#f59e0b";

fn default_color() -> String {
    DEFAULT_EVENT_COLOR.to_string()
}

fn valid_range(event: &NewEvent) -> Result<(), ValidationError> {
    if event.start_date > event.end_date {
        return Err(ValidationError::new("start_after_end"));
    }
    Ok(())
}
