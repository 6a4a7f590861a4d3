// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reusable exercise catalog (shared, not owner-scoped).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CatalogExercise {
    pub id: String,
    pub name: String,
    /// Reference video link
    pub video_url: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for adding a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCatalogExercise {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(url, length(max = 2048), custom(function = "http_scheme"))]
    pub video_url: Option<String>,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn http_scheme(url: &str) -> Result<(), ValidationError> {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("http_url"))
    }
}

impl CatalogExercise {
    pub fn new(fields: &NewCatalogExercise, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: fields.name.trim().to_string(),
            video_url: fields.video_url.clone(),
            note: fields.note.clone(),
            created_at: now,
        }
    }

    /// The user-editable part of this row, for re-validation.
    pub fn fields(&self) -> NewCatalogExercise {
        NewCatalogExercise {
            name: self.name.clone(),
            video_url: self.video_url.clone(),
            note: self.note.clone(),
        }
    }
}

/// Catalog display order: name (case-insensitive), then creation time.
pub fn sort_catalog(entries: &mut [CatalogExercise]) {
    entries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
