// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise catalog repository.

use chrono::Utc;
use validator::Validate;

use super::require_owner;
use crate::db::JournalDb;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{CatalogExercise, NewCatalogExercise};

pub struct CatalogRepository<'a> {
    db: &'a JournalDb,
    session: Option<&'a AuthUser>,
}

impl<'a> CatalogRepository<'a> {
    pub fn new(db: &'a JournalDb, session: Option<&'a AuthUser>) -> Self {
        Self { db, session }
    }

    /// All catalog entries, by name.
    pub async fn list(&self) -> Result<Vec<CatalogExercise>> {
        self.db.list_catalog().await
    }

    pub async fn add(&self, fields: &NewCatalogExercise) -> Result<CatalogExercise> {
        let owner_id = require_owner(self.session)?;
        fields.validate()?;

        let entry = self.db.add_catalog_exercise(fields, Utc::now()).await?;
        tracing::info!(owner_id, entry_id = %entry.id, name = %entry.name, "Catalog entry added");
        Ok(entry)
    }
}
