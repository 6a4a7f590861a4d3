// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backup repository: export the owner's tables and restore them.

use chrono::{NaiveDate, Utc};

use super::{check_range, require_owner};
use crate::db::JournalDb;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Backup, BackupTables};
use crate::services::{export, import};

pub struct BackupRepository<'a> {
    db: &'a JournalDb,
    session: Option<&'a AuthUser>,
}

/// Row counts of a completed restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RestoreSummary {
    pub daily_metrics: usize,
    pub workouts: usize,
    pub workout_exercises: usize,
    pub exercise_catalog: usize,
    pub events: usize,
}

impl From<&BackupTables> for RestoreSummary {
    fn from(tables: &BackupTables) -> Self {
        Self {
            daily_metrics: tables.daily_metrics.len(),
            workouts: tables.workouts.len(),
            workout_exercises: tables.workout_exercises.len(),
            exercise_catalog: tables.exercise_catalog.len(),
            events: tables.events.len(),
        }
    }
}

impl<'a> BackupRepository<'a> {
    pub fn new(db: &'a JournalDb, session: Option<&'a AuthUser>) -> Self {
        Self { db, session }
    }

    /// The owner's rows plus the shared catalog, stamped with the export time.
    pub async fn export(&self) -> Result<Backup> {
        let owner_id = require_owner(self.session)?;
        let tables = self.db.export_tables(owner_id).await?;
        tracing::info!(owner_id, rows = tables.row_count(), "Backup exported");
        Ok(export::build_backup(tables, Utc::now()))
    }

    /// Semicolon-delimited metrics report for `[from, to]`.
    pub async fn metrics_csv(&self, from: NaiveDate, to: NaiveDate) -> Result<String> {
        let owner_id = require_owner(self.session)?;
        check_range(from, to)?;
        let rows = self.db.get_metrics_range(owner_id, from, to).await?;
        Ok(export::metrics_csv(from, to, &rows))
    }

    /// Replace the owner's rows with those of a backup document.
    ///
    /// The document is parsed and validated in full first; the store is only
    /// touched once it is known to be importable.
    pub async fn restore(&self, document: &[u8]) -> Result<RestoreSummary> {
        let owner_id = require_owner(self.session)?;
        let backup = import::parse_backup(document)?;

        let own_event_ids: Vec<String> = backup
            .tables
            .events
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .map(|e| e.id.clone())
            .collect();
        let foreign_event_ids = self.db.foreign_event_ids(owner_id, &own_event_ids).await?;

        let tables = import::prepare_restore(owner_id, backup, &foreign_event_ids)?;

        self.db.restore_tables(owner_id, &tables).await?;

        let summary = RestoreSummary::from(&tables);
        tracing::info!(owner_id, ?summary, "Backup restored");
        Ok(summary)
    }
}
