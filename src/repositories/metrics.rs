// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily metrics repository.

use chrono::{NaiveDate, Utc};
use validator::Validate;

use super::{check_range, require_owner};
use crate::db::JournalDb;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{DailyMetrics, MetricsFields};

pub struct MetricsRepository<'a> {
    db: &'a JournalDb,
    session: Option<&'a AuthUser>,
}

impl<'a> MetricsRepository<'a> {
    pub fn new(db: &'a JournalDb, session: Option<&'a AuthUser>) -> Self {
        Self { db, session }
    }

    /// The record for `date`, or `None` when nothing was logged.
    pub async fn get_by_date(&self, date: NaiveDate) -> Result<Option<DailyMetrics>> {
        let owner_id = require_owner(self.session)?;
        self.db.get_metrics(owner_id, date).await
    }

    /// Insert or overwrite the record for `date`.
    pub async fn upsert_by_date(
        &self,
        date: NaiveDate,
        fields: &MetricsFields,
    ) -> Result<DailyMetrics> {
        let owner_id = require_owner(self.session)?;
        fields.validate()?;

        let record = self
            .db
            .upsert_metrics(owner_id, date, fields, Utc::now())
            .await?;

        tracing::info!(
            owner_id,
            date = %date,
            steps = ?record.steps,
            calories = ?record.calories,
            weight_grams = ?record.weight_grams,
            "Daily metrics saved"
        );

        Ok(record)
    }

    /// Records in `[from, to]`, ascending by date.
    pub async fn get_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyMetrics>> {
        let owner_id = require_owner(self.session)?;
        check_range(from, to)?;
        self.db.get_metrics_range(owner_id, from, to).await
    }
}
