// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Events repository (date-range annotations).

use chrono::{NaiveDate, Utc};
use validator::Validate;

use super::require_owner;
use crate::db::JournalDb;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Event, NewEvent};

pub struct EventsRepository<'a> {
    db: &'a JournalDb,
    session: Option<&'a AuthUser>,
}

impl<'a> EventsRepository<'a> {
    pub fn new(db: &'a JournalDb, session: Option<&'a AuthUser>) -> Self {
        Self { db, session }
    }

    /// Events with `start <= to AND end >= from`, ascending by start date.
    pub async fn get_overlapping(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Event>> {
        let owner_id = require_owner(self.session)?;
        if from > to {
            return Err(AppError::BadRequest(format!(
                "Range start {} is after end {}",
                from, to
            )));
        }
        self.db.get_events_overlapping(owner_id, from, to).await
    }

    /// Create an event. Overlapping events are allowed.
    pub async fn create(&self, fields: &NewEvent) -> Result<Event> {
        let owner_id = require_owner(self.session)?;
        fields.validate()?;

        let event = self.db.create_event(owner_id, fields, Utc::now()).await?;
        tracing::info!(
            owner_id,
            event_id = %event.id,
            start = %event.start_date,
            end = %event.end_date,
            "Event created"
        );
        Ok(event)
    }

    /// Remove an event by id; removing a missing event is not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let owner_id = require_owner(self.session)?;
        let deleted = self.db.delete_event(owner_id, id).await?;
        tracing::info!(owner_id, event_id = id, deleted, "Event delete requested");
        Ok(())
    }
}
