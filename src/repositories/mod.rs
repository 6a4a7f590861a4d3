// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Owner-scoped repositories over [`JournalDb`](crate::db::JournalDb).
//!
//! Each repository borrows the store and the caller's session. Operations
//! that need an owner fail with [`AppError::Unauthorized`] when the session
//! is absent; payloads are validated before they reach the store.

pub mod backup;
pub mod catalog;
pub mod events;
pub mod metrics;
pub mod workouts;

pub use backup::{BackupRepository, RestoreSummary};
pub use catalog::CatalogRepository;
pub use events::EventsRepository;
pub use metrics::MetricsRepository;
pub use workouts::WorkoutRepository;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use chrono::NaiveDate;

/// Owner id of the session, or `Unauthorized`.
pub fn require_owner(session: Option<&AuthUser>) -> Result<&str> {
    session
        .map(|user| user.user_id.as_str())
        .ok_or(AppError::Unauthorized)
}

/// Longest inclusive range accepted by range queries, in days.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Reject reversed or oversized ranges.
pub fn check_range(from: NaiveDate, to: NaiveDate) -> Result<()> {
    if from > to {
        return Err(AppError::BadRequest(format!(
            "Range start {} is after end {}",
            from, to
        )));
    }
    if (to - from).num_days() >= MAX_RANGE_DAYS {
        return Err(AppError::BadRequest(format!(
            "Range exceeds {} days",
            MAX_RANGE_DAYS
        )));
    }
    Ok(())
}
