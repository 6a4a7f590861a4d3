// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod backup;
pub mod catalog;
pub mod event;
pub mod metrics;
pub mod workout;

pub use backup::{Backup, BackupTables};
pub use catalog::{CatalogExercise, NewCatalogExercise};
pub use event::{Event, NewEvent};
pub use metrics::{DailyMetrics, MetricsFields};
pub use workout::{Load, NewExercise, Workout, WorkoutExercise};
