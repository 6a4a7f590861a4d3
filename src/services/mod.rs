// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - aggregation and backup logic, independent of the store.

pub mod aggregation;
pub mod export;
pub mod import;

pub use aggregation::{range_report, week_summary, RangeReport, WeekSummary};
pub use export::{backup_json, build_backup, metrics_csv};
pub use import::{parse_backup, prepare_restore};
