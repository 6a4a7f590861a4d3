// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON backup and CSV report generation.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{AppError, Result};
use crate::models::{Backup, BackupTables, DailyMetrics};
use crate::time_utils::{days_between, iso_date};
use crate::units::format_kg_exact;

pub const CSV_HEADER: &str = "date;steps;kcal;weight_kg;note";

/// Wrap exported tables with the export timestamp.
pub fn build_backup(tables: BackupTables, now: DateTime<Utc>) -> Backup {
    Backup {
        tables,
        export_date: Some(now),
    }
}

/// Serialize a backup document.
pub fn backup_json(backup: &Backup) -> Result<String> {
    serde_json::to_string_pretty(backup)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Backup serialization failed: {}", e)))
}

/// Make a note safe for a single semicolon-delimited row.
pub fn sanitize_note(note: &str) -> String {
    note.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace(';', ",")
}

/// One row per day in `[from, to]`; days without a record get empty cells.
pub fn metrics_csv(from: NaiveDate, to: NaiveDate, rows: &[DailyMetrics]) -> String {
    let by_date: HashMap<NaiveDate, &DailyMetrics> = rows.iter().map(|m| (m.date, m)).collect();

    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for date in days_between(from, to) {
        let metrics = by_date.get(&date);
        let steps = metrics
            .and_then(|m| m.steps)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let calories = metrics
            .and_then(|m| m.calories)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let weight = metrics
            .and_then(|m| m.weight_grams)
            .map(format_kg_exact)
            .unwrap_or_default();
        let note = metrics
            .and_then(|m| m.note.as_deref())
            .map(sanitize_note)
            .unwrap_or_default();

        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{};{};{};{};{}",
            iso_date(date),
            steps,
            calories,
            weight,
            note
        );
    }

    out
}

/// Attachment file name, e.g. `journal-backup-2025-06-02.json`.
pub fn attachment_name(stem: &str, date: NaiveDate, extension: &str) -> String {
    format!("journal-{}-{}.{}", stem, iso_date(date), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricsFields;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_sanitize_note() {
        assert_eq!(sanitize_note("sore;legs\nrest\r\nday"), "sore,legs rest day");
    }

    #[test]
    fn test_metrics_csv_fills_every_day() {
        let rows = vec![DailyMetrics::new(
            "owner",
            date(3),
            &MetricsFields {
                steps: Some(8000),
                calories: Some(2100),
                weight_grams: Some(72_450),
                note: Some("long; walk\nnice".to_string()),
            },
            Utc::now(),
        )];

        let csv = metrics_csv(date(2), date(4), &rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "date;steps;kcal;weight_kg;note",
                "2025-06-02;;;;",
                "2025-06-03;8000;2100;72,45;long, walk nice",
                "2025-06-04;;;;",
            ]
        );
    }

    #[test]
    fn test_backup_json_has_all_tables() {
        let backup = build_backup(BackupTables::default(), Utc::now());
        let json: serde_json::Value = serde_json::from_str(&backup_json(&backup).unwrap()).unwrap();
        for key in [
            "daily_metrics",
            "workouts",
            "workout_exercises",
            "exercise_catalog",
            "events",
            "export_date",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_export_date_is_whole_seconds_utc() {
        let now = DateTime::parse_from_rfc3339("2025-06-02T07:08:09.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        let json: serde_json::Value =
            serde_json::from_str(&backup_json(&build_backup(BackupTables::default(), now)).unwrap())
                .unwrap();
        assert_eq!(json["export_date"], "2025-06-02T07:08:09Z");
    }

    #[test]
    fn test_attachment_name() {
        assert_eq!(
            attachment_name("backup", date(2), "json"),
            "journal-backup-2025-06-02.json"
        );
    }
}
