// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Metric averages, week-over-week weight variation, and the week and
//! range summaries built from them.
//!
//! Averages skip both missing and zero readings: a day logged with `0` steps
//! counts the same as a day with no entry. Per-day rows keep the raw stored
//! values.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{DailyMetrics, Event};
use crate::time_utils::{days_between, week_days, week_end, week_start};
use crate::units::{format_kg, format_kg_f64, format_signed, grams_to_kg};

/// Arithmetic mean of the present, non-zero values; `None` if there are none.
pub fn average<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<u32>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|value| *value != 0)
        .fold((0u64, 0u32), |(sum, count), value| {
            (sum + u64::from(value), count + 1)
        });

    if count == 0 {
        None
    } else {
        Some(sum as f64 / f64::from(count))
    }
}

/// Signed change between two averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeightVariation {
    /// `current - previous`
    pub diff: f64,
    /// `diff / previous * 100`
    pub percent: f64,
}

impl WeightVariation {
    /// Positive variation means weight went up.
    pub fn is_increase(&self) -> bool {
        self.diff > 0.0
    }
}

/// Variation from `previous` to `current`.
///
/// `None` when either side is absent or `previous` is exactly zero.
pub fn weight_variation(current: Option<f64>, previous: Option<f64>) -> Option<WeightVariation> {
    let (current, previous) = (current?, previous?);
    if previous == 0.0 {
        return None;
    }
    let diff = current - previous;
    Some(WeightVariation {
        diff,
        percent: diff / previous * 100.0,
    })
}

/// Averages of each metric over a set of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricAverages {
    pub steps: Option<f64>,
    pub calories: Option<f64>,
    pub weight_grams: Option<f64>,
}

impl MetricAverages {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a DailyMetrics> + Clone) -> Self {
        Self {
            steps: average(rows.clone().into_iter().map(|m| m.steps)),
            calories: average(rows.clone().into_iter().map(|m| m.calories)),
            weight_grams: average(rows.into_iter().map(|m| m.weight_grams)),
        }
    }

    /// Weight average in kilograms.
    pub fn weight_kg(&self) -> Option<f64> {
        self.weight_grams.map(grams_to_kg)
    }
}

// ─── View Types ──────────────────────────────────────────────

/// Averages as presented to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AveragesView {
    pub steps: Option<f64>,
    pub calories: Option<f64>,
    pub weight_kg: Option<f64>,
    /// `72,5` style display of the weight average
    pub weight_display: Option<String>,
}

impl From<MetricAverages> for AveragesView {
    fn from(averages: MetricAverages) -> Self {
        Self {
            steps: averages.steps.map(f64::round),
            calories: averages.calories.map(f64::round),
            weight_kg: averages.weight_kg(),
            weight_display: averages.weight_grams.map(format_kg_f64),
        }
    }
}

/// Week-over-week weight change as presented to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct VariationView {
    pub diff_kg: f64,
    pub percent: f64,
    /// e.g. `+0,8 kg (+1,2 %)`
    pub display: String,
    /// Weight went up; rendered as a warning
    pub warning: bool,
}

impl From<WeightVariation> for VariationView {
    fn from(variation: WeightVariation) -> Self {
        Self {
            diff_kg: variation.diff,
            percent: variation.percent,
            display: format!(
                "{} kg ({} %)",
                format_signed(variation.diff, 1),
                format_signed(variation.percent, 1)
            ),
            warning: variation.is_increase(),
        }
    }
}

/// Minimal event reference attached to a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EventBadge {
    pub id: String,
    pub title: String,
    pub color: String,
}

/// One calendar day with its raw readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// `Mon` .. `Sun`
    pub weekday: String,
    pub steps: Option<u32>,
    pub calories: Option<u32>,
    pub weight_grams: Option<u32>,
    pub weight_display: Option<String>,
    pub note: Option<String>,
    pub events: Vec<EventBadge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeekSummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DaySummary>,
    pub averages: AveragesView,
    pub previous_averages: AveragesView,
    pub weight_variation: Option<VariationView>,
    pub events: Vec<Event>,
}

/// Print-friendly report over an arbitrary inclusive range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RangeReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: Vec<DaySummary>,
    pub averages: AveragesView,
    pub events: Vec<Event>,
}

// ─── Builders ────────────────────────────────────────────────

fn day_summaries(
    dates: Vec<NaiveDate>,
    rows: &[DailyMetrics],
    events: &[Event],
) -> Vec<DaySummary> {
    let by_date: HashMap<NaiveDate, &DailyMetrics> = rows.iter().map(|m| (m.date, m)).collect();

    dates
        .into_iter()
        .map(|date| {
            let metrics = by_date.get(&date);
            DaySummary {
                date,
                weekday: date.weekday().to_string(),
                steps: metrics.and_then(|m| m.steps),
                calories: metrics.and_then(|m| m.calories),
                weight_grams: metrics.and_then(|m| m.weight_grams),
                weight_display: metrics.and_then(|m| m.weight_grams).map(format_kg),
                note: metrics.and_then(|m| m.note.clone()),
                events: events
                    .iter()
                    .filter(|e| e.is_active_on(date))
                    .map(|e| EventBadge {
                        id: e.id.clone(),
                        title: e.title.clone(),
                        color: e.color.clone(),
                    })
                    .collect(),
            }
        })
        .collect()
}

fn rows_within(rows: &[DailyMetrics], from: NaiveDate, to: NaiveDate) -> Vec<&DailyMetrics> {
    rows.iter()
        .filter(|m| m.date >= from && m.date <= to)
        .collect()
}

/// Summary of the week containing `anchor`.
///
/// `current` and `previous` are the metrics of that week and the week before;
/// rows outside those weeks are ignored. The variation compares the weekly
/// weight averages in kilograms.
pub fn week_summary(
    anchor: NaiveDate,
    current: &[DailyMetrics],
    previous: &[DailyMetrics],
    events: Vec<Event>,
) -> WeekSummary {
    let start = week_start(anchor);
    let end = week_end(anchor);
    let previous_start = start - chrono::Days::new(7);
    let previous_end = start - chrono::Days::new(1);

    let this_week = MetricAverages::from_rows(rows_within(current, start, end));
    let last_week = MetricAverages::from_rows(rows_within(previous, previous_start, previous_end));
    let variation = weight_variation(this_week.weight_kg(), last_week.weight_kg());

    WeekSummary {
        week_start: start,
        week_end: end,
        days: day_summaries(week_days(anchor), current, &events),
        averages: this_week.into(),
        previous_averages: last_week.into(),
        weight_variation: variation.map(VariationView::from),
        events,
    }
}

/// Report over `[from, to]`.
pub fn range_report(
    from: NaiveDate,
    to: NaiveDate,
    rows: &[DailyMetrics],
    events: Vec<Event>,
) -> RangeReport {
    let averages = MetricAverages::from_rows(rows_within(rows, from, to));
    RangeReport {
        from,
        to,
        days: day_summaries(days_between(from, to), rows, &events),
        averages: averages.into(),
        events,
    }
}
