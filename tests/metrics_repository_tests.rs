// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily metrics repository tests against the memory store.

use chrono::NaiveDate;
use fit_journal::db::JournalDb;
use fit_journal::error::AppError;
use fit_journal::models::MetricsFields;
use fit_journal::repositories::MetricsRepository;

mod common;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

#[tokio::test]
async fn test_upsert_twice_keeps_one_record() {
    let db = JournalDb::in_memory();
    let user = common::session("owner-1");
    let repo = MetricsRepository::new(&db, Some(&user));

    let first = repo
        .upsert_by_date(
            date(2),
            &MetricsFields {
                steps: Some(4000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let second = repo
        .upsert_by_date(
            date(2),
            &MetricsFields {
                steps: Some(9000),
                weight_grams: Some(72_500),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.created_at, first.created_at);

    let rows = repo.get_range(date(1), date(30)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].steps, Some(9000));
    assert_eq!(rows[0].weight_grams, Some(72_500));
}

#[tokio::test]
async fn test_get_by_date_absent() {
    let db = JournalDb::in_memory();
    let user = common::session("owner-1");
    let repo = MetricsRepository::new(&db, Some(&user));

    assert!(repo.get_by_date(date(5)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_range_is_inclusive_and_sorted() {
    let db = JournalDb::in_memory();
    let user = common::session("owner-1");
    let repo = MetricsRepository::new(&db, Some(&user));

    for d in [9, 3, 1, 5] {
        repo.upsert_by_date(
            date(d),
            &MetricsFields {
                steps: Some(d * 1000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let rows = repo.get_range(date(3), date(9)).await.unwrap();
    let dates: Vec<NaiveDate> = rows.iter().map(|m| m.date).collect();
    assert_eq!(dates, vec![date(3), date(5), date(9)]);
}

#[tokio::test]
async fn test_rows_are_owner_scoped() {
    let db = JournalDb::in_memory();
    let alice = common::session("alice");
    let bob = common::session("bob");

    MetricsRepository::new(&db, Some(&alice))
        .upsert_by_date(
            date(2),
            &MetricsFields {
                steps: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let bobs = MetricsRepository::new(&db, Some(&bob))
        .get_range(date(1), date(30))
        .await
        .unwrap();
    assert!(bobs.is_empty());
}

#[tokio::test]
async fn test_requires_session() {
    let db = JournalDb::in_memory();
    let repo = MetricsRepository::new(&db, None);

    let err = repo
        .upsert_by_date(date(2), &MetricsFields::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    let err = repo.get_by_date(date(2)).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[tokio::test]
async fn test_rejects_out_of_bounds_values() {
    let db = JournalDb::in_memory();
    let user = common::session("owner-1");
    let repo = MetricsRepository::new(&db, Some(&user));

    let err = repo
        .upsert_by_date(
            date(2),
            &MetricsFields {
                weight_grams: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(repo.get_by_date(date(2)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_reversed_range_rejected() {
    let db = JournalDb::in_memory();
    let user = common::session("owner-1");
    let repo = MetricsRepository::new(&db, Some(&user));

    let err = repo.get_range(date(9), date(3)).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}
