// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end tests of the day, week, report, catalog, events and theme
//! routes over the memory store.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_day_view_flow() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "owner-1");

    // Empty day still gets a workout
    let response = app
        .clone()
        .oneshot(common::authed_request("GET", "/api/day/2025-06-03", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let day = common::json_body(response).await;
    assert!(day["metrics"].is_null());
    assert_eq!(day["workout"]["title"], "Workout 2025-06-03");
    let workout_id = day["workout"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "PUT",
            "/api/day/2025-06-03/metrics",
            &token,
            Some(json!({ "steps": 8000, "weight": "72,5", "note": "easy day" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let saved = common::json_body(response).await;
    assert_eq!(saved["weight_grams"], 72_500);

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "POST",
            "/api/day/2025-06-03/exercises",
            &token,
            Some(json!({ "name": "Squat", "load": { "kind": "fixed", "grams": 60000 }, "reps": 5 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let exercise = common::json_body(response).await;
    assert_eq!(exercise["position"], 0);
    assert_eq!(exercise["workout_id"], workout_id.as_str());
    assert_eq!(exercise["load_display"], "60,0 kg");

    let response = app
        .clone()
        .oneshot(common::authed_request("GET", "/api/day/2025-06-03", &token, None))
        .await
        .unwrap();
    let day = common::json_body(response).await;
    assert_eq!(day["workout"]["id"], workout_id.as_str());
    assert_eq!(day["weight_display"], "72,5");
    assert_eq!(day["metrics"]["note"], "easy day");
    assert_eq!(day["exercises"].as_array().unwrap().len(), 1);

    let exercise_id = exercise["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(common::authed_request(
            "DELETE",
            &format!("/api/exercises/{}", exercise_id),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(common::authed_request("GET", "/api/day/2025-06-03", &token, None))
        .await
        .unwrap();
    let day = common::json_body(response).await;
    assert!(day["exercises"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_date_and_weight_are_bad_requests() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "owner-1");

    let response = app
        .clone()
        .oneshot(common::authed_request("GET", "/api/day/2025-13-40", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(common::authed_request(
            "PUT",
            "/api/day/2025-06-03/metrics",
            &token,
            Some(json!({ "weight": "72,5kg" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_week_view_compares_with_previous_week() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "owner-1");

    // Previous week (Mon 2025-05-26 .. Sun 2025-06-01) and the current week
    for (date, body) in [
        ("2025-05-27", json!({ "weight": "70" })),
        ("2025-06-02", json!({ "steps": 1000, "weight": "71" })),
        ("2025-06-04", json!({ "steps": 0 })),
    ] {
        let response = app
            .clone()
            .oneshot(common::authed_request(
                "PUT",
                &format!("/api/day/{}/metrics", date),
                &token,
                Some(body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "POST",
            "/api/events",
            &token,
            Some(json!({ "title": "Trip", "start_date": "2025-06-05", "end_date": "2025-06-12" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(common::authed_request("GET", "/api/week/2025-06-04", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let week = common::json_body(response).await;

    assert_eq!(week["week_start"], "2025-06-02");
    assert_eq!(week["week_end"], "2025-06-08");
    assert_eq!(week["days"].as_array().unwrap().len(), 7);
    // Zero steps are excluded from the average
    assert_eq!(week["averages"]["steps"], 1000.0);
    assert_eq!(week["previous_averages"]["weight_display"], "70,0");
    assert_eq!(week["weight_variation"]["display"], "+1,0 kg (+1,4 %)");
    assert_eq!(week["weight_variation"]["warning"], true);

    let events = week["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["color"], "#f59e0b");
    assert!(week["days"][2]["events"].as_array().unwrap().is_empty());
    assert_eq!(week["days"][3]["events"][0]["title"], "Trip");
}

#[tokio::test]
async fn test_report_over_range() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "owner-1");

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "PUT",
            "/api/day/2025-06-10/metrics",
            &token,
            Some(json!({ "calories": 2500 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "GET",
            "/api/report?from=2025-06-01&to=2025-06-30",
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = common::json_body(response).await;
    assert_eq!(report["days"].as_array().unwrap().len(), 30);
    assert_eq!(report["averages"]["calories"], 2500.0);
    assert!(report["averages"]["weight_kg"].is_null());

    let response = app
        .oneshot(common::authed_request(
            "GET",
            "/api/report?from=2025-06-30&to=2025-06-01",
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_events_api() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "owner-1");

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "POST",
            "/api/events",
            &token,
            Some(json!({ "title": "Backwards", "start_date": "2025-06-05", "end_date": "2025-06-01" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "POST",
            "/api/events",
            &token,
            Some(json!({ "title": "Injury", "start_date": "2025-06-01", "end_date": "2025-06-05", "color": "#ef4444" })),
        ))
        .await
        .unwrap();
    let created = common::json_body(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "GET",
            "/api/events?from=2025-06-05&to=2025-06-30",
            &token,
            None,
        ))
        .await
        .unwrap();
    let listed = common::json_body(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "DELETE",
            &format!("/api/events/{}", id),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(common::authed_request(
            "GET",
            "/api/events?from=2025-06-01&to=2025-06-30",
            &token,
            None,
        ))
        .await
        .unwrap();
    let listed = common::json_body(response).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_catalog_api() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "owner-1");

    for name in ["squat", "Bench press"] {
        let response = app
            .clone()
            .oneshot(common::authed_request(
                "POST",
                "/api/catalog",
                &token,
                Some(json!({ "name": name })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "POST",
            "/api/catalog",
            &token,
            Some(json!({ "name": "Row", "video_url": "not a url" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(common::authed_request("GET", "/api/catalog", &token, None))
        .await
        .unwrap();
    let catalog = common::json_body(response).await;
    let names: Vec<&str> = catalog
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bench press", "squat"]);
}

#[tokio::test]
async fn test_theme_settings() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "owner-1");

    let response = app
        .clone()
        .oneshot(common::authed_request("GET", "/api/settings/theme", &token, None))
        .await
        .unwrap();
    assert_eq!(common::json_body(response).await["theme"], "light");

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "PUT",
            "/api/settings/theme",
            &token,
            Some(json!({ "theme": "dark" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.theme.current().await, fit_journal::theme::Theme::Dark);

    let response = app
        .oneshot(common::authed_request("GET", "/api/settings/theme", &token, None))
        .await
        .unwrap();
    assert_eq!(common::json_body(response).await["theme"], "dark");
}
