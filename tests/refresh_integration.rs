// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end refresh tests: mock upstreams → MongoDB → query API.
//!
//! These need a real MongoDB instance (MONGODB_TEST_URI) and are skipped
//! otherwise. Each test uses its own database for isolation.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use mongodb::bson::doc;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

/// Mount a healthy fixture for every dataset on `server`.
///
/// Result rounds are {1, 2, 3} with 2/1/1 rows, so round filtering has
/// something to distinguish.
async fn mount_full_upstream(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/drivers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "driver_number": 1, "full_name": "Max Verstappen", "team_name": "Red Bull Racing" },
            { "driver_number": 1, "full_name": "Max Verstappen", "team_name": "Red Bull Racing" },
            { "driver_number": 16, "full_name": "Charles Leclerc", "team_name": "Ferrari" }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "session_key": 9001, "session_name": "Race" },
            { "session_key": 9002, "session_name": "Qualifying" }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2025/results.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MRData": {
                "total": "4",
                "RaceTable": { "Races": [
                    {
                        "raceName": "Australian Grand Prix",
                        "round": "1",
                        "date": "2025-03-16",
                        "Circuit": { "circuitName": "Albert Park" },
                        "Results": [
                            { "position": "1", "points": "25" },
                            { "position": "2", "points": "18" }
                        ]
                    },
                    {
                        "raceName": "Chinese Grand Prix",
                        "round": "2",
                        "date": "2025-03-23",
                        "Circuit": { "circuitName": "Shanghai" },
                        "Results": [{ "position": "1", "points": "25" }]
                    },
                    {
                        "raceName": "Japanese Grand Prix",
                        "round": "3",
                        "date": "2025-04-06",
                        "Circuit": { "circuitName": "Suzuka" },
                        "Results": [{ "position": "1", "points": "25" }]
                    }
                ]}
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2025/qualifying.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MRData": {
                "total": "1",
                "RaceTable": { "Races": [{
                    "raceName": "Australian Grand Prix",
                    "round": "1",
                    "date": "2025-03-15",
                    "Circuit": { "circuitName": "Albert Park" },
                    "QualifyingResults": [{ "position": "1", "Q3": "1:15.096" }]
                }]}
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2025/sprint.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MRData": {
                "total": "1",
                "RaceTable": { "Races": [{
                    "raceName": "Chinese Grand Prix",
                    "round": "2",
                    "date": "2025-03-22",
                    "Circuit": { "circuitName": "Shanghai" },
                    "SprintResults": [{ "position": "1", "points": "8" }]
                }]}
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2025/driverstandings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MRData": {
                "total": "2",
                "StandingsTable": { "StandingsLists": [{
                    "season": "2025",
                    "round": "3",
                    "DriverStandings": [
                        { "position": "1", "points": "62" },
                        { "position": "2", "points": "45" }
                    ]
                }]}
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2025/constructorstandings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MRData": {
                "total": "1",
                "StandingsTable": { "StandingsLists": [{
                    "season": "2025",
                    "round": "3",
                    "ConstructorStandings": [{ "position": "1", "points": "90" }]
                }]}
            }
        })))
        .mount(server)
        .await;
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, common::body_json(response).await)
}

#[tokio::test]
async fn test_full_cycle_serves_transformed_snapshot() {
    require_mongo!();

    let server = MockServer::start().await;
    mount_full_upstream(&server).await;

    let db = common::test_db("full_cycle").await;
    let (app, state) = common::create_test_app(db, &server.uri());

    state.refresh.refresh_all().await;

    // Drivers deduplicated to first-seen
    let (status, drivers) = get_json(&app, "/drivers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(drivers.as_array().unwrap().len(), 2);
    assert_eq!(drivers[0]["full_name"], "Max Verstappen");

    // Teams derived from driver affiliations
    let (_, teams) = get_json(&app, "/teams").await;
    let team_names: Vec<&str> = teams
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["team_name"].as_str().unwrap())
        .collect();
    assert_eq!(team_names, vec!["Red Bull Racing", "Ferrari"]);

    // Results flattened with event metadata
    let (_, results) = get_json(&app, "/results").await;
    assert_eq!(results.as_array().unwrap().len(), 4);
    assert!(results
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["raceName"].is_string() && r["circuit"].is_string()));

    // No internal identifiers leak out
    assert!(results
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r.get("_id").is_none()));

    let (_, qualifying) = get_json(&app, "/qualifying_results").await;
    assert_eq!(qualifying[0]["Q3"], "1:15.096");
    assert_eq!(qualifying[0]["circuit"], "Albert Park");

    let (_, standings) = get_json(&app, "/driver_standings").await;
    assert_eq!(standings.as_array().unwrap().len(), 2);
    assert_eq!(standings[0]["season"], "2025");
    assert_eq!(standings[0]["round"], 3);

    let (_, sessions) = get_json(&app, "/sessions").await;
    assert_eq!(sessions.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_results_round_filter() {
    require_mongo!();

    let server = MockServer::start().await;
    mount_full_upstream(&server).await;

    let db = common::test_db("round_filter").await;
    let (app, state) = common::create_test_app(db, &server.uri());

    state.refresh.refresh_all().await;

    let (status, round2) = get_json(&app, "/results?round=2").await;
    assert_eq!(status, StatusCode::OK);
    let rows = round2.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["raceName"], "Chinese Grand Prix");

    let (_, round9) = get_json(&app, "/results?round=9").await;
    assert!(round9.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_generic_data_endpoint_respects_limit() {
    require_mongo!();

    let server = MockServer::start().await;
    mount_full_upstream(&server).await;

    let db = common::test_db("data_limit").await;
    let (app, state) = common::create_test_app(db, &server.uri());

    state.refresh.refresh_all().await;

    let (status, rows) = get_json(&app, "/data?collection=results&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_one_dataset_failure_does_not_block_others() {
    require_mongo!();

    let server = MockServer::start().await;

    // Sessions upstream is down for this cycle. Mounted first: wiremock
    // gives precedence to earlier mocks.
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    mount_full_upstream(&server).await;

    let db = common::test_db("failure_isolation").await;

    // Previous sessions snapshot from an earlier successful cycle
    db.replace_collection("sessions", vec![doc! { "session_key": 1111 }])
        .await
        .expect("seed sessions");

    let (app, state) = common::create_test_app(db, &server.uri());
    state.refresh.refresh_all().await;

    // Drivers refreshed despite the sessions failure
    let (_, drivers) = get_json(&app, "/drivers").await;
    assert_eq!(drivers.as_array().unwrap().len(), 2);

    // Sessions kept the previous snapshot (delete only runs after a
    // successful fetch)
    let (_, sessions) = get_json(&app, "/sessions").await;
    assert_eq!(sessions.as_array().unwrap().len(), 1);
    assert_eq!(sessions[0]["session_key"], 1111);
}

#[tokio::test]
async fn test_empty_payload_keeps_previous_snapshot() {
    require_mongo!();

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drivers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    mount_full_upstream(&server).await;

    let db = common::test_db("empty_payload").await;
    db.replace_collection(
        "drivers",
        vec![doc! { "driver_number": 99, "full_name": "Previous Driver" }],
    )
    .await
    .expect("seed drivers");

    let (app, state) = common::create_test_app(db, &server.uri());
    state.refresh.refresh_all().await;

    let (_, drivers) = get_json(&app, "/drivers").await;
    assert_eq!(drivers.as_array().unwrap().len(), 1);
    assert_eq!(drivers[0]["full_name"], "Previous Driver");
}

#[tokio::test]
async fn test_background_loop_populates_at_startup() {
    require_mongo!();

    let server = MockServer::start().await;
    mount_full_upstream(&server).await;

    let db = common::test_db("startup_population").await;
    let (app, state) = common::create_test_app(db, &server.uri());

    // Long interval: only the startup cycle can populate the store
    tokio::spawn(
        state
            .refresh
            .clone()
            .run_periodic(std::time::Duration::from_secs(3600)),
    );

    // Wait for the startup cycle to land, without touching /refresh
    let mut drivers = Value::Null;
    for _ in 0..100 {
        let (_, body) = get_json(&app, "/drivers").await;
        if body.as_array().is_some_and(|a| !a.is_empty()) {
            drivers = body;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    assert_eq!(drivers.as_array().expect("populated at startup").len(), 2);
}

#[tokio::test]
async fn test_concurrent_refreshes_leave_one_clean_snapshot() {
    require_mongo!();

    let server = MockServer::start().await;
    mount_full_upstream(&server).await;

    let db = common::test_db("concurrent_refresh").await;
    let (app, state) = common::create_test_app(db, &server.uri());

    // Two overlapping manual triggers
    tokio::join!(state.refresh.refresh_all(), state.refresh.refresh_all());

    // No duplicated or half-replaced records afterwards
    let (_, drivers) = get_json(&app, "/drivers").await;
    assert_eq!(drivers.as_array().unwrap().len(), 2);

    let (_, results) = get_json(&app, "/results").await;
    assert_eq!(results.as_array().unwrap().len(), 4);
}
