// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use f1_data_api::config::Config;
use f1_data_api::db::MongoDb;
use f1_data_api::routes::create_router;
use f1_data_api::services::{ErgastClient, OpenF1Client, RefreshService};
use f1_data_api::AppState;
use std::sync::Arc;

/// Check if a MongoDB instance is available via environment variable.
#[allow(dead_code)]
pub fn mongo_available() -> bool {
    std::env::var("MONGODB_TEST_URI").is_ok()
}

/// Skip test with message if MongoDB is not available.
#[macro_export]
macro_rules! require_mongo {
    () => {
        if !crate::common::mongo_available() {
            eprintln!("⚠️  Skipping: MONGODB_TEST_URI not set");
            return;
        }
    };
}

/// Create a test database connection, isolated per test by name.
#[allow(dead_code)]
pub async fn test_db(test_name: &str) -> MongoDb {
    let uri = std::env::var("MONGODB_TEST_URI").expect("MONGODB_TEST_URI must be set");
    MongoDb::new(&uri, &format!("f1_test_{}", test_name))
        .await
        .expect("Failed to connect to MongoDB")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> MongoDb {
    MongoDb::new_mock()
}

/// Create a refresh service with both upstream clients pointed at
/// `upstream_url` (usually a wiremock server).
#[allow(dead_code)]
pub fn test_refresh_service(db: &MongoDb, upstream_url: &str) -> RefreshService {
    let openf1 = OpenF1Client::new(upstream_url);
    let ergast = ErgastClient::new(upstream_url, "2025");
    RefreshService::new(db.clone(), openf1, ergast)
}

/// Create a test app over the given database and upstream base URL.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(db: MongoDb, upstream_url: &str) -> (axum::Router, Arc<AppState>) {
    let refresh = test_refresh_service(&db, upstream_url);

    let state = Arc::new(AppState {
        config: Config::default(),
        db,
        refresh,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with an offline mock database.
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    create_test_app(test_db_offline(), "http://127.0.0.1:9")
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
