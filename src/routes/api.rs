// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Query API: collection reads plus the manual refresh trigger.
//!
//! Every read endpoint is a direct collection scan returning the stored
//! documents as a JSON array with the internal `_id` stripped. No
//! pagination, no sorting contract.

use crate::db::collections;
use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", get(get_sessions))
        .route("/drivers", get(get_drivers))
        .route("/teams", get(get_teams))
        .route("/results", get(get_results))
        .route("/qualifying_results", get(get_qualifying_results))
        .route("/sprint_results", get(get_sprint_results))
        .route("/driver_standings", get(get_driver_standings))
        .route("/constructor_standings", get(get_constructor_standings))
        .route("/data", get(get_collection_data))
        .route("/refresh", get(trigger_refresh))
}

// ─── Collection Dumps ────────────────────────────────────────

async fn get_sessions(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.db.find_all(collections::SESSIONS).await?))
}

async fn get_drivers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.db.find_all(collections::DRIVERS).await?))
}

async fn get_teams(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.db.find_all(collections::TEAMS).await?))
}

async fn get_qualifying_results(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.db.find_all(collections::QUALIFYING_RESULTS).await?))
}

async fn get_sprint_results(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.db.find_all(collections::SPRINT_RESULTS).await?))
}

async fn get_driver_standings(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.db.find_all(collections::DRIVER_STANDINGS).await?))
}

async fn get_constructor_standings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.db.find_all(collections::CONSTRUCTOR_STANDINGS).await?))
}

// ─── Race Results (filterable) ───────────────────────────────

#[derive(Deserialize)]
struct ResultsQuery {
    /// Filter by round number
    round: Option<i64>,
}

/// Race results, optionally filtered by round.
async fn get_results(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<Vec<Value>>> {
    let results = match query.round {
        Some(round) => {
            state
                .db
                .find_filtered(collections::RESULTS, doc! { "round": round })
                .await?
        }
        None => state.db.find_all(collections::RESULTS).await?,
    };

    Ok(Json(results))
}

// ─── Generic Collection Read ─────────────────────────────────

#[derive(Deserialize)]
struct DataQuery {
    collection: String,
    /// Row cap for the response
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    100
}

/// Read up to `limit` documents from any known collection.
async fn get_collection_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Result<Json<Vec<Value>>> {
    if !collections::ALL.contains(&query.collection.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unknown collection '{}'",
            query.collection
        )));
    }

    let data = state
        .db
        .find_limited(&query.collection, i64::from(query.limit))
        .await?;

    Ok(Json(data))
}

// ─── Manual Refresh ──────────────────────────────────────────

/// Response for the refresh trigger.
#[derive(Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub started_at: String,
}

/// Kick off a refresh cycle in the background and acknowledge immediately.
///
/// Fire-and-forget: the caller gets no signal about the cycle's outcome,
/// only the log lines do.
async fn trigger_refresh(State(state): State<Arc<AppState>>) -> Json<RefreshResponse> {
    let refresh = state.refresh.clone();
    tokio::spawn(async move { refresh.refresh_all().await });

    Json(RefreshResponse {
        message: "Data refresh started in the background".to_string(),
        started_at: chrono::Utc::now().to_rfc3339(),
    })
}
