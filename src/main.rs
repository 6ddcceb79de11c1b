// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! F1 Data API Server
//!
//! Ingests Formula 1 data (drivers, teams, sessions, results, standings)
//! from the OpenF1 and Ergast APIs into MongoDB and re-serves it as JSON,
//! refreshing in the background on a fixed interval.

use f1_data_api::{
    config::Config,
    db::MongoDb,
    services::{ErgastClient, OpenF1Client, RefreshService},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, season = %config.season, "Starting F1 Data API");

    // Initialize MongoDB
    let db = MongoDb::new(&config.mongodb_uri, &config.database_name)
        .await
        .expect("Failed to connect to MongoDB");

    // Initialize upstream API clients
    let openf1 = OpenF1Client::new(config.openf1_base_url.clone());
    let ergast = ErgastClient::new(config.ergast_base_url.clone(), config.season.clone());

    let refresh = RefreshService::new(db.clone(), openf1, ergast);

    // Background refresh: initial ingestion now, then one cycle per interval
    let interval = Duration::from_secs(config.refresh_interval_secs);
    tokio::spawn(refresh.clone().run_periodic(interval));
    tracing::info!(
        interval_secs = config.refresh_interval_secs,
        "Background refresh scheduled"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        refresh,
    });

    // Build router
    let app = f1_data_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("f1_data_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
