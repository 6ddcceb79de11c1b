// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! F1 Data API: ingest Formula 1 data and re-serve it as JSON.
//!
//! This crate fetches drivers, teams, sessions, results, and standings
//! from the OpenF1 and Ergast APIs into MongoDB, and exposes a thin HTTP
//! query layer over the stored collections.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::MongoDb;
use services::RefreshService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: MongoDb,
    pub refresh: RefreshService,
}
