// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Refresh orchestrator: fetch → transform → replace, per dataset.
//!
//! A cycle is a fixed imperative sequence over all datasets. Each
//! dataset's failure is caught and logged here and never propagated, so
//! one upstream hiccup cannot block the rest of the cycle. The failed
//! dataset simply keeps its previous snapshot.

use crate::db::{collections, MongoDb};
use crate::error::AppError;
use crate::models::ergast::{ResultKind, StandingsKind};
use crate::services::ergast::ErgastClient;
use crate::services::openf1::OpenF1Client;
use crate::services::transform;
use mongodb::bson::Document;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// Sequences dataset refreshes against both upstream APIs.
#[derive(Clone)]
pub struct RefreshService {
    db: MongoDb,
    openf1: OpenF1Client,
    ergast: ErgastClient,
}

impl RefreshService {
    pub fn new(db: MongoDb, openf1: OpenF1Client, ergast: ErgastClient) -> Self {
        Self { db, openf1, ergast }
    }

    /// Run one full refresh cycle over every tracked dataset.
    pub async fn refresh_all(&self) {
        let started = chrono::Utc::now();
        tracing::info!("Refresh cycle started");

        self.run_dataset(collections::DRIVERS, self.refresh_drivers())
            .await;
        self.run_dataset(collections::TEAMS, self.refresh_teams())
            .await;
        self.run_dataset(collections::SESSIONS, self.refresh_sessions())
            .await;
        self.run_dataset(collections::RESULTS, self.refresh_results(ResultKind::Race))
            .await;
        self.run_dataset(
            collections::QUALIFYING_RESULTS,
            self.refresh_results(ResultKind::Qualifying),
        )
        .await;
        self.run_dataset(
            collections::SPRINT_RESULTS,
            self.refresh_results(ResultKind::Sprint),
        )
        .await;
        self.run_dataset(
            collections::DRIVER_STANDINGS,
            self.refresh_standings(StandingsKind::Driver),
        )
        .await;
        self.run_dataset(
            collections::CONSTRUCTOR_STANDINGS,
            self.refresh_standings(StandingsKind::Constructor),
        )
        .await;

        let elapsed = chrono::Utc::now().signed_duration_since(started);
        tracing::info!(
            elapsed_ms = elapsed.num_milliseconds(),
            "Refresh cycle finished"
        );
    }

    /// Background refresh loop: one cycle at startup, then one per
    /// interval, sleeping the full interval between runs.
    ///
    /// The startup cycle means a fresh deployment serves data as soon as
    /// the upstreams have been ingested once, not after the first interval.
    pub async fn run_periodic(self, interval: Duration) {
        self.refresh_all().await;
        loop {
            tokio::time::sleep(interval).await;
            self.refresh_all().await;
        }
    }

    /// Run one dataset refresh, logging the outcome either way.
    async fn run_dataset(
        &self,
        dataset: &str,
        refresh: impl Future<Output = Result<usize, AppError>>,
    ) {
        match refresh.await {
            Ok(count) => tracing::info!(dataset, count, "Dataset refreshed"),
            Err(e) => tracing::error!(
                dataset,
                error = %e,
                "Dataset refresh failed, keeping previous snapshot"
            ),
        }
    }

    // ─── Datasets ────────────────────────────────────────────────

    /// Driver lineup of the latest meeting, deduplicated first-seen.
    async fn refresh_drivers(&self) -> Result<usize, AppError> {
        let drivers = self.openf1.latest_drivers().await?;
        let drivers = transform::dedup_drivers(drivers);
        self.store(collections::DRIVERS, drivers).await
    }

    /// Teams derived from the stored drivers collection.
    async fn refresh_teams(&self) -> Result<usize, AppError> {
        let drivers = self.db.find_all(collections::DRIVERS).await?;
        let teams = transform::teams_from_drivers(&drivers);
        self.store(collections::TEAMS, teams).await
    }

    async fn refresh_sessions(&self) -> Result<usize, AppError> {
        let sessions = self.openf1.sessions().await?;
        self.store(collections::SESSIONS, sessions).await
    }

    /// Race, qualifying, or sprint results with event metadata flattened
    /// onto every row.
    async fn refresh_results(&self, kind: ResultKind) -> Result<usize, AppError> {
        let collection = match kind {
            ResultKind::Race => collections::RESULTS,
            ResultKind::Qualifying => collections::QUALIFYING_RESULTS,
            ResultKind::Sprint => collections::SPRINT_RESULTS,
        };

        let races = self.ergast.results(kind).await?;
        let rows = transform::flatten_event_results(&races, kind);
        self.store(collection, rows).await
    }

    async fn refresh_standings(&self, kind: StandingsKind) -> Result<usize, AppError> {
        let collection = match kind {
            StandingsKind::Driver => collections::DRIVER_STANDINGS,
            StandingsKind::Constructor => collections::CONSTRUCTOR_STANDINGS,
        };

        let lists = self.ergast.standings(kind).await?;
        let rows = transform::flatten_standings(&lists, kind);
        self.store(collection, rows).await
    }

    /// Replace a collection with freshly fetched rows.
    ///
    /// An empty row set is an error: the delete step must not run, so the
    /// previous snapshot survives an upstream that returns nothing.
    async fn store(&self, collection: &str, rows: Vec<Value>) -> Result<usize, AppError> {
        if rows.is_empty() {
            return Err(AppError::EmptyPayload(collection.to_string()));
        }

        let documents = rows
            .iter()
            .map(|row| {
                mongodb::bson::to_document(row).map_err(|e| {
                    AppError::UpstreamApi(format!("non-document record for '{}': {}", collection, e))
                })
            })
            .collect::<Result<Vec<Document>, AppError>>()?;

        self.db.replace_collection(collection, documents).await
    }
}
