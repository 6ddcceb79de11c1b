// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MongoDB client wrapper with the handful of operations this service
//! needs: replace a whole collection, and scan a collection back out.
//!
//! Collections hold schemaless `Document`s; upstream payloads are stored
//! as-is apart from the flattening done in `services::transform`.

use crate::error::AppError;
use dashmap::DashMap;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use std::sync::Arc;

/// MongoDB database client.
#[derive(Clone)]
pub struct MongoDb {
    database: Option<mongodb::Database>,
    /// Per-collection write locks. Overlapping refreshes of the same
    /// collection must not interleave their delete/insert pairs.
    write_locks: Arc<DashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl MongoDb {
    /// Connect to MongoDB.
    pub async fn new(uri: &str, database_name: &str) -> Result<Self, AppError> {
        let client = mongodb::Client::with_uri_str(uri)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        tracing::info!(database = database_name, "Connected to MongoDB");

        Ok(Self {
            database: Some(client.database(database_name)),
            write_locks: Arc::new(DashMap::new()),
        })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            database: None,
            write_locks: Arc::new(DashMap::new()),
        }
    }

    /// Helper to get the database or return an error if offline.
    fn get_database(&self) -> Result<&mongodb::Database, AppError> {
        self.database
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    fn write_lock(&self, collection: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.write_locks
            .entry(collection.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    // ─── Store Writer ────────────────────────────────────────────

    /// Replace the entire contents of a collection with `records`.
    ///
    /// Delete-all then insert-all, as two separate calls. Not transactional:
    /// readers may observe the collection empty between the two steps. The
    /// per-collection lock only keeps two concurrent replaces from
    /// interleaving with each other.
    ///
    /// An empty record set is a no-op that keeps the previous snapshot.
    pub async fn replace_collection(
        &self,
        collection: &str,
        records: Vec<Document>,
    ) -> Result<usize, AppError> {
        if records.is_empty() {
            return Ok(0);
        }

        let db = self.get_database()?;
        let coll = db.collection::<Document>(collection);

        let lock = self.write_lock(collection);
        let _guard = lock.lock().await;

        coll.delete_many(doc! {})
            .await
            .map_err(|e| AppError::Database(format!("delete_many on '{}': {}", collection, e)))?;

        let count = records.len();
        coll.insert_many(records)
            .await
            .map_err(|e| AppError::Database(format!("insert_many on '{}': {}", collection, e)))?;

        Ok(count)
    }

    // ─── Query Operations ────────────────────────────────────────

    /// Get every document in a collection, `_id` stripped.
    pub async fn find_all(&self, collection: &str) -> Result<Vec<serde_json::Value>, AppError> {
        self.find(collection, doc! {}, None).await
    }

    /// Get documents matching a single equality filter, `_id` stripped.
    pub async fn find_filtered(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.find(collection, filter, None).await
    }

    /// Get up to `limit` documents from a collection, `_id` stripped.
    pub async fn find_limited(
        &self,
        collection: &str,
        limit: i64,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.find(collection, doc! {}, Some(limit)).await
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        limit: Option<i64>,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        let db = self.get_database()?;
        let coll = db.collection::<Document>(collection);

        let mut query = coll.find(filter);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let docs: Vec<Document> = query
            .await
            .map_err(|e| AppError::Database(format!("find on '{}': {}", collection, e)))?
            .try_collect()
            .await
            .map_err(|e| AppError::Database(format!("cursor on '{}': {}", collection, e)))?;

        docs.into_iter()
            .map(|mut doc| {
                doc.remove("_id");
                serde_json::to_value(doc)
                    .map_err(|e| AppError::Database(format!("document decode: {}", e)))
            })
            .collect()
    }
}
