// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OpenF1 API client for session and driver data.
//!
//! All OpenF1 endpoints used here are single-shot GETs returning a JSON
//! array of records. Records are kept untyped and go into the store
//! exactly as the API returned them.

use crate::error::AppError;
use serde_json::Value;

/// OpenF1 API client.
#[derive(Clone)]
pub struct OpenF1Client {
    http: reqwest::Client,
    base_url: String,
}

impl OpenF1Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Get all sessions.
    pub async fn sessions(&self) -> Result<Vec<Value>, AppError> {
        let url = format!("{}/sessions", self.base_url);
        self.get_records(&url).await
    }

    /// Get the driver lineup of the latest meeting.
    ///
    /// One record per driver per session, so the same driver appears
    /// several times; the transformer deduplicates.
    pub async fn latest_drivers(&self) -> Result<Vec<Value>, AppError> {
        let url = format!("{}/drivers?meeting_key=latest", self.base_url);
        self.get_records(&url).await
    }

    /// GET a JSON array of records.
    async fn get_records(&self, url: &str) -> Result<Vec<Value>, AppError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::UpstreamApi(format!("JSON parse error: {}", e)))
    }
}
