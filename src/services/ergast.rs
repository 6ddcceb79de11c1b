// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ergast-compatible API client for race results and standings.
//!
//! Every endpoint is paginated with `limit`/`offset`. The loop requests
//! fixed-size pages and stops once the cumulative offset reaches the
//! server-reported `MRData.total`, or a page comes back with no rows.
//! No retry, no backoff: a failed page aborts that dataset's fetch and
//! the previous snapshot stays in place.

use crate::error::AppError;
use crate::models::ergast::{ErgastPage, ErgastResponse, Race, ResultKind, StandingsKind, StandingsList};

/// Rows per page. The jolpi.ca deployment caps `limit` at 100.
const PAGE_SIZE: u64 = 100;

/// Ergast API client.
#[derive(Clone)]
pub struct ErgastClient {
    http: reqwest::Client,
    base_url: String,
    season: String,
}

impl ErgastClient {
    pub fn new(base_url: impl Into<String>, season: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            season: season.into(),
        }
    }

    /// Get all race events with their result rows for the season.
    ///
    /// An event split across page boundaries comes back as multiple `Race`
    /// entries, each carrying only its window of rows; the flattening step
    /// does not care.
    pub async fn results(&self, kind: ResultKind) -> Result<Vec<Race>, AppError> {
        let path = format!("{}/{}/{}.json", self.base_url, self.season, kind.path());

        self.paginate(&path, |page| page.races(), |race| kind.rows(race).len())
            .await
    }

    /// Get all standings snapshots of the given kind for the season.
    pub async fn standings(&self, kind: StandingsKind) -> Result<Vec<StandingsList>, AppError> {
        let path = format!("{}/{}/{}.json", self.base_url, self.season, kind.path());

        self.paginate(
            &path,
            |page| page.standings_lists(),
            |list| kind.rows(list).len(),
        )
        .await
    }

    /// Page through `url`, accumulating the per-page items.
    ///
    /// `extract` pulls the items out of a page envelope and `row_count`
    /// reports how many result rows an item carries. The offset advances
    /// by `PAGE_SIZE` regardless, but a page with zero rows ends the loop.
    async fn paginate<T>(
        &self,
        url: &str,
        extract: impl Fn(ErgastPage) -> Vec<T>,
        row_count: impl Fn(&T) -> usize,
    ) -> Result<Vec<T>, AppError> {
        let mut items = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let page = self.fetch_page(url, offset).await?;
            let total = page.total_rows().unwrap_or(0);

            let page_items = extract(page);
            let page_rows: usize = page_items.iter().map(&row_count).sum();
            items.extend(page_items);

            if page_rows == 0 {
                break;
            }

            offset += PAGE_SIZE;
            if offset >= total {
                break;
            }
        }

        Ok(items)
    }

    /// GET one page of an Ergast endpoint.
    async fn fetch_page(&self, url: &str, offset: u64) -> Result<ErgastPage, AppError> {
        let response = self
            .http
            .get(url)
            .query(&[
                ("limit", PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::UpstreamApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamApi(format!("HTTP {}: {}", status, body)));
        }

        let envelope: ErgastResponse = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamApi(format!("JSON parse error: {}", e)))?;

        Ok(envelope.mr_data)
    }
}
