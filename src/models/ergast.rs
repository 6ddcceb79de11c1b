// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Ergast API response envelope.
//!
//! Only the envelope is typed, enough to drive pagination (`total`) and
//! the event-field flattening. The result rows themselves stay raw JSON
//! and are stored untouched apart from the fields the transformer adds.

use serde::Deserialize;
use serde_json::Value;

/// Top-level Ergast response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErgastResponse {
    #[serde(rename = "MRData")]
    pub mr_data: ErgastPage,
}

/// One page of an Ergast response.
///
/// Ergast serializes all of its numeric envelope fields as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ErgastPage {
    pub total: String,
    #[serde(rename = "RaceTable")]
    pub race_table: Option<RaceTable>,
    #[serde(rename = "StandingsTable")]
    pub standings_table: Option<StandingsTable>,
}

impl ErgastPage {
    /// Server-reported total row count across all pages.
    pub fn total_rows(&self) -> Option<u64> {
        self.total.parse().ok()
    }

    pub fn races(self) -> Vec<Race> {
        self.race_table.map(|t| t.races).unwrap_or_default()
    }

    pub fn standings_lists(self) -> Vec<StandingsList> {
        self.standings_table
            .map(|t| t.standings_lists)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaceTable {
    #[serde(rename = "Races", default)]
    pub races: Vec<Race>,
}

/// One race weekend event with its child result rows.
#[derive(Debug, Clone, Deserialize)]
pub struct Race {
    #[serde(rename = "raceName")]
    pub race_name: String,
    pub round: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "Circuit")]
    pub circuit: Circuit,
    #[serde(rename = "Results", default)]
    pub results: Vec<Value>,
    #[serde(rename = "QualifyingResults", default)]
    pub qualifying_results: Vec<Value>,
    #[serde(rename = "SprintResults", default)]
    pub sprint_results: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Circuit {
    #[serde(rename = "circuitName")]
    pub circuit_name: String,
}

/// Which child array of a [`Race`] a dataset reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Race,
    Qualifying,
    Sprint,
}

impl ResultKind {
    /// Ergast URL path segment for this result kind.
    pub fn path(self) -> &'static str {
        match self {
            ResultKind::Race => "results",
            ResultKind::Qualifying => "qualifying",
            ResultKind::Sprint => "sprint",
        }
    }

    /// The child rows of `race` for this result kind.
    pub fn rows(self, race: &Race) -> &[Value] {
        match self {
            ResultKind::Race => &race.results,
            ResultKind::Qualifying => &race.qualifying_results,
            ResultKind::Sprint => &race.sprint_results,
        }
    }
}

/// Which child array of a [`StandingsList`] a dataset reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsKind {
    Driver,
    Constructor,
}

impl StandingsKind {
    /// Ergast URL path segment for this standings kind.
    pub fn path(self) -> &'static str {
        match self {
            StandingsKind::Driver => "driverstandings",
            StandingsKind::Constructor => "constructorstandings",
        }
    }

    /// The entries of `list` for this standings kind.
    pub fn rows(self, list: &StandingsList) -> &[Value] {
        match self {
            StandingsKind::Driver => &list.driver_standings,
            StandingsKind::Constructor => &list.constructor_standings,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsTable {
    #[serde(rename = "StandingsLists", default)]
    pub standings_lists: Vec<StandingsList>,
}

/// One standings snapshot (as of a season + round).
#[derive(Debug, Clone, Deserialize)]
pub struct StandingsList {
    pub season: String,
    pub round: String,
    #[serde(rename = "DriverStandings", default)]
    pub driver_standings: Vec<Value>,
    #[serde(rename = "ConstructorStandings", default)]
    pub constructor_standings: Vec<Value>,
}
