// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pure record transformations between fetch and store.
//!
//! - Flatten per-event fields (race name, round, date, circuit) onto each
//!   child result row, and season/round onto each standings row.
//! - Deduplicate driver records by first-seen identity.
//! - Derive the teams dataset from driver team affiliations.

use crate::models::ergast::{Race, ResultKind, StandingsKind, StandingsList};
use serde_json::{json, Value};
use std::collections::HashSet;

/// Keep the first record per driver identity, drop later duplicates.
///
/// Identity is `driver_number`, falling back to `full_name`. Input order
/// decides which duplicate survives, so the result is only stable as long
/// as the upstream API keeps its ordering.
pub fn dedup_drivers(drivers: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    drivers
        .into_iter()
        .filter(|driver| match driver_identity(driver) {
            Some(id) => seen.insert(id),
            None => false,
        })
        .collect()
}

/// Composite driver identity key, if the record carries one.
fn driver_identity(driver: &Value) -> Option<String> {
    if let Some(number) = driver.get("driver_number") {
        if !number.is_null() {
            return Some(format!("number:{}", number));
        }
    }
    driver
        .get("full_name")
        .and_then(Value::as_str)
        .map(|name| format!("name:{}", name))
}

/// One team record per distinct `team_name` observed across drivers,
/// in first-seen order.
pub fn teams_from_drivers(drivers: &[Value]) -> Vec<Value> {
    let mut seen = HashSet::new();
    drivers
        .iter()
        .filter_map(|driver| driver.get("team_name").and_then(Value::as_str))
        .filter(|name| !name.is_empty() && seen.insert(name.to_string()))
        .map(|name| json!({ "team_name": name }))
        .collect()
}

/// Flatten event metadata onto every child result row.
///
/// Copies `raceName`, `round` (parsed to an integer where possible),
/// `date`, and the circuit name onto each row of each event.
pub fn flatten_event_results(races: &[Race], kind: ResultKind) -> Vec<Value> {
    let mut rows = Vec::new();
    for race in races {
        for row in kind.rows(race) {
            let mut row = row.clone();
            if let Some(obj) = row.as_object_mut() {
                obj.insert("raceName".to_string(), json!(race.race_name));
                obj.insert("round".to_string(), parse_round(&race.round));
                obj.insert("date".to_string(), json!(race.date));
                obj.insert("circuit".to_string(), json!(race.circuit.circuit_name));
            }
            rows.push(row);
        }
    }
    rows
}

/// Flatten the snapshot's season and round onto every standings row.
pub fn flatten_standings(lists: &[StandingsList], kind: StandingsKind) -> Vec<Value> {
    let mut rows = Vec::new();
    for list in lists {
        for row in kind.rows(list) {
            let mut row = row.clone();
            if let Some(obj) = row.as_object_mut() {
                obj.insert("season".to_string(), json!(list.season));
                obj.insert("round".to_string(), parse_round(&list.round));
            }
            rows.push(row);
        }
    }
    rows
}

/// Round numbers arrive as strings; store them as integers where possible.
fn parse_round(round: &str) -> Value {
    round
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(round.to_string()))
}
