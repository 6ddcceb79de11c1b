// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod ergast;

pub use ergast::{ErgastPage, ErgastResponse, Race, ResultKind, StandingsKind, StandingsList};
