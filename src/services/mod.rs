// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - upstream clients and the refresh pipeline.

pub mod ergast;
pub mod openf1;
pub mod refresh;
pub mod transform;

pub use ergast::ErgastClient;
pub use openf1::OpenF1Client;
pub use refresh::RefreshService;
