//! Database layer (MongoDB).

pub mod mongo;

pub use mongo::MongoDb;

/// Collection names as constants.
pub mod collections {
    pub const DRIVERS: &str = "drivers";
    /// Derived from drivers; no independent source of truth
    pub const TEAMS: &str = "teams";
    pub const SESSIONS: &str = "sessions";
    pub const RESULTS: &str = "results";
    pub const QUALIFYING_RESULTS: &str = "qualifying_results";
    pub const SPRINT_RESULTS: &str = "sprint_results";
    pub const DRIVER_STANDINGS: &str = "driver_standings";
    pub const CONSTRUCTOR_STANDINGS: &str = "constructor_standings";

    /// Every collection the query API is allowed to read.
    pub const ALL: &[&str] = &[
        DRIVERS,
        TEAMS,
        SESSIONS,
        RESULTS,
        QUALIFYING_RESULTS,
        SPRINT_RESULTS,
        DRIVER_STANDINGS,
        CONSTRUCTOR_STANDINGS,
    ];
}
