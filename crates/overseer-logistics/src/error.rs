//! Error types for the logistics engine.
//!
//! Expected shortfalls (not enough stock, containers full) are reported as
//! `Ok(false)` results, not errors. Errors here mean the operation could not
//! meaningfully run at all: the zone is not configured, or the location
//! store itself failed.

use overseer_world::StoreError;

/// Errors that can occur during logistics operations.
#[derive(Debug, thiserror::Error)]
pub enum LogisticsError {
    /// The named zone does not exist in the location store.
    ///
    /// This is a configuration error; professions treat it as fatal and
    /// disable themselves rather than operate blind.
    #[error("zone '{0}' is not configured")]
    ZoneNotFound(String),

    /// The location store failed to load or persist.
    #[error(transparent)]
    Store(#[from] StoreError),
}
