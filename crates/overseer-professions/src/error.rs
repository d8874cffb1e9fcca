//! Error types for the profession layer.
//!
//! Profession cycles fail in two ways. Missing required locations are
//! configuration errors: continuing would mean operating blind, so the
//! role disables itself. Everything else (world transactions, store I/O,
//! engine failures) is transient: the manager logs it, waits, and the next
//! cycle retries.

use overseer_crafting::CraftError;
use overseer_logistics::LogisticsError;
use overseer_world::{StoreError, WorldError};

/// Errors surfaced by a profession cycle.
#[derive(Debug, thiserror::Error)]
pub enum ProfessionError {
    /// A location the role depends on is not configured.
    #[error("required location '{0}' is not configured")]
    MissingLocation(String),

    /// A crafting operation failed.
    #[error(transparent)]
    Crafting(#[from] CraftError),

    /// A world transaction failed.
    #[error(transparent)]
    World(#[from] WorldError),

    /// The location store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProfessionError {
    /// Whether the role should disable itself instead of retrying.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingLocation(_))
    }
}

impl From<LogisticsError> for ProfessionError {
    fn from(err: LogisticsError) -> Self {
        match err {
            LogisticsError::ZoneNotFound(name) => Self::MissingLocation(name),
            LogisticsError::Store(err) => Self::Store(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_location_is_fatal() {
        let err = ProfessionError::MissingLocation("fazenda".to_owned());
        assert!(err.is_fatal());
    }

    #[test]
    fn zone_not_found_maps_to_missing_location() {
        let err: ProfessionError =
            LogisticsError::ZoneNotFound("estoque".to_owned()).into();
        assert!(matches!(err, ProfessionError::MissingLocation(name) if name == "estoque"));
    }
}
