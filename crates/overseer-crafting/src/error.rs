//! Error types for the crafting engine.
//!
//! Expected shortfalls ("no recipe", "missing materials after trying
//! everything") are `Ok(false)` results, not errors; sibling ingredients
//! and lower-tier candidates can still be attempted after one. Errors here
//! either fail a single recursion branch (depth exceeded) or abort the
//! whole order (station and transaction failures).

use overseer_types::Station;
use overseer_world::{StoreError, WorldError};

use overseer_logistics::LogisticsError;

/// Errors that can occur while crafting.
#[derive(Debug, thiserror::Error)]
pub enum CraftError {
    /// The item name is not in the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// Recursive expansion exceeded the depth bound; almost certainly a
    /// circular recipe. Fails only the branch that hit the bound.
    #[error("craft recursion too deep for '{item}' (circular recipe?)")]
    DepthExceeded {
        /// The item whose expansion hit the bound.
        item: String,
    },

    /// No usable station block could be found or built.
    #[error("no {} available to craft at", station.block_name())]
    StationMissing {
        /// The station kind the recipe demands.
        station: Station,
    },

    /// A world transaction (navigation, craft, placement) failed.
    #[error(transparent)]
    World(#[from] WorldError),

    /// The location store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A logistics pass invoked by order processing failed outright.
    #[error(transparent)]
    Logistics(#[from] LogisticsError),
}
