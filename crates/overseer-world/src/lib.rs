//! World access layer for the Overseer runtime.
//!
//! Everything the professions and engines do to the game world goes through
//! the [`World`] trait: perception, navigation, container transactions,
//! crafting, digging. The connected game client implements it in production;
//! [`SimWorld`] implements it in memory for tests and dry runs.
//!
//! # Modules
//!
//! - [`world`] -- The [`World`] trait, navigation goals, movement profiles
//! - [`error`] -- [`WorldError`], the transaction-level failure taxonomy
//! - [`locations`] -- [`LocationStore`], the persisted name -> place mapping
//! - [`sim`] -- [`SimWorld`], the deterministic in-memory world

pub mod error;
pub mod locations;
pub mod sim;
pub mod world;

pub use error::WorldError;
pub use locations::{LocationStore, StoreError, BASE_ZONE, FARM_ZONE, STOCK_ZONE, WORKBENCH};
pub use sim::SimWorld;
pub use world::{MoveProfile, NavGoal, World};
