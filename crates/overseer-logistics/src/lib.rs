//! Zone-scoped container logistics.
//!
//! Moves resources between an agent's inventory and the storage containers
//! inside a named zone: supplying missing crafting ingredients, offloading
//! finished goods and gathered materials, and keeping the central stockpile
//! sorted by category.
//!
//! # Modules
//!
//! - [`discovery`] -- Finding containers inside a zone's bounding box
//! - [`filter`] -- Declarative item filters for deposit passes
//! - [`transfer`] -- [`LogisticsEngine`]: retrieve, store, dump, equip
//! - [`stock`] -- The stock-keeper's category/priority distribution policy
//! - [`error`] -- [`LogisticsError`]

pub mod discovery;
pub mod error;
pub mod filter;
pub mod stock;
pub mod transfer;

pub use discovery::{containers_in_zone, CONTAINER_KINDS, CONTAINER_SEARCH_CAP, CONTAINER_SEARCH_RADIUS};
pub use error::LogisticsError;
pub use filter::ItemFilter;
pub use transfer::LogisticsEngine;
