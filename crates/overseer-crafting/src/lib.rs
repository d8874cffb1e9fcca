//! Recursive crafting for the Overseer runtime.
//!
//! Turning "make me an axe" into reality takes three layers:
//!
//! - the [`resolver`] decides what is missing for one recipe (pure math),
//! - the [`engine`] recursively manufactures missing ingredients, bottoming
//!   out at raw materials, then performs the physical craft at a station,
//! - the [`orders`] layer runs tiered candidate lists with a single
//!   stockpile resupply pass and deposits the result.
//!
//! # Modules
//!
//! - [`resolver`] -- Deficit evaluation ([`evaluate`], [`Evaluation`])
//! - [`engine`] -- [`CraftEngine`] and the recursion guard
//! - [`orders`] -- [`CraftOrder`], [`OrderPhase`], [`OrderProcessor`]
//! - [`error`] -- [`CraftError`]

pub mod engine;
pub mod error;
pub mod orders;
pub mod resolver;

pub use engine::{CraftEngine, CIRCULAR_RAW_MATERIALS, MAX_CRAFT_DEPTH};
pub use error::CraftError;
pub use orders::{next_phase, CraftOrder, OrderEvent, OrderPhase, OrderProcessor, OrderReport};
pub use resolver::{deficits_for_recipe, evaluate, Evaluation};
