//! Craft orders: tiered candidate lists, the order lifecycle, and the
//! stockpile resupply pass.
//!
//! An order carries an ordered candidate list ("best axe first"); the
//! processor walks the list and accepts the first success. When every
//! candidate fails and a stockpile zone is configured, one resupply pass
//! fetches raw materials and the same candidate list is retried once --
//! a single resupply per order, not per candidate, to avoid redundant
//! trips.
//!
//! Every terminal outcome produces exactly one chat acknowledgment.

use std::sync::Arc;

use tracing::{debug, warn};

use overseer_types::{expand_alias, IngredientRequirement, ItemCatalog, OrderId};
use overseer_world::{World, BASE_ZONE, STOCK_ZONE};

use overseer_logistics::{ItemFilter, LogisticsEngine};

use crate::engine::CraftEngine;
use crate::error::CraftError;

/// Raw materials fetched from the stockpile during a resupply pass.
///
/// A broad sweep of base resources; whatever the stockpile actually holds
/// comes back, the rest is ignored.
pub const RAW_MATERIALS_FETCH: &[&str] = &[
    "oak_log",
    "birch_log",
    "spruce_log",
    "jungle_log",
    "acacia_log",
    "dark_oak_log",
    "mangrove_log",
    "cherry_log",
    "cobblestone",
    "stone",
    "sand",
    "gravel",
    "dirt",
    "coal",
    "charcoal",
    "raw_iron",
    "iron_ingot",
    "raw_gold",
    "gold_ingot",
    "raw_copper",
    "copper_ingot",
    "diamond",
    "emerald",
    "lapis_lazuli",
    "redstone",
    "stick",
    "wheat",
    "oak_planks",
];

/// Units of each raw material requested per resupply pass.
pub const RESUPPLY_COUNT: u32 = 64;

/// A request to manufacture an item, with tiered fallback candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftOrder {
    /// Unique order id.
    pub id: OrderId,
    /// Candidate item names, best first; the first success wins.
    pub candidates: Vec<String>,
    /// Units requested.
    pub amount: u32,
}

impl CraftOrder {
    /// Build an order from a player-supplied item name or tier alias.
    ///
    /// Aliases fan out to their candidate list; concrete names become a
    /// single-candidate order. Candidates unknown to the catalog are
    /// dropped; returns `None` when nothing valid remains.
    pub fn resolve(input: &str, amount: u32, catalog: &ItemCatalog) -> Option<Self> {
        let normalized = input
            .trim()
            .to_ascii_lowercase()
            .replace("minecraft:", "")
            .replace(' ', "_");
        let candidates =
            expand_alias(&normalized).unwrap_or_else(|| vec![normalized.clone()]);
        let valid: Vec<String> = candidates
            .into_iter()
            .filter(|name| catalog.id_of(name).is_some())
            .collect();
        if valid.is_empty() {
            return None;
        }
        Some(Self {
            id: OrderId::new(),
            candidates: valid,
            amount: amount.max(1),
        })
    }
}

/// Lifecycle phase of a craft order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPhase {
    /// Queued, not yet started.
    Pending,
    /// Recursively resolving and manufacturing ingredients.
    ResolvingIngredients,
    /// Fetching raw materials from the stockpile (at most once per order).
    Resupplying,
    /// Traveling to the required station.
    StationTravel,
    /// Submitting the craft transaction.
    Crafting,
    /// Storing the finished goods.
    DepositingResult,
    /// Terminal: the order succeeded.
    Done,
    /// Terminal: the order failed.
    Failed,
}

impl OrderPhase {
    /// Whether the phase is terminal.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Events driving the order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    /// Processing began.
    Started,
    /// Every candidate failed for lack of materials.
    OutOfMaterials,
    /// The resupply pass finished (successfully or not).
    Resupplied,
    /// A candidate's ingredients are all present.
    IngredientsReady,
    /// The station was reached.
    StationReady,
    /// The craft transaction succeeded.
    Crafted,
    /// The finished goods were stored.
    ResultStored,
    /// Unrecoverable failure.
    Failure,
}

/// The order lifecycle transition function.
///
/// `Failure` is accepted from every non-terminal phase; terminal phases
/// absorb all events; any other mismatched (phase, event) pair stays put.
pub const fn next_phase(phase: OrderPhase, event: OrderEvent) -> OrderPhase {
    if phase.is_terminal() {
        return phase;
    }
    match (phase, event) {
        (_, OrderEvent::Failure) => OrderPhase::Failed,
        (OrderPhase::Pending, OrderEvent::Started)
        | (OrderPhase::Resupplying, OrderEvent::Resupplied) => OrderPhase::ResolvingIngredients,
        (OrderPhase::ResolvingIngredients, OrderEvent::OutOfMaterials) => OrderPhase::Resupplying,
        (OrderPhase::ResolvingIngredients, OrderEvent::IngredientsReady) => {
            OrderPhase::StationTravel
        }
        (OrderPhase::StationTravel, OrderEvent::StationReady) => OrderPhase::Crafting,
        (OrderPhase::Crafting, OrderEvent::Crafted) => OrderPhase::DepositingResult,
        (OrderPhase::DepositingResult, OrderEvent::ResultStored) => OrderPhase::Done,
        (current, _) => current,
    }
}

/// Terminal report for one processed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReport {
    /// The order this report is for.
    pub order_id: OrderId,
    /// Terminal phase: [`OrderPhase::Done`] or [`OrderPhase::Failed`].
    pub phase: OrderPhase,
    /// The candidate that was actually crafted, when successful.
    pub crafted: Option<String>,
}

/// Drives craft orders through their lifecycle.
pub struct OrderProcessor<W> {
    engine: Arc<CraftEngine<W>>,
    logistics: Arc<LogisticsEngine<W>>,
}

impl<W: World> OrderProcessor<W> {
    /// Assemble the processor from the two engines it sequences.
    pub const fn new(engine: Arc<CraftEngine<W>>, logistics: Arc<LogisticsEngine<W>>) -> Self {
        Self { engine, logistics }
    }

    /// Process one order to a terminal phase.
    pub async fn process(&self, order: &CraftOrder) -> OrderReport {
        let world = self.engine.world();
        let mut phase = next_phase(OrderPhase::Pending, OrderEvent::Started);
        let mut resupplied = false;

        loop {
            match self.try_candidates(order).await {
                Ok(Some(crafted)) => {
                    phase = next_phase(phase, OrderEvent::IngredientsReady);
                    phase = next_phase(phase, OrderEvent::StationReady);
                    phase = next_phase(phase, OrderEvent::Crafted);

                    let filter = ItemFilter::NameIs(crafted.clone());
                    match self.logistics.store_items_in_zone(BASE_ZONE, &filter).await {
                        Ok(_) => {}
                        Err(err) => {
                            warn!(error = %err, "could not store the finished goods");
                        }
                    }
                    phase = next_phase(phase, OrderEvent::ResultStored);
                    world.say(&format!("Crafted {}x {crafted}.", order.amount));
                    return OrderReport {
                        order_id: order.id,
                        phase,
                        crafted: Some(crafted),
                    };
                }
                Ok(None) => {
                    let stock_available = self
                        .logistics
                        .locations()
                        .has(STOCK_ZONE)
                        .await
                        .unwrap_or(false);
                    if !resupplied && stock_available {
                        phase = next_phase(phase, OrderEvent::OutOfMaterials);
                        world.say("Out of materials, checking the stockpile...");
                        let fetch = Self::resupply_requirements(self.engine.catalog());
                        if let Err(err) = self
                            .logistics
                            .retrieve_items_from_zone(STOCK_ZONE, &fetch)
                            .await
                        {
                            warn!(error = %err, "resupply pass failed");
                        }
                        resupplied = true;
                        phase = next_phase(phase, OrderEvent::Resupplied);
                        continue;
                    }

                    // Total failure: park whatever was gathered back in the
                    // stockpile so the inventory does not silt up.
                    phase = next_phase(phase, OrderEvent::Failure);
                    if stock_available {
                        if let Err(err) = self
                            .logistics
                            .store_items_in_zone(STOCK_ZONE, &ItemFilter::All)
                            .await
                        {
                            warn!(error = %err, "could not return gathered materials");
                        }
                    }
                    world.say("Could not craft any of the requested options.");
                    return OrderReport {
                        order_id: order.id,
                        phase,
                        crafted: None,
                    };
                }
                Err(err) => {
                    warn!(error = %err, "order aborted");
                    phase = next_phase(phase, OrderEvent::Failure);
                    world.say(&format!("Craft failed: {err}."));
                    return OrderReport {
                        order_id: order.id,
                        phase,
                        crafted: None,
                    };
                }
            }
        }
    }

    /// Try each candidate in order; first success wins.
    async fn try_candidates(&self, order: &CraftOrder) -> Result<Option<String>, CraftError> {
        for candidate in &order.candidates {
            match self.engine.craft_recursively(candidate, order.amount).await {
                Ok(true) => return Ok(Some(candidate.clone())),
                Ok(false) => debug!(candidate, "candidate not craftable, trying next"),
                Err(CraftError::DepthExceeded { item }) => {
                    // A looping branch disqualifies this candidate, not the
                    // whole order.
                    debug!(item = %item, "candidate hit the recursion bound");
                }
                Err(other) => return Err(other),
            }
        }
        Ok(None)
    }

    /// The broad raw-materials shopping list for a resupply pass.
    fn resupply_requirements(catalog: &ItemCatalog) -> Vec<IngredientRequirement> {
        RAW_MATERIALS_FETCH
            .iter()
            .filter_map(|name| catalog.id_of(name))
            .map(|id| IngredientRequirement::new(vec![id], RESUPPLY_COUNT))
            .collect()
    }
}
