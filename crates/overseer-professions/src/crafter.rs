//! The crafting-service role: a FIFO queue of craft orders processed
//! through the order pipeline.
//!
//! Other agents (and players) push orders by name or tier alias; each
//! order runs to a terminal outcome with its own acknowledgment. The
//! role's state machine is the order lifecycle itself
//! ([`overseer_crafting::OrderPhase`]).

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::info;

use overseer_types::ItemCatalog;
use overseer_world::World;

use overseer_crafting::{CraftOrder, OrderProcessor, OrderReport};

use crate::error::ProfessionError;
use crate::profession::{Profession, RoleKind};

/// The crafting-service driver.
pub struct Crafter<W> {
    world: Arc<W>,
    processor: OrderProcessor<W>,
    catalog: Arc<ItemCatalog>,
    enabled: bool,
    queue: VecDeque<CraftOrder>,
}

impl<W: World> Crafter<W> {
    /// Assemble the crafter with its collaborators.
    pub const fn new(
        world: Arc<W>,
        processor: OrderProcessor<W>,
        catalog: Arc<ItemCatalog>,
    ) -> Self {
        Self {
            world,
            processor,
            catalog,
            enabled: false,
            queue: VecDeque::new(),
        }
    }

    /// Queue an order by item name or tier alias.
    ///
    /// Returns false (with a chat acknowledgment) when nothing valid could
    /// be resolved from the input.
    pub fn add_order(&mut self, input: &str, amount: u32) -> bool {
        let Some(order) = CraftOrder::resolve(input, amount, &self.catalog) else {
            self.world.say("No valid item to craft in that request.");
            return false;
        };
        let first = order
            .candidates
            .first()
            .cloned()
            .unwrap_or_default();
        self.queue.push_back(order);
        self.world.say(&format!(
            "Queued: {first} (or a lower tier). Position {}.",
            self.queue.len()
        ));
        true
    }

    /// Process one order immediately, bypassing the queue.
    pub async fn process_order(&self, input: &str, amount: u32) -> Option<OrderReport> {
        let order = CraftOrder::resolve(input, amount, &self.catalog);
        let Some(order) = order else {
            self.world.say("No valid item to craft in that request.");
            return None;
        };
        Some(self.processor.process(&order).await)
    }

    /// Orders still waiting.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}

impl<W: World> Profession for Crafter<W> {
    fn role(&self) -> RoleKind {
        RoleKind::Crafter
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.world.say("Crafter enabled.");
        } else {
            // The queue survives a disable; only processing stops.
            self.world.cancel_navigation();
            self.world.say("Crafter disabled.");
        }
    }

    async fn run_cycle(&mut self) -> Result<(), ProfessionError> {
        if !self.enabled {
            return Ok(());
        }
        let Some(order) = self.queue.pop_front() else {
            return Ok(());
        };
        let report = self.processor.process(&order).await;
        info!(order = %report.order_id, phase = ?report.phase, "order finished");
        if self.queue.is_empty() {
            self.world.say("Order queue finished.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use overseer_types::{CategoryTable, RecipeBook};
    use overseer_world::{LocationStore, SimWorld};

    use overseer_crafting::CraftEngine;
    use overseer_logistics::LogisticsEngine;

    use super::*;

    fn crafter(tag: &str) -> (Arc<SimWorld>, Crafter<SimWorld>) {
        let world = Arc::new(SimWorld::vanilla());
        let unique = uuid::Uuid::new_v4();
        let path = std::env::temp_dir().join(format!("overseer-crafter-{tag}-{unique}.json"));
        let locations = Arc::new(LocationStore::new(path));
        let catalog = Arc::clone(world.catalog());
        let book = Arc::new(RecipeBook::vanilla_subset(&catalog));
        let engine = Arc::new(CraftEngine::new(
            Arc::clone(&world),
            Arc::clone(&locations),
            Arc::clone(&catalog),
            book,
        ));
        let logistics = Arc::new(LogisticsEngine::new(
            Arc::clone(&world),
            locations,
            Arc::clone(&catalog),
            Arc::new(CategoryTable::default()),
        ));
        let processor = OrderProcessor::new(engine, logistics);
        let crafter = Crafter::new(Arc::clone(&world), processor, catalog);
        (world, crafter)
    }

    #[test]
    fn invalid_orders_are_acknowledged_and_rejected() {
        let (world, mut crafter) = crafter("invalid");
        assert!(!crafter.add_order("philosopher_stone", 1));
        assert_eq!(crafter.queue_len(), 0);
        assert!(!world.chat_log().is_empty());
    }

    #[test]
    fn valid_orders_queue_up() {
        let (_, mut crafter) = crafter("queue");
        assert!(crafter.add_order("axe", 1));
        assert!(crafter.add_order("stick", 4));
        assert_eq!(crafter.queue_len(), 2);
    }

    #[tokio::test]
    async fn disabled_crafter_does_not_process() {
        let (world, mut crafter) = crafter("disabled");
        assert!(crafter.add_order("stick", 4));
        let ran = crafter.run_cycle().await;
        assert!(ran.is_ok());
        assert_eq!(crafter.queue_len(), 1);
        assert!(world.craft_log().is_empty());
    }

    #[tokio::test]
    async fn enabled_crafter_processes_the_queue() {
        let (world, mut crafter) = crafter("process");
        world.give("oak_planks", 2);
        crafter.set_enabled(true);
        assert!(crafter.add_order("stick", 4));
        let ran = crafter.run_cycle().await;
        assert!(ran.is_ok());
        assert_eq!(crafter.queue_len(), 0);
        assert_eq!(world.held("stick"), 4);
    }
}
