//! Registry and lifecycle over the five profession state machines.
//!
//! The manager owns one machine per role, all built up-front with their
//! injected collaborators and all starting disabled. `tick` runs at most
//! one cycle per enabled role, sequentially -- a single agent never has
//! two work actions in flight.
//!
//! Cycle errors are transient by default (logged, short wait, retried next
//! tick); missing-location errors disable the role with a clear report,
//! since continuing would mean operating blind.

use std::sync::Arc;

use tracing::warn;

use overseer_types::{CategoryTable, ItemCatalog, RecipeBook};
use overseer_world::{LocationStore, World};

use overseer_crafting::{CraftEngine, OrderProcessor};
use overseer_logistics::LogisticsEngine;

use crate::crafter::Crafter;
use crate::error::ProfessionError;
use crate::farmer::{Farmer, FarmerConfig};
use crate::miner::{Miner, MinerConfig};
use crate::profession::{Profession, RoleKind};
use crate::stockkeeper::{Stockkeeper, StockkeeperConfig};
use crate::woodcutter::{Woodcutter, WoodcutterConfig};

/// Ticks to wait after a transient cycle error.
const ERROR_BACKOFF_TICKS: u32 = 40;

/// Owns and drives the profession machines for one agent.
pub struct ProfessionManager<W> {
    world: Arc<W>,
    miner: Miner<W>,
    woodcutter: Woodcutter<W>,
    farmer: Farmer<W>,
    stockkeeper: Stockkeeper<W>,
    crafter: Crafter<W>,
}

impl<W: World> ProfessionManager<W> {
    /// Build every role with dependency-injected collaborators.
    pub fn new(
        world: Arc<W>,
        locations: Arc<LocationStore>,
        catalog: Arc<ItemCatalog>,
        book: Arc<RecipeBook>,
        categories: Arc<CategoryTable>,
    ) -> Self {
        let logistics = Arc::new(LogisticsEngine::new(
            Arc::clone(&world),
            Arc::clone(&locations),
            Arc::clone(&catalog),
            categories,
        ));
        let engine = Arc::new(CraftEngine::new(
            Arc::clone(&world),
            locations,
            Arc::clone(&catalog),
            book,
        ));
        let processor = OrderProcessor::new(engine, Arc::clone(&logistics));

        Self {
            miner: Miner::new(
                Arc::clone(&world),
                Arc::clone(&logistics),
                MinerConfig::default(),
            ),
            woodcutter: Woodcutter::new(
                Arc::clone(&world),
                Arc::clone(&logistics),
                WoodcutterConfig::default(),
            ),
            farmer: Farmer::new(
                Arc::clone(&world),
                Arc::clone(&logistics),
                FarmerConfig::default(),
            ),
            stockkeeper: Stockkeeper::new(
                Arc::clone(&world),
                Arc::clone(&logistics),
                StockkeeperConfig::default(),
            ),
            crafter: Crafter::new(Arc::clone(&world), processor, catalog),
            world,
        }
    }

    /// Enable a role. Returns false for roles that were already enabled.
    pub fn enable(&mut self, role: RoleKind) -> bool {
        if self.is_enabled(role) {
            return false;
        }
        self.machine_mut(role).set_enabled(true);
        true
    }

    /// Disable a role. Returns false for roles that were already disabled.
    pub fn disable(&mut self, role: RoleKind) -> bool {
        if !self.is_enabled(role) {
            return false;
        }
        self.machine_mut(role).set_enabled(false);
        true
    }

    /// Whether a role is enabled.
    pub fn is_enabled(&self, role: RoleKind) -> bool {
        match role {
            RoleKind::Miner => self.miner.is_enabled(),
            RoleKind::Woodcutter => self.woodcutter.is_enabled(),
            RoleKind::Farmer => self.farmer.is_enabled(),
            RoleKind::Stockkeeper => self.stockkeeper.is_enabled(),
            RoleKind::Crafter => self.crafter.is_enabled(),
        }
    }

    /// All currently enabled roles.
    pub fn list_enabled(&self) -> Vec<RoleKind> {
        RoleKind::ALL
            .iter()
            .copied()
            .filter(|role| self.is_enabled(*role))
            .collect()
    }

    /// The crafting-service role (for queueing orders).
    pub const fn crafter_mut(&mut self) -> &mut Crafter<W> {
        &mut self.crafter
    }

    /// Run one cycle for every enabled role.
    pub async fn tick(&mut self) {
        for role in RoleKind::ALL {
            self.run_role(*role).await;
        }
    }

    fn machine_mut(&mut self, role: RoleKind) -> &mut dyn ProfessionObject {
        match role {
            RoleKind::Miner => &mut self.miner,
            RoleKind::Woodcutter => &mut self.woodcutter,
            RoleKind::Farmer => &mut self.farmer,
            RoleKind::Stockkeeper => &mut self.stockkeeper,
            RoleKind::Crafter => &mut self.crafter,
        }
    }

    async fn run_role(&mut self, role: RoleKind) {
        if !self.is_enabled(role) {
            return;
        }
        let result = match role {
            RoleKind::Miner => self.miner.run_cycle().await,
            RoleKind::Woodcutter => self.woodcutter.run_cycle().await,
            RoleKind::Farmer => self.farmer.run_cycle().await,
            RoleKind::Stockkeeper => self.stockkeeper.run_cycle().await,
            RoleKind::Crafter => self.crafter.run_cycle().await,
        };
        if let Err(err) = result {
            if err.is_fatal() {
                self.world
                    .say(&format!("{role} disabled: {err}. Fix the setup and re-enable."));
                self.machine_mut(role).set_enabled(false);
            } else {
                warn!(role = %role, error = %err, "cycle failed, backing off");
                self.world.wait_ticks(ERROR_BACKOFF_TICKS).await;
            }
        }
    }
}

/// Object-safe subset of [`Profession`] used for uniform enable/disable.
trait ProfessionObject {
    fn set_enabled(&mut self, enabled: bool);
}

impl<T: Profession> ProfessionObject for T {
    fn set_enabled(&mut self, enabled: bool) {
        Profession::set_enabled(self, enabled);
    }
}
