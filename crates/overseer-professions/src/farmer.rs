//! The farming profession: harvest mature crops, bank the harvest, restock
//! seeds, and replant.
//!
//! Inside the farm every movement uses the careful profile (no digging, no
//! parkour, sneaking) so the agent never tramples farmland. The farm zone
//! (`"fazenda"`) is the role's required location: without it the role
//! disables itself.

use std::sync::Arc;

use tracing::debug;

use overseer_types::{BlockPos, IngredientRequirement, Zone};
use overseer_world::{MoveProfile, NavGoal, World, BASE_ZONE, FARM_ZONE, STOCK_ZONE};

use overseer_logistics::{ItemFilter, LogisticsEngine};

use crate::error::ProfessionError;
use crate::profession::{Profession, RoleKind};

/// The crop block this role works.
const CROP_BLOCK: &str = "wheat";

/// The seed item planted on farmland.
const SEED_ITEM: &str = "wheat_seeds";

/// The block crops grow on.
const FARMLAND_BLOCK: &str = "farmland";

/// Growth stage at which the crop is harvestable.
const MATURE_AGE: u8 = 7;

/// Radius around the agent for collecting harvest drops.
const DROP_COLLECT_RADIUS: u32 = 4;

/// Maximum planting distance; spots further away wait for a later pass.
const PLANT_RANGE: i64 = 40;

/// Tunable farming parameters.
#[derive(Debug, Clone)]
pub struct FarmerConfig {
    /// Seeds fetched per restock trip.
    pub seed_restock: u32,
    /// Free inventory slots below which the harvest is banked.
    pub min_free_slots: u32,
    /// Ticks to wait when the field needs nothing.
    pub idle_wait_ticks: u32,
}

impl Default for FarmerConfig {
    fn default() -> Self {
        Self {
            seed_restock: 64,
            min_free_slots: 2,
            idle_wait_ticks: 100,
        }
    }
}

/// Farmer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmerState {
    /// Disabled or waiting to start.
    Idle,
    /// Walking to the farm.
    GoFarm,
    /// Deciding what the field needs.
    CheckWork,
    /// Breaking a mature crop and collecting drops.
    Harvest,
    /// Walking to the base zone.
    GoBase,
    /// Banking the harvest.
    DepositAll,
    /// Checking the seed pouch.
    CheckSeeds,
    /// Walking to the stockpile.
    GoStock,
    /// Fetching seeds.
    GetSeeds,
    /// Planting an empty spot.
    Plant,
    /// Nothing to do; resting.
    Wait,
}

/// Events observed by the farmer driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmerEvent {
    /// The role was switched on.
    Enabled,
    /// Arrived at the farm (or already inside it).
    AtFarm,
    /// Travel failed.
    TravelFailed,
    /// The inventory is nearly full.
    InventoryFull,
    /// A mature crop was spotted.
    MatureCrop,
    /// Crop is held and should be banked.
    HoldingCrop,
    /// An empty farmland spot was spotted.
    PlantableSpot,
    /// The field needs nothing right now.
    NothingToDo,
    /// One harvest action finished.
    Harvested,
    /// Arrived at the base zone.
    AtBase,
    /// The harvest was banked.
    Deposited,
    /// Seeds are in the pouch.
    SeedsHeld,
    /// The pouch is empty.
    SeedsMissing,
    /// Arrived at the stockpile.
    AtStock,
    /// The seed fetch finished (with or without seeds).
    SeedsFetched,
    /// One planting action finished and more spots remain.
    PlantedMore,
    /// One planting action finished and the field is full.
    PlantedDone,
    /// The rest period ended.
    WaitOver,
}

/// The farmer transition function. Unmatched pairs stay put.
pub const fn next_state(state: FarmerState, event: FarmerEvent) -> FarmerState {
    match (state, event) {
        (FarmerState::Idle, FarmerEvent::Enabled)
        | (
            FarmerState::GoBase | FarmerState::GoStock,
            FarmerEvent::TravelFailed,
        )
        | (FarmerState::DepositAll, FarmerEvent::Deposited)
        | (FarmerState::GetSeeds, FarmerEvent::SeedsFetched) => FarmerState::GoFarm,
        (FarmerState::GoFarm, FarmerEvent::AtFarm)
        | (FarmerState::Harvest, FarmerEvent::Harvested)
        | (FarmerState::Plant, FarmerEvent::PlantedDone)
        | (FarmerState::Wait, FarmerEvent::WaitOver) => FarmerState::CheckWork,
        (FarmerState::GoFarm, FarmerEvent::TravelFailed) => FarmerState::Wait,
        (FarmerState::CheckWork, FarmerEvent::InventoryFull | FarmerEvent::HoldingCrop) => {
            FarmerState::GoBase
        }
        (FarmerState::CheckWork, FarmerEvent::MatureCrop) => FarmerState::Harvest,
        (FarmerState::CheckWork, FarmerEvent::PlantableSpot) => FarmerState::CheckSeeds,
        (FarmerState::CheckWork, FarmerEvent::NothingToDo) => FarmerState::Wait,
        (FarmerState::GoBase, FarmerEvent::AtBase) => FarmerState::DepositAll,
        (FarmerState::CheckSeeds, FarmerEvent::SeedsHeld)
        | (FarmerState::Plant, FarmerEvent::PlantedMore) => FarmerState::Plant,
        (FarmerState::CheckSeeds, FarmerEvent::SeedsMissing) => FarmerState::GoStock,
        (FarmerState::GoStock, FarmerEvent::AtStock) => FarmerState::GetSeeds,
        (current, _) => current,
    }
}

/// The farming profession driver.
pub struct Farmer<W> {
    world: Arc<W>,
    logistics: Arc<LogisticsEngine<W>>,
    config: FarmerConfig,
    enabled: bool,
    state: FarmerState,
    /// The crop or soil spot currently being worked.
    target: Option<BlockPos>,
}

impl<W: World> Farmer<W> {
    /// Assemble the farmer with its collaborators.
    pub fn new(world: Arc<W>, logistics: Arc<LogisticsEngine<W>>, config: FarmerConfig) -> Self {
        Self {
            world,
            logistics,
            config,
            enabled: false,
            state: FarmerState::Idle,
            target: None,
        }
    }

    /// The current state (exposed for the status report and tests).
    pub const fn state(&self) -> FarmerState {
        self.state
    }

    /// The farm zone; its absence is fatal for this role.
    async fn farm_zone(&self) -> Result<Zone, ProfessionError> {
        self.logistics.zone(FARM_ZONE).await.map_err(Into::into)
    }

    /// Find the farmland height at (x, z), scanning around the zone's
    /// origin height.
    fn farmland_y(&self, x: i32, z: i32, origin_y: i32) -> Option<i32> {
        (origin_y.saturating_sub(2)..=origin_y.saturating_add(2)).find(|y| {
            self.world
                .block_name_at(BlockPos::new(x, *y, z))
                .as_deref()
                == Some(FARMLAND_BLOCK)
        })
    }

    /// Scan the zone for a mature crop.
    fn scan_for_harvest(&self, zone: &Zone) -> Option<BlockPos> {
        self.scan_zone(zone, |above| {
            self.world.block_name_at(above).as_deref() == Some(CROP_BLOCK)
                && self.world.block_state_at(above) == Some(MATURE_AGE)
        })
    }

    /// Scan the zone for empty farmland within planting range.
    fn scan_for_planting(&self, zone: &Zone) -> Option<BlockPos> {
        let agent = self.world.position();
        self.scan_zone(zone, |above| {
            self.world.block_name_at(above).is_none() && agent.within(above, PLANT_RANGE)
        })
    }

    fn scan_zone(&self, zone: &Zone, accept: impl Fn(BlockPos) -> bool) -> Option<BlockPos> {
        let max_x = zone
            .origin
            .x
            .saturating_add(i32::try_from(zone.width).unwrap_or(0));
        let max_z = zone
            .origin
            .z
            .saturating_add(i32::try_from(zone.depth).unwrap_or(0));
        for x in zone.origin.x..max_x {
            for z in zone.origin.z..max_z {
                let Some(y) = self.farmland_y(x, z, zone.origin.y) else {
                    continue;
                };
                let above = BlockPos::new(x, y.saturating_add(1), z);
                if accept(above) {
                    return Some(above);
                }
            }
        }
        None
    }

    fn holds(&self, name: &str) -> bool {
        self.logistics
            .catalog()
            .id_of(name)
            .is_some_and(|id| self.world.count_items(&[id]) > 0)
    }

    async fn go_farm(&mut self) -> Result<FarmerEvent, ProfessionError> {
        let zone = self.farm_zone().await?;
        if self.world.position().within(zone.center(), 8) {
            self.world.set_sneak(true);
            return Ok(FarmerEvent::AtFarm);
        }
        match self
            .world
            .navigate(NavGoal::near(zone.origin, 2), MoveProfile::no_dig())
            .await
        {
            Ok(()) => {
                self.world.set_sneak(true);
                Ok(FarmerEvent::AtFarm)
            }
            Err(err) => {
                debug!(error = %err, "travel to farm failed");
                Ok(FarmerEvent::TravelFailed)
            }
        }
    }

    async fn check_work(&mut self) -> Result<FarmerEvent, ProfessionError> {
        self.world.set_sneak(true);
        let zone = self.farm_zone().await?;

        if self.world.empty_slots() < self.config.min_free_slots {
            return Ok(FarmerEvent::InventoryFull);
        }
        if let Some(crop) = self.scan_for_harvest(&zone) {
            self.target = Some(crop);
            return Ok(FarmerEvent::MatureCrop);
        }
        if self.holds(CROP_BLOCK) {
            return Ok(FarmerEvent::HoldingCrop);
        }
        if let Some(spot) = self.scan_for_planting(&zone) {
            self.target = Some(spot);
            return Ok(FarmerEvent::PlantableSpot);
        }
        Ok(FarmerEvent::NothingToDo)
    }

    async fn harvest(&mut self) -> Result<FarmerEvent, ProfessionError> {
        let Some(crop) = self.target.take() else {
            return Ok(FarmerEvent::Harvested);
        };
        // The crop may have been taken while we walked over.
        if self.world.block_name_at(crop).as_deref() != Some(CROP_BLOCK) {
            return Ok(FarmerEvent::Harvested);
        }
        if let Err(err) = self
            .world
            .navigate(NavGoal::near(crop, 2), MoveProfile::careful())
            .await
        {
            debug!(error = %err, "could not reach the crop");
            return Ok(FarmerEvent::Harvested);
        }
        if let Err(err) = self.world.dig(crop).await {
            debug!(error = %err, "harvest dig failed");
            return Ok(FarmerEvent::Harvested);
        }
        // Walk over nearby drops so nothing rots on the ground.
        for drop in self.world.item_drops(DROP_COLLECT_RADIUS) {
            let _ = self
                .world
                .navigate(NavGoal::near(drop, 1), MoveProfile::careful())
                .await;
        }
        Ok(FarmerEvent::Harvested)
    }

    async fn go_base(&mut self) -> Result<FarmerEvent, ProfessionError> {
        self.world.set_sneak(false);
        let zone = self.logistics.zone(BASE_ZONE).await?;
        match self
            .world
            .navigate(NavGoal::near(zone.center(), 1), MoveProfile::no_dig())
            .await
        {
            Ok(()) => Ok(FarmerEvent::AtBase),
            Err(err) => {
                debug!(error = %err, "travel to base failed");
                Ok(FarmerEvent::TravelFailed)
            }
        }
    }

    async fn deposit_all(&mut self) -> Result<FarmerEvent, ProfessionError> {
        let crop = ItemFilter::NameIs(CROP_BLOCK.to_owned());
        self.logistics.store_items_in_zone(BASE_ZONE, &crop).await?;
        Ok(FarmerEvent::Deposited)
    }

    fn check_seeds(&self) -> FarmerEvent {
        if self.holds(SEED_ITEM) {
            FarmerEvent::SeedsHeld
        } else {
            FarmerEvent::SeedsMissing
        }
    }

    async fn go_stock(&mut self) -> Result<FarmerEvent, ProfessionError> {
        self.world.set_sneak(false);
        let zone = self.logistics.zone(STOCK_ZONE).await?;
        match self
            .world
            .navigate(NavGoal::near(zone.center(), 1), MoveProfile::no_dig())
            .await
        {
            Ok(()) => Ok(FarmerEvent::AtStock),
            Err(err) => {
                debug!(error = %err, "travel to stockpile failed");
                Ok(FarmerEvent::TravelFailed)
            }
        }
    }

    async fn get_seeds(&mut self) -> Result<FarmerEvent, ProfessionError> {
        let Some(seed_id) = self.logistics.catalog().id_of(SEED_ITEM) else {
            return Ok(FarmerEvent::SeedsFetched);
        };
        let wanted = vec![IngredientRequirement::new(
            vec![seed_id],
            self.config.seed_restock,
        )];
        let _ = self
            .logistics
            .retrieve_items_from_zone(STOCK_ZONE, &wanted)
            .await?;
        Ok(FarmerEvent::SeedsFetched)
    }

    async fn plant(&mut self) -> Result<FarmerEvent, ProfessionError> {
        self.world.set_sneak(true);
        let zone = self.farm_zone().await?;

        if let Some(spot) = self.target.take() {
            if self.holds(SEED_ITEM) {
                let planted = self.plant_at(spot).await;
                if !planted {
                    debug!(spot = %spot, "planting failed, moving on");
                }
            } else {
                return Ok(FarmerEvent::PlantedDone);
            }
        }

        // Line up the next hole immediately instead of re-walking the
        // whole decision tree.
        match self.scan_for_planting(&zone) {
            Some(next) => {
                self.target = Some(next);
                Ok(FarmerEvent::PlantedMore)
            }
            None => Ok(FarmerEvent::PlantedDone),
        }
    }

    async fn plant_at(&self, spot: BlockPos) -> bool {
        let Some(seed_id) = self.logistics.catalog().id_of(SEED_ITEM) else {
            return false;
        };
        if self
            .world
            .navigate(NavGoal::near(spot, 3), MoveProfile::careful())
            .await
            .is_err()
        {
            return false;
        }
        // The soil must still be farmland by the time we arrive.
        let below = spot.offset(0, -1, 0);
        if self.world.block_name_at(below).as_deref() != Some(FARMLAND_BLOCK) {
            return false;
        }
        if self.world.equip(seed_id).await.is_err() {
            return false;
        }
        self.world.place_block(spot, seed_id).await.is_ok()
    }

    async fn rest(&mut self) -> Result<FarmerEvent, ProfessionError> {
        self.world.set_sneak(false);
        self.world.wait_ticks(self.config.idle_wait_ticks).await;
        Ok(FarmerEvent::WaitOver)
    }
}

impl<W: World> Profession for Farmer<W> {
    fn role(&self) -> RoleKind {
        RoleKind::Farmer
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
            self.state = next_state(FarmerState::Idle, FarmerEvent::Enabled);
            self.world.say("Farmer enabled.");
        } else {
            self.state = FarmerState::Idle;
            self.target = None;
            self.world.set_sneak(false);
            self.world.cancel_navigation();
            self.world.say("Farmer disabled.");
        }
    }

    async fn run_cycle(&mut self) -> Result<(), ProfessionError> {
        if !self.enabled {
            return Ok(());
        }
        let event = match self.state {
            FarmerState::Idle => FarmerEvent::Enabled,
            FarmerState::GoFarm => self.go_farm().await?,
            FarmerState::CheckWork => self.check_work().await?,
            FarmerState::Harvest => self.harvest().await?,
            FarmerState::GoBase => self.go_base().await?,
            FarmerState::DepositAll => self.deposit_all().await?,
            FarmerState::CheckSeeds => self.check_seeds(),
            FarmerState::GoStock => self.go_stock().await?,
            FarmerState::GetSeeds => self.get_seeds().await?,
            FarmerState::Plant => self.plant().await?,
            FarmerState::Wait => self.rest().await?,
        };
        self.state = next_state(self.state, event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harvest_loop_transitions() {
        let mut state = FarmerState::Idle;
        state = next_state(state, FarmerEvent::Enabled);
        assert_eq!(state, FarmerState::GoFarm);
        state = next_state(state, FarmerEvent::AtFarm);
        assert_eq!(state, FarmerState::CheckWork);
        state = next_state(state, FarmerEvent::MatureCrop);
        assert_eq!(state, FarmerState::Harvest);
        state = next_state(state, FarmerEvent::Harvested);
        assert_eq!(state, FarmerState::CheckWork);
    }

    #[test]
    fn banking_loop_transitions() {
        let mut state = next_state(FarmerState::CheckWork, FarmerEvent::HoldingCrop);
        assert_eq!(state, FarmerState::GoBase);
        state = next_state(state, FarmerEvent::AtBase);
        assert_eq!(state, FarmerState::DepositAll);
        state = next_state(state, FarmerEvent::Deposited);
        assert_eq!(state, FarmerState::GoFarm);
    }

    #[test]
    fn seed_restock_transitions() {
        let mut state = next_state(FarmerState::CheckWork, FarmerEvent::PlantableSpot);
        assert_eq!(state, FarmerState::CheckSeeds);
        state = next_state(state, FarmerEvent::SeedsMissing);
        assert_eq!(state, FarmerState::GoStock);
        state = next_state(state, FarmerEvent::AtStock);
        assert_eq!(state, FarmerState::GetSeeds);
        state = next_state(state, FarmerEvent::SeedsFetched);
        assert_eq!(state, FarmerState::GoFarm);
    }

    #[test]
    fn planting_chains_until_field_full() {
        let mut state = next_state(FarmerState::CheckSeeds, FarmerEvent::SeedsHeld);
        assert_eq!(state, FarmerState::Plant);
        state = next_state(state, FarmerEvent::PlantedMore);
        assert_eq!(state, FarmerState::Plant);
        state = next_state(state, FarmerEvent::PlantedDone);
        assert_eq!(state, FarmerState::CheckWork);
    }

    #[test]
    fn idle_field_rests_then_rechecks() {
        let mut state = next_state(FarmerState::CheckWork, FarmerEvent::NothingToDo);
        assert_eq!(state, FarmerState::Wait);
        state = next_state(state, FarmerEvent::WaitOver);
        assert_eq!(state, FarmerState::CheckWork);
    }

    #[test]
    fn unreachable_farm_waits() {
        assert_eq!(
            next_state(FarmerState::GoFarm, FarmerEvent::TravelFailed),
            FarmerState::Wait
        );
    }
}
