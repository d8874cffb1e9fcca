//! The logistics engine: retrieve, store, dump, and equip operations.
//!
//! All operations share the same discipline: containers are visited
//! nearest-first, every opened container is closed on every exit path, and
//! per-item transaction errors are swallowed so one full chest or missing
//! stack never aborts a whole pass. Partial progress is kept, never rolled
//! back.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use overseer_types::{
    material_rank, CategoryTable, IngredientRequirement, ItemCatalog, ItemStack, Zone,
};
use overseer_world::{LocationStore, MoveProfile, NavGoal, World};

use crate::discovery::containers_in_zone;
use crate::error::LogisticsError;
use crate::filter::ItemFilter;

/// Moves resources between the agent's inventory and zone containers.
pub struct LogisticsEngine<W> {
    world: Arc<W>,
    locations: Arc<LocationStore>,
    catalog: Arc<ItemCatalog>,
    categories: Arc<CategoryTable>,
}

impl<W: World> LogisticsEngine<W> {
    /// Assemble the engine from its collaborators.
    pub const fn new(
        world: Arc<W>,
        locations: Arc<LocationStore>,
        catalog: Arc<ItemCatalog>,
        categories: Arc<CategoryTable>,
    ) -> Self {
        Self {
            world,
            locations,
            catalog,
            categories,
        }
    }

    /// The world handle this engine operates on.
    pub const fn world(&self) -> &Arc<W> {
        &self.world
    }

    /// The item catalog in use.
    pub const fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// The category taxonomy in use.
    pub const fn categories(&self) -> &Arc<CategoryTable> {
        &self.categories
    }

    /// The location store in use.
    pub const fn locations(&self) -> &Arc<LocationStore> {
        &self.locations
    }

    /// Resolve a zone name to its bounding region.
    pub async fn zone(&self, zone_name: &str) -> Result<Zone, LogisticsError> {
        self.locations
            .get(zone_name)
            .await?
            .map(|place| place.zone())
            .ok_or_else(|| LogisticsError::ZoneNotFound(zone_name.to_owned()))
    }

    /// Withdraw items from a zone's containers until the requirements are
    /// met or the containers are exhausted.
    ///
    /// Remaining counts only ever decrease. Returns `Ok(true)` iff every
    /// requirement reached exactly zero; whatever was retrieved stays in
    /// the inventory either way.
    pub async fn retrieve_items_from_zone(
        &self,
        zone_name: &str,
        requirements: &[IngredientRequirement],
    ) -> Result<bool, LogisticsError> {
        let mut outstanding: Vec<IngredientRequirement> = requirements
            .iter()
            .filter(|req| !req.is_met())
            .cloned()
            .collect();
        if outstanding.is_empty() {
            return Ok(true);
        }

        let zone = self.zone(zone_name).await?;
        let containers = containers_in_zone(self.world.as_ref(), &zone);
        if containers.is_empty() {
            debug!(zone = zone_name, "no containers found for retrieval");
            return Ok(false);
        }

        for pos in containers {
            if outstanding.iter().all(IngredientRequirement::is_met) {
                break;
            }
            if let Err(err) = self
                .world
                .navigate(NavGoal::near(pos, 1), MoveProfile::no_dig())
                .await
            {
                debug!(container = %pos, error = %err, "skipping unreachable container");
                continue;
            }
            let contents = match self.world.open_container(pos).await {
                Ok(contents) => contents,
                Err(err) => {
                    debug!(container = %pos, error = %err, "container refused to open");
                    continue;
                }
            };

            let mut available: BTreeMap<_, _> = contents
                .iter()
                .map(|stack| (stack.id, stack.count))
                .collect();

            for req in &mut outstanding {
                for id in req.acceptable.clone() {
                    if req.is_met() {
                        break;
                    }
                    let have = available.get(&id).copied().unwrap_or(0);
                    if have == 0 {
                        continue;
                    }
                    let take = have.min(req.count);
                    match self.world.withdraw(pos, id, take).await {
                        Ok(()) => {
                            req.count = req.count.saturating_sub(take);
                            available.insert(id, have.saturating_sub(take));
                            debug!(item = %id, took = take, remaining = req.count, "withdrew from container");
                        }
                        Err(err) => {
                            // Per-item errors are tolerated; the pass continues.
                            debug!(item = %id, error = %err, "withdraw failed");
                        }
                    }
                }
            }

            self.world.close_container(pos).await;
        }

        Ok(outstanding.iter().all(IngredientRequirement::is_met))
    }

    /// Deposit every held item matching the filter into the zone's
    /// containers.
    ///
    /// Returns `Ok(true)` iff no matching item remains in the inventory
    /// afterwards.
    pub async fn store_items_in_zone(
        &self,
        zone_name: &str,
        filter: &ItemFilter,
    ) -> Result<bool, LogisticsError> {
        if self.matching_items(filter).is_empty() {
            return Ok(true);
        }

        let zone = self.zone(zone_name).await?;
        let containers = containers_in_zone(self.world.as_ref(), &zone);
        if containers.is_empty() {
            warn!(zone = zone_name, "no containers found for storage");
            return Ok(false);
        }

        for pos in containers {
            let to_deposit = self.matching_items(filter);
            if to_deposit.is_empty() {
                break;
            }
            if let Err(err) = self
                .world
                .navigate(NavGoal::near(pos, 1), MoveProfile::no_dig())
                .await
            {
                debug!(container = %pos, error = %err, "skipping unreachable container");
                continue;
            }
            if let Err(err) = self.world.open_container(pos).await {
                debug!(container = %pos, error = %err, "container refused to open");
                continue;
            }
            for stack in &to_deposit {
                self.deposit_chunked(pos, stack).await;
            }
            self.world.close_container(pos).await;
        }

        Ok(self.matching_items(filter).is_empty())
    }

    /// Deposit the whole inventory into a zone (emergency offload).
    pub async fn dump_inventory(&self, zone_name: &str) -> Result<bool, LogisticsError> {
        self.store_items_in_zone(zone_name, &ItemFilter::All).await
    }

    /// Equip the best held tool of a kind by material tier.
    ///
    /// Returns false when no matching tool is held or the equip fails.
    pub async fn equip_best_tool(&self, tool_kind: &str) -> bool {
        let mut tools: Vec<ItemStack> = self
            .world
            .inventory()
            .into_iter()
            .filter(|stack| stack.name.contains(tool_kind))
            .collect();
        tools.sort_by_key(|stack| material_rank(&stack.name));
        let Some(best) = tools.first() else {
            return false;
        };
        self.world.equip(best.id).await.is_ok()
    }

    /// Held stacks matching a filter.
    pub fn matching_items(&self, filter: &ItemFilter) -> Vec<ItemStack> {
        self.world
            .inventory()
            .into_iter()
            .filter(|stack| filter.matches(stack))
            .collect()
    }

    /// Deposit one stack in chunks no larger than its stack limit.
    ///
    /// Stops at the first rejected chunk (container full); the remainder
    /// stays in the inventory for the next container.
    pub(crate) async fn deposit_chunked(&self, pos: overseer_types::BlockPos, stack: &ItemStack) {
        let limit = self.catalog.stack_size_of(stack.id).max(1);
        let mut remaining = stack.count;
        while remaining > 0 {
            let chunk = remaining.min(limit);
            match self.world.deposit(pos, stack.id, chunk).await {
                Ok(()) => remaining = remaining.saturating_sub(chunk),
                Err(err) => {
                    debug!(item = %stack.id, error = %err, "deposit failed, moving on");
                    break;
                }
            }
        }
    }
}
