//! Deterministic in-memory [`World`] implementation.
//!
//! `SimWorld` backs every integration test in the workspace and the runner's
//! dry-run mode. It models exactly as much of the game as the professions
//! exercise: an inventory with slot accounting, named blocks, containers
//! with contents, teleporting navigation, and recipe-checked crafting.
//!
//! Failure injection hooks (unreachable positions, jammed containers,
//! rejected crafts) let tests drive the engines through their recovery
//! paths without a game server.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use overseer_types::{BlockPos, ItemCatalog, ItemId, ItemStack, Recipe};

use crate::error::WorldError;
use crate::world::{MoveProfile, NavGoal, World};

/// Number of inventory slots an agent carries.
pub const INVENTORY_SLOTS: u32 = 36;

#[derive(Debug, Default)]
struct SimState {
    position: BlockPos,
    inventory: BTreeMap<ItemId, u32>,
    blocks: BTreeMap<BlockPos, String>,
    block_states: BTreeMap<BlockPos, u8>,
    drops: BTreeMap<BlockPos, (ItemId, u32)>,
    containers: BTreeMap<BlockPos, BTreeMap<ItemId, u32>>,
    open_container: Option<BlockPos>,
    sneaking: bool,
    equipped: Option<ItemId>,
    // Failure injection
    unreachable: BTreeSet<BlockPos>,
    jammed_containers: BTreeSet<BlockPos>,
    full_containers: BTreeSet<BlockPos>,
    reject_crafts: bool,
    // Observation log
    chat: Vec<String>,
    craft_log: Vec<(ItemId, u32)>,
    navigations: u32,
    container_opens: u32,
    container_closes: u32,
    ticks_waited: u64,
}

/// In-memory world with failure injection.
#[derive(Debug)]
pub struct SimWorld {
    catalog: Arc<ItemCatalog>,
    state: Mutex<SimState>,
}

impl SimWorld {
    /// Create an empty world over the given catalog.
    pub fn new(catalog: Arc<ItemCatalog>) -> Self {
        Self {
            catalog,
            state: Mutex::new(SimState::default()),
        }
    }

    /// Convenience constructor over the built-in vanilla-subset catalog.
    pub fn vanilla() -> Self {
        Self::new(Arc::new(ItemCatalog::vanilla_subset()))
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The catalog this world resolves names against.
    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    // --- Setup ---

    /// Teleport the agent.
    pub fn set_position(&self, pos: BlockPos) {
        self.lock().position = pos;
    }

    /// Add items to the inventory by name. Returns false for unknown names.
    pub fn give(&self, name: &str, count: u32) -> bool {
        let Some(id) = self.catalog.id_of(name) else {
            return false;
        };
        let mut state = self.lock();
        let entry = state.inventory.entry(id).or_insert(0);
        *entry = entry.saturating_add(count);
        true
    }

    /// Remove all items from the inventory.
    pub fn clear_inventory(&self) {
        self.lock().inventory.clear();
    }

    /// Set a named block at a position.
    pub fn set_block(&self, pos: BlockPos, name: &str) {
        self.lock().blocks.insert(pos, name.to_owned());
    }

    /// Remove the block at a position.
    pub fn clear_block(&self, pos: BlockPos) {
        self.lock().blocks.remove(&pos);
    }

    /// Set a block's state value (crop growth stage and the like).
    pub fn set_block_state(&self, pos: BlockPos, state: u8) {
        self.lock().block_states.insert(pos, state);
    }

    /// Drop an item entity at a position. Unknown names are ignored.
    pub fn add_drop(&self, pos: BlockPos, name: &str, count: u32) {
        if let Some(id) = self.catalog.id_of(name) {
            self.lock().drops.insert(pos, (id, count));
        }
    }

    /// Place a chest at `pos` holding the given contents.
    ///
    /// Unknown item names are skipped.
    pub fn add_container(&self, pos: BlockPos, contents: &[(&str, u32)]) {
        let resolved: BTreeMap<ItemId, u32> = contents
            .iter()
            .filter_map(|(name, count)| self.catalog.id_of(name).map(|id| (id, *count)))
            .collect();
        let mut state = self.lock();
        state.blocks.insert(pos, "chest".to_owned());
        state.containers.insert(pos, resolved);
    }

    /// Mark a position as unreachable for navigation.
    pub fn make_unreachable(&self, pos: BlockPos) {
        self.lock().unreachable.insert(pos);
    }

    /// Make a container refuse to open.
    pub fn jam_container(&self, pos: BlockPos) {
        self.lock().jammed_containers.insert(pos);
    }

    /// Make a container reject all deposits.
    pub fn mark_container_full(&self, pos: BlockPos) {
        self.lock().full_containers.insert(pos);
    }

    /// Make every craft transaction fail.
    pub fn set_reject_crafts(&self, reject: bool) {
        self.lock().reject_crafts = reject;
    }

    // --- Inspection ---

    /// Held count of an item by name (0 for unknown names).
    pub fn held(&self, name: &str) -> u32 {
        self.catalog
            .id_of(name)
            .map_or(0, |id| self.lock().inventory.get(&id).copied().unwrap_or(0))
    }

    /// Contents of a container as (name, count) pairs.
    pub fn container_contents(&self, pos: BlockPos) -> Vec<(String, u32)> {
        self.lock().containers.get(&pos).map_or_else(Vec::new, |contents| {
            contents
                .iter()
                .map(|(id, count)| {
                    let name = self
                        .catalog
                        .name_of(*id)
                        .map_or_else(|| format!("item_{id}"), str::to_owned);
                    (name, *count)
                })
                .collect()
        })
    }

    /// All chat lines emitted so far.
    pub fn chat_log(&self) -> Vec<String> {
        self.lock().chat.clone()
    }

    /// All performed crafts as (result item, batches).
    pub fn craft_log(&self) -> Vec<(ItemId, u32)> {
        self.lock().craft_log.clone()
    }

    /// Number of completed navigations.
    pub fn navigations(&self) -> u32 {
        self.lock().navigations
    }

    /// (opens, closes) counters for container interactions.
    ///
    /// Tests assert these are balanced after every engine pass.
    pub fn container_balance(&self) -> (u32, u32) {
        let state = self.lock();
        (state.container_opens, state.container_closes)
    }

    /// Total ticks spent waiting.
    pub fn ticks_waited(&self) -> u64 {
        self.lock().ticks_waited
    }

    /// The currently equipped item.
    pub fn equipped_item(&self) -> Option<ItemId> {
        self.lock().equipped
    }

    /// Whether the agent is currently sneaking.
    pub fn is_sneaking(&self) -> bool {
        self.lock().sneaking
    }

    fn used_slots(&self, inventory: &BTreeMap<ItemId, u32>) -> u32 {
        inventory
            .iter()
            .filter(|(_, count)| **count > 0)
            .fold(0u32, |acc, (id, count)| {
                let stack = self.catalog.stack_size_of(*id).max(1);
                acc.saturating_add(count.div_ceil(stack))
            })
    }
}

impl World for SimWorld {
    fn position(&self) -> BlockPos {
        self.lock().position
    }

    fn inventory(&self) -> Vec<ItemStack> {
        self.lock()
            .inventory
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(id, count)| {
                let name = self
                    .catalog
                    .name_of(*id)
                    .map_or_else(|| format!("item_{id}"), str::to_owned);
                ItemStack::new(*id, name, *count)
            })
            .collect()
    }

    fn empty_slots(&self) -> u32 {
        let state = self.lock();
        INVENTORY_SLOTS.saturating_sub(self.used_slots(&state.inventory))
    }

    fn find_blocks(&self, kinds: &[&str], max_distance: u32, cap: usize) -> Vec<BlockPos> {
        let state = self.lock();
        let origin = state.position;
        let mut found: Vec<BlockPos> = state
            .blocks
            .iter()
            .filter(|(pos, name)| {
                kinds.contains(&name.as_str())
                    && origin.within(**pos, i64::from(max_distance))
            })
            .map(|(pos, _)| *pos)
            .collect();
        found.sort_by_key(|pos| origin.distance_sq(*pos));
        found.truncate(cap);
        found
    }

    fn block_name_at(&self, pos: BlockPos) -> Option<String> {
        self.lock().blocks.get(&pos).cloned()
    }

    fn block_state_at(&self, pos: BlockPos) -> Option<u8> {
        self.lock().block_states.get(&pos).copied()
    }

    fn item_drops(&self, max_distance: u32) -> Vec<BlockPos> {
        let state = self.lock();
        let origin = state.position;
        let mut found: Vec<BlockPos> = state
            .drops
            .keys()
            .filter(|pos| origin.within(**pos, i64::from(max_distance)))
            .copied()
            .collect();
        found.sort_by_key(|pos| origin.distance_sq(*pos));
        found
    }

    async fn navigate(&self, goal: NavGoal, _profile: MoveProfile) -> Result<(), WorldError> {
        let target = goal.pos();
        let mut state = self.lock();
        if state.unreachable.contains(&target) {
            return Err(WorldError::NavigationFailed {
                goal: target,
                reason: "no path".to_owned(),
            });
        }
        state.position = target;
        state.navigations = state.navigations.saturating_add(1);

        // Walking next to a dropped item picks it up.
        let nearby: Vec<BlockPos> = state
            .drops
            .keys()
            .filter(|pos| target.within(**pos, 2))
            .copied()
            .collect();
        for pos in nearby {
            if let Some((id, count)) = state.drops.remove(&pos) {
                let entry = state.inventory.entry(id).or_insert(0);
                *entry = entry.saturating_add(count);
            }
        }
        Ok(())
    }

    fn cancel_navigation(&self) {
        // Navigation is instantaneous here; nothing to cancel.
    }

    fn set_sneak(&self, on: bool) {
        self.lock().sneaking = on;
    }

    async fn open_container(&self, pos: BlockPos) -> Result<Vec<ItemStack>, WorldError> {
        let mut state = self.lock();
        if state.jammed_containers.contains(&pos) || !state.containers.contains_key(&pos) {
            return Err(WorldError::ContainerUnavailable { pos });
        }
        state.container_opens = state.container_opens.saturating_add(1);
        state.open_container = Some(pos);
        let snapshot = state.containers.get(&pos).map_or_else(Vec::new, |contents| {
            contents
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(id, count)| {
                    let name = self
                        .catalog
                        .name_of(*id)
                        .map_or_else(|| format!("item_{id}"), str::to_owned);
                    ItemStack::new(*id, name, *count)
                })
                .collect()
        });
        Ok(snapshot)
    }

    async fn deposit(&self, pos: BlockPos, item: ItemId, count: u32) -> Result<(), WorldError> {
        let mut state = self.lock();
        if state.full_containers.contains(&pos) {
            return Err(WorldError::TransactionRejected {
                item,
                reason: "container full".to_owned(),
            });
        }
        let held = state.inventory.get(&item).copied().unwrap_or(0);
        if held < count {
            return Err(WorldError::TransactionRejected {
                item,
                reason: format!("only {held} held"),
            });
        }
        let Some(contents) = state.containers.get_mut(&pos) else {
            return Err(WorldError::ContainerUnavailable { pos });
        };
        let slot = contents.entry(item).or_insert(0);
        *slot = slot.saturating_add(count);
        let remaining = held.saturating_sub(count);
        if remaining == 0 {
            state.inventory.remove(&item);
        } else {
            state.inventory.insert(item, remaining);
        }
        Ok(())
    }

    async fn withdraw(&self, pos: BlockPos, item: ItemId, count: u32) -> Result<(), WorldError> {
        let mut state = self.lock();
        let Some(contents) = state.containers.get_mut(&pos) else {
            return Err(WorldError::ContainerUnavailable { pos });
        };
        let available = contents.get(&item).copied().unwrap_or(0);
        if available < count {
            return Err(WorldError::TransactionRejected {
                item,
                reason: format!("only {available} in container"),
            });
        }
        let remaining = available.saturating_sub(count);
        if remaining == 0 {
            contents.remove(&item);
        } else {
            contents.insert(item, remaining);
        }
        let entry = state.inventory.entry(item).or_insert(0);
        *entry = entry.saturating_add(count);
        Ok(())
    }

    async fn close_container(&self, _pos: BlockPos) {
        let mut state = self.lock();
        state.container_closes = state.container_closes.saturating_add(1);
        state.open_container = None;
    }

    async fn craft(
        &self,
        recipe: &Recipe,
        batches: u32,
        station: Option<BlockPos>,
    ) -> Result<(), WorldError> {
        let mut state = self.lock();
        if state.reject_crafts {
            return Err(WorldError::CraftRejected {
                reason: "craft rejected".to_owned(),
            });
        }
        if recipe.station.is_some() && station.is_none() {
            return Err(WorldError::CraftRejected {
                reason: "station required".to_owned(),
            });
        }

        // Verify every slot before consuming anything.
        for slot in &recipe.slots {
            let needed = slot.count.saturating_mul(batches);
            let available = slot
                .acceptable
                .iter()
                .fold(0u32, |acc, id| {
                    acc.saturating_add(state.inventory.get(id).copied().unwrap_or(0))
                });
            if available < needed {
                return Err(WorldError::CraftRejected {
                    reason: "missing ingredients".to_owned(),
                });
            }
        }

        // Consume greedily across acceptable ids.
        for slot in &recipe.slots {
            let mut needed = slot.count.saturating_mul(batches);
            for id in &slot.acceptable {
                if needed == 0 {
                    break;
                }
                let held = state.inventory.get(id).copied().unwrap_or(0);
                let take = held.min(needed);
                if take > 0 {
                    let remaining = held.saturating_sub(take);
                    if remaining == 0 {
                        state.inventory.remove(id);
                    } else {
                        state.inventory.insert(*id, remaining);
                    }
                    needed = needed.saturating_sub(take);
                }
            }
        }

        let produced = recipe.yield_count.saturating_mul(batches);
        let entry = state.inventory.entry(recipe.result).or_insert(0);
        *entry = entry.saturating_add(produced);
        state.craft_log.push((recipe.result, batches));
        Ok(())
    }

    async fn equip(&self, item: ItemId) -> Result<(), WorldError> {
        let mut state = self.lock();
        if state.inventory.get(&item).copied().unwrap_or(0) == 0 {
            return Err(WorldError::EquipFailed { item });
        }
        state.equipped = Some(item);
        Ok(())
    }

    async fn dig(&self, pos: BlockPos) -> Result<(), WorldError> {
        let mut state = self.lock();
        let Some(name) = state.blocks.get(&pos).cloned() else {
            // Already air; digging nothing is a success.
            return Ok(());
        };
        if name == "bedrock" {
            return Err(WorldError::DigFailed {
                pos,
                reason: "unbreakable".to_owned(),
            });
        }
        state.blocks.remove(&pos);
        state.block_states.remove(&pos);
        if let Some(id) = self.catalog.id_of(&name) {
            let entry = state.inventory.entry(id).or_insert(0);
            *entry = entry.saturating_add(1);
        }
        Ok(())
    }

    async fn place_block(&self, pos: BlockPos, item: ItemId) -> Result<(), WorldError> {
        let mut state = self.lock();
        let held = state.inventory.get(&item).copied().unwrap_or(0);
        if held == 0 {
            return Err(WorldError::PlaceFailed {
                pos,
                reason: "item not held".to_owned(),
            });
        }
        let Some(name) = self.catalog.name_of(item).map(str::to_owned) else {
            return Err(WorldError::PlaceFailed {
                pos,
                reason: "unknown item".to_owned(),
            });
        };
        let remaining = held.saturating_sub(1);
        if remaining == 0 {
            state.inventory.remove(&item);
        } else {
            state.inventory.insert(item, remaining);
        }
        state.blocks.insert(pos, name);
        Ok(())
    }

    async fn wait_ticks(&self, ticks: u32) {
        {
            let mut state = self.lock();
            state.ticks_waited = state.ticks_waited.saturating_add(u64::from(ticks));
        }
        // Compressed time: one simulated tick is one millisecond here,
        // fifty in the real game.
        tokio::time::sleep(std::time::Duration::from_millis(u64::from(ticks))).await;
    }

    fn say(&self, message: &str) {
        self.lock().chat.push(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use overseer_types::RecipeBook;

    use super::*;

    #[test]
    fn give_and_count() {
        let world = SimWorld::vanilla();
        assert!(world.give("oak_log", 4));
        assert!(!world.give("unobtainium", 1));
        assert_eq!(world.held("oak_log"), 4);
        let ids: Vec<ItemId> = world.catalog().id_of("oak_log").into_iter().collect();
        assert_eq!(world.count_items(&ids), 4);
    }

    #[test]
    fn empty_slots_accounts_for_stack_sizes() {
        let world = SimWorld::vanilla();
        // 100 logs = 2 slots (stack 64), a pickaxe = 1 slot (stack 1).
        world.give("oak_log", 100);
        world.give("wooden_pickaxe", 1);
        assert_eq!(world.empty_slots(), INVENTORY_SLOTS - 3);
    }

    #[test]
    fn find_blocks_sorted_and_capped() {
        let world = SimWorld::vanilla();
        world.set_position(BlockPos::new(0, 64, 0));
        world.set_block(BlockPos::new(10, 64, 0), "oak_log");
        world.set_block(BlockPos::new(2, 64, 0), "oak_log");
        world.set_block(BlockPos::new(5, 64, 0), "oak_log");
        world.set_block(BlockPos::new(200, 64, 0), "oak_log");

        let found = world.find_blocks(&["oak_log"], 40, 2);
        assert_eq!(
            found,
            vec![BlockPos::new(2, 64, 0), BlockPos::new(5, 64, 0)]
        );
    }

    #[tokio::test]
    async fn navigation_moves_or_fails() {
        let world = SimWorld::vanilla();
        let goal = BlockPos::new(7, 64, 7);
        let ok = world
            .navigate(NavGoal::near(goal, 1), MoveProfile::no_dig())
            .await;
        assert!(ok.is_ok());
        assert_eq!(world.position(), goal);

        let blocked = BlockPos::new(100, 64, 100);
        world.make_unreachable(blocked);
        let err = world
            .navigate(NavGoal::exact(blocked), MoveProfile::free())
            .await;
        assert!(err.is_err());
        assert_eq!(world.position(), goal);
    }

    #[tokio::test]
    async fn container_deposit_and_withdraw() {
        let world = SimWorld::vanilla();
        let pos = BlockPos::new(1, 64, 1);
        world.add_container(pos, &[("iron_ingot", 10)]);
        world.give("oak_log", 5);

        let contents = world.open_container(pos).await.unwrap_or_default();
        assert_eq!(contents.len(), 1);

        let log_id = world.catalog().id_of("oak_log");
        let iron_id = world.catalog().id_of("iron_ingot");
        assert!(log_id.is_some() && iron_id.is_some());
        let (log_id, iron_id) = match (log_id, iron_id) {
            (Some(a), Some(b)) => (a, b),
            _ => return,
        };

        assert!(world.deposit(pos, log_id, 5).await.is_ok());
        assert!(world.withdraw(pos, iron_id, 10).await.is_ok());
        world.close_container(pos).await;

        assert_eq!(world.held("oak_log"), 0);
        assert_eq!(world.held("iron_ingot"), 10);
        assert_eq!(world.container_balance(), (1, 1));
    }

    #[tokio::test]
    async fn jammed_container_refuses_to_open() {
        let world = SimWorld::vanilla();
        let pos = BlockPos::new(1, 64, 1);
        world.add_container(pos, &[]);
        world.jam_container(pos);
        assert!(world.open_container(pos).await.is_err());
    }

    #[tokio::test]
    async fn overdraw_is_rejected() {
        let world = SimWorld::vanilla();
        let pos = BlockPos::new(1, 64, 1);
        world.add_container(pos, &[("iron_ingot", 3)]);
        let id = world.catalog().id_of("iron_ingot");
        assert!(id.is_some());
        if let Some(id) = id {
            assert!(world.withdraw(pos, id, 5).await.is_err());
            // Partial amounts still work.
            assert!(world.withdraw(pos, id, 3).await.is_ok());
        }
    }

    #[tokio::test]
    async fn craft_consumes_and_produces() {
        let world = SimWorld::vanilla();
        let catalog = Arc::clone(world.catalog());
        let book = RecipeBook::vanilla_subset(&catalog);
        world.give("oak_log", 2);

        let planks = catalog.id_of("oak_planks");
        assert!(planks.is_some());
        let recipes = planks.map(|id| book.recipes_for(id)).unwrap_or_default();
        let recipe = recipes.first();
        assert!(recipe.is_some());
        if let Some(recipe) = recipe {
            assert!(world.craft(recipe, 2, None).await.is_ok());
        }
        assert_eq!(world.held("oak_log"), 0);
        assert_eq!(world.held("oak_planks"), 8);
    }

    #[tokio::test]
    async fn craft_without_required_station_fails() {
        let world = SimWorld::vanilla();
        let catalog = Arc::clone(world.catalog());
        let book = RecipeBook::vanilla_subset(&catalog);
        world.give("oak_planks", 3);
        world.give("stick", 2);

        let pick = catalog.id_of("wooden_pickaxe");
        let recipes = pick.map(|id| book.recipes_for(id)).unwrap_or_default();
        let recipe = recipes.first();
        assert!(recipe.is_some());
        if let Some(recipe) = recipe {
            assert!(world.craft(recipe, 1, None).await.is_err());
            let station = BlockPos::new(0, 64, 0);
            assert!(world.craft(recipe, 1, Some(station)).await.is_ok());
        }
        assert_eq!(world.held("wooden_pickaxe"), 1);
    }

    #[tokio::test]
    async fn dig_collects_drop() {
        let world = SimWorld::vanilla();
        let pos = BlockPos::new(3, 60, 3);
        world.set_block(pos, "stone");
        assert!(world.dig(pos).await.is_ok());
        assert_eq!(world.held("stone"), 1);
        assert_eq!(world.block_name_at(pos), None);
        // Digging air succeeds without effect.
        assert!(world.dig(pos).await.is_ok());
    }

    #[tokio::test]
    async fn bedrock_is_unbreakable() {
        let world = SimWorld::vanilla();
        let pos = BlockPos::new(0, -60, 0);
        world.set_block(pos, "bedrock");
        assert!(world.dig(pos).await.is_err());
    }

    #[tokio::test]
    async fn place_block_consumes_item() {
        let world = SimWorld::vanilla();
        world.give("crafting_table", 1);
        let id = world.catalog().id_of("crafting_table");
        assert!(id.is_some());
        let pos = BlockPos::new(4, 64, 4);
        if let Some(id) = id {
            assert!(world.place_block(pos, id).await.is_ok());
        }
        assert_eq!(world.block_name_at(pos).as_deref(), Some("crafting_table"));
        assert_eq!(world.held("crafting_table"), 0);
    }
}
