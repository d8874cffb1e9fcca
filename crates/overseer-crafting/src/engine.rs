//! The recursive crafting engine.
//!
//! `craft_recursively` makes the desired count of an item exist in the
//! inventory: already-held items short-circuit, missing ingredients are
//! manufactured depth-first, and the physical craft runs at a station when
//! the recipe demands one.
//!
//! Two guards bound the recursion:
//!
//! - a denylist of raw materials with reversible block recipes (diamond <->
//!   diamond block and friends); these are never expanded, only checked
//!   against the inventory, forcing callers to source them externally;
//! - an explicit depth parameter threaded through every call, bounded by
//!   [`MAX_CRAFT_DEPTH`]. The depth lives on the call stack, so it is
//!   trivially restored on every exit path.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, info};

use overseer_types::{BlockPos, ItemCatalog, ItemId, Place, RecipeBook, Station};
use overseer_world::{LocationStore, MoveProfile, NavGoal, World, WORKBENCH};

use crate::error::CraftError;
use crate::resolver;

/// Maximum recursion depth before a branch is declared circular.
pub const MAX_CRAFT_DEPTH: u32 = 10;

/// Raw materials whose recipes loop through a storage-block form.
///
/// Expanding these would recurse forever (ingot -> block -> ingot); the
/// engine checks the inventory only and otherwise reports failure so the
/// caller fetches them from storage instead.
pub const CIRCULAR_RAW_MATERIALS: &[&str] = &[
    "diamond",
    "iron_ingot",
    "gold_ingot",
    "copper_ingot",
    "emerald",
    "lapis_lazuli",
    "redstone",
    "coal",
    "netherite_ingot",
    "slime_ball",
    "wheat",
    "bone_meal",
    "iron_nugget",
    "gold_nugget",
    "bamboo",
    "glowstone_dust",
];

/// How far from the workbench location to search for the station block.
const STATION_SEARCH_RADIUS: u32 = 6;

/// Deficit re-evaluation passes per recipe alternative before giving up.
const MAX_DEFICIT_PASSES: u32 = 4;

/// Recursively manufactures items against a [`World`].
pub struct CraftEngine<W> {
    world: Arc<W>,
    locations: Arc<LocationStore>,
    catalog: Arc<ItemCatalog>,
    book: Arc<RecipeBook>,
}

impl<W: World> CraftEngine<W> {
    /// Assemble the engine from its collaborators.
    pub const fn new(
        world: Arc<W>,
        locations: Arc<LocationStore>,
        catalog: Arc<ItemCatalog>,
        book: Arc<RecipeBook>,
    ) -> Self {
        Self {
            world,
            locations,
            catalog,
            book,
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

    /// Make `count` of `item_name` exist in the inventory, crafting
    /// recursively as needed.
    ///
    /// Returns `Ok(false)` for expected shortfalls (no recipe, missing raw
    /// materials); the caller decides whether to resupply or fall back to a
    /// lower tier. Physical transaction failures and station problems are
    /// errors and abort the order.
    pub async fn craft_recursively(&self, item_name: &str, count: u32) -> Result<bool, CraftError> {
        self.craft_depth(item_name, count, 0).await
    }

    /// One recursion step. `depth` is passed explicitly so the guard state
    /// unwinds with the stack.
    fn craft_depth<'a>(
        &'a self,
        item_name: &'a str,
        count: u32,
        depth: u32,
    ) -> BoxFuture<'a, Result<bool, CraftError>> {
        Box::pin(async move {
            // Denylisted raw materials: inventory check only, no recipe
            // resolution at all.
            if CIRCULAR_RAW_MATERIALS.contains(&item_name) {
                let Some(id) = self.catalog.id_of(item_name) else {
                    return Ok(false);
                };
                return Ok(self.world.count_items(&[id]) >= count);
            }

            if depth > MAX_CRAFT_DEPTH {
                return Err(CraftError::DepthExceeded {
                    item: item_name.to_owned(),
                });
            }

            let Some(id) = self.catalog.id_of(item_name) else {
                return Err(CraftError::UnknownItem(item_name.to_owned()));
            };

            // Idempotent short-circuit.
            if self.world.count_items(&[id]) >= count {
                return Ok(true);
            }

            let recipes = self.book.recipes_for(id);
            if recipes.is_empty() {
                debug!(item = item_name, "no recipe known");
                return Ok(false);
            }

            // A loop-detected failure is remembered so that, when no other
            // recipe alternative pans out, the caller sees the loop rather
            // than a generic shortfall.
            let mut loop_detected = None;

            'alternatives: for recipe in recipes {
                let held = self.world.count_items(&[id]);
                let shortfall = count.saturating_sub(held);
                if shortfall == 0 {
                    return Ok(true);
                }

                // Sub-crafts consume each other's products (sticks eat the
                // planks crafted a moment ago), and building a missing
                // station consumes materials too, so deficits re-evaluate
                // until none remain before the target craft runs.
                let mut passes = 0u32;
                let mut station_pos = None;
                loop {
                    let inventory = self.inventory_map();
                    let (crafts_needed, deficits) =
                        resolver::deficits_for_recipe(recipe, &inventory, shortfall);

                    if deficits.is_empty() {
                        if let (Some(kind), None) = (recipe.station, station_pos) {
                            station_pos = Some(self.ensure_station(kind).await?);
                            continue;
                        }
                        self.world.craft(recipe, crafts_needed, station_pos).await?;
                        info!(item = item_name, batches = crafts_needed, "craft complete");
                        return Ok(true);
                    }
                    if passes >= MAX_DEFICIT_PASSES {
                        continue 'alternatives;
                    }
                    passes = passes.saturating_add(1);

                    for requirement in deficits {
                        match self
                            .manufacture_requirement(&requirement, depth)
                            .await
                        {
                            Ok(true) => {}
                            Ok(false) => continue 'alternatives,
                            Err(CraftError::DepthExceeded { item }) => {
                                // Fails this branch only; an alternative
                                // recipe (or a lower candidate tier) may
                                // still be viable.
                                debug!(item = %item, "sub-craft hit the depth bound");
                                loop_detected = Some(CraftError::DepthExceeded { item });
                                continue 'alternatives;
                            }
                            Err(other) => return Err(other),
                        }
                    }
                }
            }

            match loop_detected {
                Some(err) => Err(err),
                None => Ok(false),
            }
        })
    }

    /// Manufacture one outstanding requirement by trying each acceptable
    /// variant in turn (held variants first).
    ///
    /// The recursive target for a variant is its current held count plus
    /// the outstanding amount, so partially-held variants top up instead of
    /// short-circuiting.
    async fn manufacture_requirement(
        &self,
        requirement: &overseer_types::IngredientRequirement,
        depth: u32,
    ) -> Result<bool, CraftError> {
        let mut loop_detected = None;
        for variant in &requirement.acceptable {
            let Some(name) = self.catalog.name_of(*variant).map(str::to_owned) else {
                continue;
            };
            if !CIRCULAR_RAW_MATERIALS.contains(&name.as_str()) {
                debug!(
                    missing = requirement.count,
                    ingredient = %name,
                    "manufacturing missing ingredient"
                );
            }
            let target = self
                .world
                .count_items(&[*variant])
                .saturating_add(requirement.count);
            match self.craft_depth(&name, target, depth.saturating_add(1)).await {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(CraftError::DepthExceeded { item }) => {
                    loop_detected = Some(CraftError::DepthExceeded { item });
                }
                Err(other) => return Err(other),
            }
        }
        match loop_detected {
            Some(err) => Err(err),
            None => Ok(false),
        }
    }

    /// Find the station block near the workbench location, traveling there
    /// first when one is recorded. A missing crafting table is built and
    /// placed at the workbench zone's center.
    async fn ensure_station(&self, kind: Station) -> Result<BlockPos, CraftError> {
        if let Some(place) = self.locations.get(WORKBENCH).await? {
            self.world
                .navigate(NavGoal::near(place.anchor(), 2), MoveProfile::no_dig())
                .await?;
        }

        if let Some(pos) = self
            .world
            .find_blocks(&[kind.block_name()], STATION_SEARCH_RADIUS, 1)
            .first()
            .copied()
        {
            return Ok(pos);
        }

        if kind == Station::CraftingTable {
            return self.build_workbench().await;
        }
        Err(CraftError::StationMissing { station: kind })
    }

    /// Craft and place a crafting table at the workbench zone center,
    /// recording the exact point back into the location store.
    async fn build_workbench(&self) -> Result<BlockPos, CraftError> {
        let Some(place) = self.locations.get(WORKBENCH).await? else {
            return Err(CraftError::StationMissing {
                station: Station::CraftingTable,
            });
        };
        let center = place.zone().center();

        if self.world.block_name_at(center).as_deref() == Some("crafting_table") {
            return Ok(center);
        }

        // A fresh sub-request: the table itself crafts without a station.
        let built = self.craft_depth("crafting_table", 1, 0).await?;
        let table = self.catalog.id_of("crafting_table");
        let (true, Some(table)) = (built, table) else {
            return Err(CraftError::StationMissing {
                station: Station::CraftingTable,
            });
        };

        self.world.place_block(center, table).await?;
        self.locations
            .set(WORKBENCH, Place::point(center.x, center.y, center.z))
            .await?;
        info!(pos = %center, "placed a new crafting table");
        Ok(center)
    }

    /// Inventory snapshot as an id -> count map.
    fn inventory_map(&self) -> BTreeMap<ItemId, u32> {
        self.world
            .inventory()
            .into_iter()
            .map(|stack| (stack.id, stack.count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use overseer_types::{IngredientSlot, Recipe};
    use overseer_world::SimWorld;

    use super::*;

    fn temp_store(tag: &str) -> Arc<LocationStore> {
        let unique = uuid::Uuid::new_v4();
        let path = std::env::temp_dir().join(format!("overseer-craft-{tag}-{unique}.json"));
        Arc::new(LocationStore::new(path))
    }

    fn engine(world: &Arc<SimWorld>, tag: &str) -> CraftEngine<SimWorld> {
        let catalog = Arc::clone(world.catalog());
        let book = Arc::new(RecipeBook::vanilla_subset(&catalog));
        CraftEngine::new(Arc::clone(world), temp_store(tag), catalog, book)
    }

    /// Engine over a synthetic book (for cycle/denylist tests).
    fn engine_with_book(
        world: &Arc<SimWorld>,
        book: RecipeBook,
        tag: &str,
    ) -> CraftEngine<SimWorld> {
        CraftEngine::new(
            Arc::clone(world),
            temp_store(tag),
            Arc::clone(world.catalog()),
            Arc::new(book),
        )
    }

    #[tokio::test]
    async fn sufficiency_short_circuits_without_crafting() {
        let world = Arc::new(SimWorld::vanilla());
        world.give("stick", 8);
        let engine = engine(&world, "sufficient");

        let made = engine.craft_recursively("stick", 4).await;
        assert_eq!(made.ok(), Some(true));
        assert!(world.craft_log().is_empty());
    }

    #[tokio::test]
    async fn no_recipe_reports_false() {
        let world = Arc::new(SimWorld::vanilla());
        let engine = engine(&world, "norecipe");
        // Logs are gathered, not crafted.
        let made = engine.craft_recursively("oak_log", 1).await;
        assert_eq!(made.ok(), Some(false));
    }

    #[tokio::test]
    async fn unknown_item_is_an_error() {
        let world = Arc::new(SimWorld::vanilla());
        let engine = engine(&world, "unknown");
        let result = engine.craft_recursively("unobtainium", 1).await;
        assert!(matches!(result, Err(CraftError::UnknownItem(_))));
    }

    #[tokio::test]
    async fn denylisted_item_never_resolves_recipes() {
        let world = Arc::new(SimWorld::vanilla());
        // Give diamond a synthetic recipe; the denylist must prevent its use.
        let catalog = Arc::clone(world.catalog());
        let diamond = catalog.id_of("diamond");
        let stick = catalog.id_of("stick");
        assert!(diamond.is_some() && stick.is_some());
        let mut book = RecipeBook::new();
        if let (Some(diamond), Some(stick)) = (diamond, stick) {
            book.add(Recipe {
                result: diamond,
                yield_count: 9,
                station: None,
                slots: vec![IngredientSlot::single(stick, 1)],
            });
        }
        let engine = engine_with_book(&world, book, "denylist");
        world.give("stick", 64);

        // Not held: false, and no craft was attempted.
        let made = engine.craft_recursively("diamond", 3).await;
        assert_eq!(made.ok(), Some(false));
        assert!(world.craft_log().is_empty());

        // Held: exact inventory answer.
        world.give("diamond", 3);
        let made = engine.craft_recursively("diamond", 3).await;
        assert_eq!(made.ok(), Some(true));
        assert!(world.craft_log().is_empty());
    }

    #[tokio::test]
    async fn cyclic_recipes_hit_the_depth_bound_and_recover() {
        let world = Arc::new(SimWorld::vanilla());
        let catalog = Arc::clone(world.catalog());
        // torch -> stick -> torch: a cycle through two synthetic recipes.
        let torch = catalog.id_of("torch");
        let stick = catalog.id_of("stick");
        assert!(torch.is_some() && stick.is_some());
        let mut book = RecipeBook::new();
        if let (Some(torch), Some(stick)) = (torch, stick) {
            book.add(Recipe {
                result: torch,
                yield_count: 1,
                station: None,
                slots: vec![IngredientSlot::single(stick, 1)],
            });
            book.add(Recipe {
                result: stick,
                yield_count: 1,
                station: None,
                slots: vec![IngredientSlot::single(torch, 1)],
            });
        }
        let cyclic = engine_with_book(&world, book, "cycle");

        let result = cyclic.craft_recursively("torch", 1).await;
        // No alternative escaped the cycle, so the loop is reported.
        assert!(matches!(result, Err(CraftError::DepthExceeded { .. })));

        // The guard state lives on the stack: an unrelated craft right
        // after is not depth-limited.
        world.give("oak_log", 1);
        let vanilla = engine(&world, "cycle-after");
        let made = vanilla.craft_recursively("oak_planks", 4).await;
        assert_eq!(made.ok(), Some(true));
    }

    #[tokio::test]
    async fn deep_chain_crafts_bottom_up() {
        let world = Arc::new(SimWorld::vanilla());
        world.set_position(BlockPos::new(0, 64, 0));
        world.set_block(BlockPos::new(1, 64, 0), "crafting_table");
        world.give("oak_log", 4);
        let engine = engine(&world, "chain");

        // End to end: logs -> planks -> sticks -> a wooden axe.
        let made = engine.craft_recursively("wooden_axe", 1).await;
        assert_eq!(made.ok(), Some(true));
        assert_eq!(world.held("wooden_axe"), 1);
        // Leftover planks are expected (batch yields), and only the logs
        // actually needed were consumed: 2 of the 4.
        assert!(world.held("oak_planks") > 0);
        assert_eq!(world.held("oak_log"), 2);
    }

    #[tokio::test]
    async fn station_travel_uses_recorded_workbench() {
        let world = Arc::new(SimWorld::vanilla());
        let locations = temp_store("travel");
        let station_pos = BlockPos::new(50, 64, 50);
        world.set_block(station_pos, "crafting_table");
        let set = locations
            .set(WORKBENCH, Place::point(50, 64, 50))
            .await;
        assert!(set.is_ok());

        let catalog = Arc::clone(world.catalog());
        let book = Arc::new(RecipeBook::vanilla_subset(&catalog));
        let engine = CraftEngine::new(Arc::clone(&world), locations, catalog, book);

        world.give("oak_planks", 3);
        world.give("stick", 2);
        let made = engine.craft_recursively("wooden_pickaxe", 1).await;
        assert_eq!(made.ok(), Some(true));
        // The agent walked to the recorded station.
        assert!(world.position().within(station_pos, 2));
    }

    #[tokio::test]
    async fn missing_workbench_is_built_and_recorded() {
        let world = Arc::new(SimWorld::vanilla());
        let locations = temp_store("build");
        let set = locations
            .set(WORKBENCH, Place::region(10, 64, 10, 4, 4))
            .await;
        assert!(set.is_ok());

        let catalog = Arc::clone(world.catalog());
        let book = Arc::new(RecipeBook::vanilla_subset(&catalog));
        let engine = CraftEngine::new(
            Arc::clone(&world),
            Arc::clone(&locations),
            catalog,
            book,
        );

        // Enough wood for the pickaxe AND the table it has to build first.
        world.give("oak_log", 8);
        let made = engine.craft_recursively("wooden_pickaxe", 1).await;
        assert_eq!(made.ok(), Some(true));

        // The table now stands at the zone center and the store points at it.
        let center = BlockPos::new(12, 64, 12);
        assert_eq!(
            world.block_name_at(center).as_deref(),
            Some("crafting_table")
        );
        let recorded = locations.get(WORKBENCH).await.ok().flatten();
        assert_eq!(recorded.map(|p| p.anchor()), Some(center));
    }

    #[tokio::test]
    async fn unreachable_station_aborts_with_error() {
        let world = Arc::new(SimWorld::vanilla());
        let locations = temp_store("unreachable");
        let set = locations.set(WORKBENCH, Place::point(50, 64, 50)).await;
        assert!(set.is_ok());
        world.set_block(BlockPos::new(50, 64, 50), "crafting_table");
        world.make_unreachable(BlockPos::new(50, 64, 50));

        let catalog = Arc::clone(world.catalog());
        let book = Arc::new(RecipeBook::vanilla_subset(&catalog));
        let engine = CraftEngine::new(Arc::clone(&world), locations, catalog, book);

        world.give("oak_planks", 3);
        world.give("stick", 2);
        let result = engine.craft_recursively("wooden_pickaxe", 1).await;
        assert!(matches!(result, Err(CraftError::World(_))));
    }
}
