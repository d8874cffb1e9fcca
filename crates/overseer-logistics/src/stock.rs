//! The stock-keeper's distribution and intake policies.
//!
//! Distribution runs in three phases over the stockpile zone:
//!
//! 1. Containers already holding items receive matching items: the same
//!    item kind, or anything in the container's category (sampled from its
//!    first stack). Uncategorized items never ride along on a category
//!    match.
//! 2. Empty containers are claimed one at a time: the first item deposited
//!    (priority items first) assigns the container's category, and only
//!    same-category items follow it in. A container claimed by an
//!    uncategorized item accepts anything.
//! 3. Leftovers are returned to the fallback zone rather than dropped.

use tracing::{debug, info};

use overseer_types::OTHER_CATEGORY;
use overseer_world::{MoveProfile, NavGoal, World};

use crate::discovery::containers_in_zone;
use crate::error::LogisticsError;
use crate::transfer::LogisticsEngine;

impl<W: World> LogisticsEngine<W> {
    /// Withdraw everything from a zone's containers until the inventory
    /// nears full.
    ///
    /// Returns `Ok(true)` when anything at all was collected.
    pub async fn collect_from_zone(&self, zone_name: &str) -> Result<bool, LogisticsError> {
        let zone = self.zone(zone_name).await?;
        let world = self.world();
        if let Err(err) = world
            .navigate(NavGoal::near(zone.center(), 1), MoveProfile::no_dig())
            .await
        {
            debug!(zone = zone_name, error = %err, "could not reach collection zone");
        }
        let containers = containers_in_zone(world.as_ref(), &zone);
        let mut collected_any = false;

        for pos in containers {
            if world.empty_slots() == 0 {
                break;
            }
            if let Err(err) = world
                .navigate(NavGoal::near(pos, 1), MoveProfile::no_dig())
                .await
            {
                debug!(container = %pos, error = %err, "skipping unreachable container");
                continue;
            }
            let contents = match world.open_container(pos).await {
                Ok(contents) => contents,
                Err(err) => {
                    debug!(container = %pos, error = %err, "container refused to open");
                    continue;
                }
            };
            for stack in &contents {
                if world.empty_slots() == 0 {
                    break;
                }
                match world.withdraw(pos, stack.id, stack.count).await {
                    Ok(()) => collected_any = true,
                    Err(err) => debug!(item = %stack.id, error = %err, "withdraw failed"),
                }
            }
            world.close_container(pos).await;
            world.wait_ticks(10).await;
        }

        Ok(collected_any)
    }

    /// Distribute the inventory into the stockpile zone by category,
    /// returning leftovers to the fallback zone.
    ///
    /// Returns `Ok(true)` iff the inventory is empty afterwards.
    pub async fn distribute_to_stock(
        &self,
        stock_zone: &str,
        fallback_zone: &str,
    ) -> Result<bool, LogisticsError> {
        let zone = self.zone(stock_zone).await?;
        let world = self.world();
        if let Err(err) = world
            .navigate(NavGoal::near(zone.center(), 1), MoveProfile::no_dig())
            .await
        {
            debug!(zone = stock_zone, error = %err, "could not reach stock zone");
        }

        let containers = containers_in_zone(world.as_ref(), &zone);
        let mut empty_containers = Vec::new();

        // Phase 1: containers that already hold something keep their theme.
        for pos in containers {
            if world.inventory().is_empty() {
                break;
            }
            if let Err(err) = world
                .navigate(NavGoal::near(pos, 1), MoveProfile::no_dig())
                .await
            {
                debug!(container = %pos, error = %err, "skipping unreachable container");
                continue;
            }
            let contents = match world.open_container(pos).await {
                Ok(contents) => contents,
                Err(err) => {
                    debug!(container = %pos, error = %err, "container refused to open");
                    continue;
                }
            };
            let Some(sample) = contents.first() else {
                empty_containers.push(pos);
                world.close_container(pos).await;
                continue;
            };
            let chest_category = self.categories().category_of(&sample.name).to_owned();

            for stack in world.inventory() {
                let item_category = self.categories().category_of(&stack.name);
                let same_item = contents.iter().any(|held| held.id == stack.id);
                if same_item
                    || (item_category == chest_category && item_category != OTHER_CATEGORY)
                {
                    self.deposit_chunked(pos, &stack).await;
                }
            }
            world.close_container(pos).await;
        }

        // Phase 2: claim empty containers, priority items first.
        if !world.inventory().is_empty() {
            for pos in empty_containers {
                if world.inventory().is_empty() {
                    break;
                }
                if let Err(err) = world
                    .navigate(NavGoal::near(pos, 1), MoveProfile::no_dig())
                    .await
                {
                    debug!(container = %pos, error = %err, "skipping unreachable container");
                    continue;
                }
                if let Err(err) = world.open_container(pos).await {
                    debug!(container = %pos, error = %err, "container refused to open");
                    continue;
                }

                let mut assigned_category: Option<String> = None;
                let mut items = world.inventory();
                items.sort_by_key(|stack| usize::from(!self.categories().is_priority(&stack.name)));

                for stack in items {
                    let item_category = self.categories().category_of(&stack.name).to_owned();
                    let category = assigned_category
                        .get_or_insert_with(|| item_category.clone());
                    if *category == OTHER_CATEGORY || *category == item_category {
                        self.deposit_chunked(pos, &stack).await;
                    }
                }
                world.close_container(pos).await;
            }
        }

        // Phase 3: leftovers go back to the fallback zone.
        if !world.inventory().is_empty() {
            info!(zone = fallback_zone, "returning leftovers to fallback zone");
            let _ = self.dump_inventory(fallback_zone).await?;
        }

        Ok(world.inventory().is_empty())
    }
}
