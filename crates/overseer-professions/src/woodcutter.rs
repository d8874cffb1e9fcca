//! The woodcutting profession: find the nearest tree, descend to the trunk
//! base, chop upward, and bank the logs once the haul is big enough.
//!
//! An axe is preferred but not required: the role runs degraded
//! (bare-handed) while the shared tool protocol asks for one.

use std::sync::Arc;

use tracing::debug;

use overseer_types::{BlockPos, ItemId};
use overseer_world::{MoveProfile, NavGoal, World, STOCK_ZONE};

use overseer_logistics::{ItemFilter, LogisticsEngine};

use crate::error::ProfessionError;
use crate::profession::{Profession, RoleKind};
use crate::tools::{holds_tool, ToolQuest};

/// Log block kinds recognized as trees.
pub const TREE_KINDS: &[&str] = &[
    "oak_log",
    "birch_log",
    "spruce_log",
    "jungle_log",
    "acacia_log",
    "dark_oak_log",
    "cherry_log",
    "mangrove_log",
];

/// Search radius for trees.
const TREE_SEARCH_RADIUS: u32 = 40;

/// Search result cap for trees.
const TREE_SEARCH_CAP: usize = 50;

/// Tunable woodcutting parameters.
#[derive(Debug, Clone)]
pub struct WoodcutterConfig {
    /// Log units that trigger a deposit trip.
    pub log_limit: u32,
    /// Ticks to wait when no tree is in range.
    pub idle_wait_ticks: u32,
}

impl Default for WoodcutterConfig {
    fn default() -> Self {
        Self {
            log_limit: 64,
            idle_wait_ticks: 100,
        }
    }
}

/// Woodcutter states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WoodcutterState {
    /// Disabled or waiting to start.
    Idle,
    /// Scanning for the nearest tree.
    FindTree,
    /// Walking to the chosen trunk.
    TravelToTree,
    /// Chopping the trunk bottom-up.
    Chopping,
    /// Walking back to the stockpile.
    ReturnToBase,
    /// Offloading logs.
    Depositing,
}

/// Events observed by the woodcutter driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WoodcutterEvent {
    /// The role was switched on.
    Enabled,
    /// A trunk was chosen.
    TreeFound,
    /// No tree in range.
    NoTreeFound,
    /// The current travel goal was reached.
    Arrived,
    /// The current travel attempt failed.
    TravelFailed,
    /// The trunk has been fully chopped.
    TrunkCleared,
    /// The log haul hit the limit.
    CapacityReached,
    /// The logs were offloaded.
    Deposited,
}

/// The woodcutter transition function. Unmatched pairs stay put.
pub const fn next_state(state: WoodcutterState, event: WoodcutterEvent) -> WoodcutterState {
    match (state, event) {
        (WoodcutterState::Idle, WoodcutterEvent::Enabled)
        | (WoodcutterState::TravelToTree, WoodcutterEvent::TravelFailed)
        | (WoodcutterState::Chopping, WoodcutterEvent::TrunkCleared)
        | (WoodcutterState::Depositing, WoodcutterEvent::Deposited) => WoodcutterState::FindTree,
        (WoodcutterState::FindTree, WoodcutterEvent::TreeFound) => WoodcutterState::TravelToTree,
        (WoodcutterState::FindTree | WoodcutterState::Chopping, WoodcutterEvent::CapacityReached) => {
            WoodcutterState::ReturnToBase
        }
        (WoodcutterState::TravelToTree, WoodcutterEvent::Arrived) => WoodcutterState::Chopping,
        (WoodcutterState::ReturnToBase, WoodcutterEvent::Arrived) => WoodcutterState::Depositing,
        (current, _) => current,
    }
}

/// The woodcutting profession driver.
pub struct Woodcutter<W> {
    world: Arc<W>,
    logistics: Arc<LogisticsEngine<W>>,
    config: WoodcutterConfig,
    enabled: bool,
    state: WoodcutterState,
    /// The trunk base currently being worked.
    target: Option<BlockPos>,
    /// Last worksite; re-enabling resumes the search from here.
    last_site: Option<BlockPos>,
    tool_quest: ToolQuest,
}

impl<W: World> Woodcutter<W> {
    /// Assemble the woodcutter with its collaborators.
    pub fn new(
        world: Arc<W>,
        logistics: Arc<LogisticsEngine<W>>,
        config: WoodcutterConfig,
    ) -> Self {
        Self {
            world,
            logistics,
            config,
            enabled: false,
            state: WoodcutterState::Idle,
            target: None,
            last_site: None,
            tool_quest: ToolQuest::new("axe"),
        }
    }

    /// The current state (exposed for the status report and tests).
    pub const fn state(&self) -> WoodcutterState {
        self.state
    }

    fn log_ids(&self) -> Vec<ItemId> {
        TREE_KINDS
            .iter()
            .filter_map(|name| self.logistics.catalog().id_of(name))
            .collect()
    }

    fn haul_full(&self) -> bool {
        self.world.count_items(&self.log_ids()) >= self.config.log_limit
    }

    /// Walk down from a found log to the bottom of its trunk.
    fn trunk_base(&self, pos: BlockPos) -> BlockPos {
        let mut base = pos;
        loop {
            let below = base.offset(0, -1, 0);
            let is_log = self
                .world
                .block_name_at(below)
                .is_some_and(|name| TREE_KINDS.contains(&name.as_str()));
            if !is_log {
                return base;
            }
            base = below;
        }
    }

    async fn find_tree(&mut self) -> Result<WoodcutterEvent, ProfessionError> {
        if self.haul_full() {
            self.world.say("Log haul is full, heading back.");
            return Ok(WoodcutterEvent::CapacityReached);
        }

        // Degraded mode: chop bare-handed, but keep asking (once) for an axe.
        if !holds_tool(self.world.as_ref(), "axe") {
            let _ = self
                .tool_quest
                .try_acquire(self.world.as_ref(), &self.logistics)
                .await?;
        }

        // Resume near the last worksite rather than searching from here.
        if let Some(site) = self.last_site {
            if !self.world.position().within(site, 10) {
                let _ = self
                    .world
                    .navigate(NavGoal::near(site, 2), MoveProfile::no_dig())
                    .await;
            }
        }

        let found = self
            .world
            .find_blocks(TREE_KINDS, TREE_SEARCH_RADIUS, TREE_SEARCH_CAP);
        let Some(nearest) = found.first().copied() else {
            debug!("no trees in range");
            self.world.wait_ticks(self.config.idle_wait_ticks).await;
            return Ok(WoodcutterEvent::NoTreeFound);
        };

        self.target = Some(self.trunk_base(nearest));
        Ok(WoodcutterEvent::TreeFound)
    }

    async fn travel_to_tree(&mut self) -> Result<WoodcutterEvent, ProfessionError> {
        let Some(target) = self.target else {
            return Ok(WoodcutterEvent::TravelFailed);
        };
        match self
            .world
            .navigate(NavGoal::near(target, 1), MoveProfile::no_dig())
            .await
        {
            Ok(()) => Ok(WoodcutterEvent::Arrived),
            Err(err) => {
                debug!(error = %err, "travel to tree failed");
                self.target = None;
                Ok(WoodcutterEvent::TravelFailed)
            }
        }
    }

    async fn chop(&mut self) -> Result<WoodcutterEvent, ProfessionError> {
        let Some(base) = self.target.take() else {
            return Ok(WoodcutterEvent::TrunkCleared);
        };
        self.last_site = Some(base);

        let _ = self.logistics.equip_best_tool("axe").await;
        let mut cursor = base;
        loop {
            if !self.enabled {
                break;
            }
            let is_log = self
                .world
                .block_name_at(cursor)
                .is_some_and(|name| TREE_KINDS.contains(&name.as_str()));
            if !is_log {
                break;
            }
            if self.world.dig(cursor).await.is_err() {
                break;
            }
            cursor = cursor.offset(0, 1, 0);
        }

        if self.haul_full() {
            self.world.say("Log haul is full, heading back.");
            return Ok(WoodcutterEvent::CapacityReached);
        }
        Ok(WoodcutterEvent::TrunkCleared)
    }

    async fn return_to_base(&mut self) -> Result<WoodcutterEvent, ProfessionError> {
        let zone = self.logistics.zone(STOCK_ZONE).await?;
        match self
            .world
            .navigate(NavGoal::near(zone.center(), 1), MoveProfile::no_dig())
            .await
        {
            Ok(()) => Ok(WoodcutterEvent::Arrived),
            Err(err) => {
                debug!(error = %err, "travel to stockpile failed");
                Ok(WoodcutterEvent::TravelFailed)
            }
        }
    }

    async fn deposit(&mut self) -> Result<WoodcutterEvent, ProfessionError> {
        let logs = ItemFilter::AnyOf(TREE_KINDS.iter().map(|n| (*n).to_owned()).collect());
        self.logistics.store_items_in_zone(STOCK_ZONE, &logs).await?;
        self.world.say("Logs stored.");
        Ok(WoodcutterEvent::Deposited)
    }
}

impl<W: World> Profession for Woodcutter<W> {
    fn role(&self) -> RoleKind {
        RoleKind::Woodcutter
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
            self.tool_quest.reset();
            self.state = next_state(WoodcutterState::Idle, WoodcutterEvent::Enabled);
            self.world.say("Woodcutter enabled.");
        } else {
            self.state = WoodcutterState::Idle;
            self.target = None;
            self.tool_quest.reset();
            self.world.cancel_navigation();
            self.world.say("Woodcutter disabled.");
        }
    }

    async fn run_cycle(&mut self) -> Result<(), ProfessionError> {
        if !self.enabled {
            return Ok(());
        }
        let event = match self.state {
            WoodcutterState::Idle => WoodcutterEvent::Enabled,
            WoodcutterState::FindTree => self.find_tree().await?,
            WoodcutterState::TravelToTree => self.travel_to_tree().await?,
            WoodcutterState::Chopping => self.chop().await?,
            WoodcutterState::ReturnToBase => self.return_to_base().await?,
            WoodcutterState::Depositing => self.deposit().await?,
        };
        self.state = next_state(self.state, event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_happy_path() {
        let mut state = WoodcutterState::Idle;
        state = next_state(state, WoodcutterEvent::Enabled);
        assert_eq!(state, WoodcutterState::FindTree);
        state = next_state(state, WoodcutterEvent::TreeFound);
        assert_eq!(state, WoodcutterState::TravelToTree);
        state = next_state(state, WoodcutterEvent::Arrived);
        assert_eq!(state, WoodcutterState::Chopping);
        state = next_state(state, WoodcutterEvent::TrunkCleared);
        assert_eq!(state, WoodcutterState::FindTree);
    }

    #[test]
    fn capacity_routes_to_base_and_back() {
        let mut state = next_state(WoodcutterState::Chopping, WoodcutterEvent::CapacityReached);
        assert_eq!(state, WoodcutterState::ReturnToBase);
        state = next_state(state, WoodcutterEvent::Arrived);
        assert_eq!(state, WoodcutterState::Depositing);
        state = next_state(state, WoodcutterEvent::Deposited);
        assert_eq!(state, WoodcutterState::FindTree);
    }

    #[test]
    fn empty_forest_keeps_searching() {
        assert_eq!(
            next_state(WoodcutterState::FindTree, WoodcutterEvent::NoTreeFound),
            WoodcutterState::FindTree
        );
    }

    #[test]
    fn failed_travel_repicks_a_tree() {
        assert_eq!(
            next_state(WoodcutterState::TravelToTree, WoodcutterEvent::TravelFailed),
            WoodcutterState::FindTree
        );
    }
}
