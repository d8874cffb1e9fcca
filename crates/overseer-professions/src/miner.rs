//! The mining profession: staircase excavation with capacity-driven trips
//! back to base.
//!
//! State machine: `Idle -> TravelToMine -> Mining -> ReturnToBase ->
//! Depositing -> (TravelToMine | AwaitTool)`. Mining continues step by
//! step until the pickaxe is gone, the stone haul hits the limit, or the
//! staircase reaches the bottom of the world. Depositing keeps the working
//! gear; a lost pickaxe routes through the shared tool-acquisition
//! protocol in `AwaitTool`.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use overseer_types::{BlockPos, Direction, ItemId};
use overseer_world::{MoveProfile, NavGoal, World, STOCK_ZONE};

use overseer_logistics::{ItemFilter, LogisticsEngine};

use crate::digging;
use crate::error::ProfessionError;
use crate::profession::{Profession, RoleKind};
use crate::stuck::{corrective_nudge, StuckAction, StuckWatchdog};
use crate::tools::{holds_tool, ToolQuest};

/// Block kinds counted against the stone capacity limit.
const STONE_KINDS: &[&str] = &["cobblestone", "stone", "deepslate"];

/// Items the miner keeps when depositing.
const KEEP_PATTERNS: &[&str] = &["pickaxe", "sword", "torch", "bread", "steak"];

/// Consecutive travel failures before the objective is abandoned.
const TRAVEL_FAILURE_LIMIT: u32 = 3;

/// Offset from base to the default mine entrance.
const DEFAULT_MINE_OFFSET: i32 = -30;

/// Tunable mining parameters.
#[derive(Debug, Clone)]
pub struct MinerConfig {
    /// Digging direction for the staircase.
    pub direction: Direction,
    /// Stone units that trigger a deposit trip.
    pub stone_limit: u32,
    /// World-bottom cutoff; digging stops at or below this height.
    pub bottom_y: i32,
    /// Ticks to wait between tool-availability checks.
    pub tool_check_ticks: u32,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            direction: Direction::North,
            stone_limit: 256,
            bottom_y: -58,
            tool_check_ticks: 200,
        }
    }
}

/// Miner states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinerState {
    /// Disabled or waiting to start.
    Idle,
    /// Walking to the mine entrance (or the last dig position).
    TravelToMine,
    /// Digging staircase steps.
    Mining,
    /// Walking back to base.
    ReturnToBase,
    /// Offloading the haul.
    Depositing,
    /// Pickaxe missing; running the tool-acquisition protocol.
    AwaitTool,
}

/// Events observed by the miner driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinerEvent {
    /// The role was switched on.
    Enabled,
    /// The current travel goal was reached.
    Arrived,
    /// The current travel attempt failed.
    TravelFailed,
    /// The pickaxe is gone.
    ToolMissing,
    /// The stone haul hit the limit.
    CapacityReached,
    /// The staircase reached the bottom cutoff.
    BottomReached,
    /// One staircase step completed.
    StepComplete,
    /// One staircase step failed (obstruction, liquid).
    StepFailed,
    /// The haul was offloaded and the pickaxe is still held.
    Deposited,
    /// A pickaxe was acquired.
    ToolAcquired,
    /// Still no pickaxe.
    ToolStillMissing,
    /// The watchdog gave up on the current objective.
    Abandoned,
}

/// The miner transition function. Unmatched (state, event) pairs stay put.
pub const fn next_state(state: MinerState, event: MinerEvent) -> MinerState {
    match (state, event) {
        (MinerState::Idle, MinerEvent::Enabled) => MinerState::TravelToMine,
        (MinerState::TravelToMine, MinerEvent::Arrived) => MinerState::Mining,
        (MinerState::TravelToMine | MinerState::Mining, MinerEvent::Abandoned)
        | (
            MinerState::Mining,
            MinerEvent::ToolMissing | MinerEvent::CapacityReached | MinerEvent::BottomReached,
        ) => MinerState::ReturnToBase,
        (MinerState::Mining, MinerEvent::StepComplete | MinerEvent::StepFailed) => {
            MinerState::Mining
        }
        (MinerState::ReturnToBase, MinerEvent::Arrived) => MinerState::Depositing,
        (MinerState::Depositing, MinerEvent::Deposited) => MinerState::TravelToMine,
        (MinerState::Depositing, MinerEvent::ToolMissing) => MinerState::AwaitTool,
        (MinerState::AwaitTool, MinerEvent::ToolAcquired) => MinerState::TravelToMine,
        (current, _) => current,
    }
}

/// The mining profession driver.
pub struct Miner<W> {
    world: Arc<W>,
    logistics: Arc<LogisticsEngine<W>>,
    config: MinerConfig,
    enabled: bool,
    state: MinerState,
    base: Option<BlockPos>,
    mine_start: Option<BlockPos>,
    /// Last dig position; re-enabling resumes here instead of at the
    /// entrance.
    last_dig: Option<BlockPos>,
    tool_quest: ToolQuest,
    watchdog: StuckWatchdog,
    travel_failures: u32,
}

impl<W: World> Miner<W> {
    /// Assemble the miner with its collaborators.
    pub fn new(world: Arc<W>, logistics: Arc<LogisticsEngine<W>>, config: MinerConfig) -> Self {
        Self {
            world,
            logistics,
            config,
            enabled: false,
            state: MinerState::Idle,
            base: None,
            mine_start: None,
            last_dig: None,
            tool_quest: ToolQuest::new("pickaxe"),
            watchdog: StuckWatchdog::new(),
            travel_failures: 0,
        }
    }

    /// The current state (exposed for the status report and tests).
    pub const fn state(&self) -> MinerState {
        self.state
    }

    /// Override the base and mine-entrance positions.
    pub const fn set_site(&mut self, base: BlockPos, mine_start: BlockPos) {
        self.base = Some(base);
        self.mine_start = Some(mine_start);
    }

    fn stone_ids(&self) -> Vec<ItemId> {
        STONE_KINDS
            .iter()
            .filter_map(|name| self.logistics.catalog().id_of(name))
            .collect()
    }

    async fn travel_to_mine(&mut self) -> Result<MinerEvent, ProfessionError> {
        let target = self
            .last_dig
            .or(self.mine_start)
            .unwrap_or_else(|| self.world.position());
        if self.world.position().within(target, 5) {
            self.travel_failures = 0;
            return Ok(MinerEvent::Arrived);
        }
        match self
            .world
            .navigate(NavGoal::near(target, 2), MoveProfile::free())
            .await
        {
            Ok(()) => {
                self.travel_failures = 0;
                Ok(MinerEvent::Arrived)
            }
            Err(err) => {
                debug!(error = %err, "travel to mine failed");
                self.travel_failures = self.travel_failures.saturating_add(1);
                if self.travel_failures >= TRAVEL_FAILURE_LIMIT {
                    self.travel_failures = 0;
                    self.world.say("Mine entrance unreachable, heading back.");
                    Ok(MinerEvent::Abandoned)
                } else {
                    Ok(MinerEvent::TravelFailed)
                }
            }
        }
    }

    async fn mine_step(&mut self) -> Result<MinerEvent, ProfessionError> {
        if !holds_tool(self.world.as_ref(), "pickaxe") {
            self.world.say("My pickaxe is gone!");
            return Ok(MinerEvent::ToolMissing);
        }
        let stone = self.world.count_items(&self.stone_ids());
        if stone >= self.config.stone_limit {
            self.world.say("Haul is full of stone, heading back.");
            return Ok(MinerEvent::CapacityReached);
        }
        if self.world.position().y <= self.config.bottom_y {
            self.world.say("Reached the bottom of the world.");
            return Ok(MinerEvent::BottomReached);
        }

        let _ = self.logistics.equip_best_tool("pickaxe").await;
        let stepped = digging::dig_staircase_step(self.world.as_ref(), self.config.direction).await;
        let position = self.world.position();
        self.last_dig = Some(position);

        match self.watchdog.observe(position, Instant::now()) {
            StuckAction::Nudge => corrective_nudge(self.world.as_ref()).await,
            StuckAction::Reissue => {
                // Falling through re-issues the same dig goal next cycle.
                debug!("reissuing the mining objective");
            }
            StuckAction::Abandon => {
                self.world.say("Stuck in the mine, heading back.");
                return Ok(MinerEvent::Abandoned);
            }
            StuckAction::None => {}
        }

        Ok(if stepped {
            MinerEvent::StepComplete
        } else {
            MinerEvent::StepFailed
        })
    }

    async fn return_to_base(&mut self) -> Result<MinerEvent, ProfessionError> {
        let target = self.base.unwrap_or_else(|| self.world.position());
        match self
            .world
            .navigate(NavGoal::near(target, 1), MoveProfile::no_dig())
            .await
        {
            Ok(()) => Ok(MinerEvent::Arrived),
            Err(err) => {
                debug!(error = %err, "travel to base failed");
                Ok(MinerEvent::TravelFailed)
            }
        }
    }

    async fn deposit(&mut self) -> Result<MinerEvent, ProfessionError> {
        let keep = ItemFilter::Excluding(
            KEEP_PATTERNS.iter().map(|p| (*p).to_owned()).collect(),
        );
        self.logistics
            .store_items_in_zone(STOCK_ZONE, &keep)
            .await?;

        if holds_tool(self.world.as_ref(), "pickaxe") {
            self.world.say("Haul stored, back to the mine.");
            Ok(MinerEvent::Deposited)
        } else {
            Ok(MinerEvent::ToolMissing)
        }
    }

    async fn await_tool(&mut self) -> Result<MinerEvent, ProfessionError> {
        let acquired = self
            .tool_quest
            .try_acquire(self.world.as_ref(), &self.logistics)
            .await?;
        if acquired {
            self.world.say("Pickaxe in hand, back to work.");
            Ok(MinerEvent::ToolAcquired)
        } else {
            self.world.wait_ticks(self.config.tool_check_ticks).await;
            Ok(MinerEvent::ToolStillMissing)
        }
    }
}

impl<W: World> Profession for Miner<W> {
    fn role(&self) -> RoleKind {
        RoleKind::Miner
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
            if self.base.is_none() {
                self.base = Some(self.world.position());
            }
            if self.mine_start.is_none() {
                self.mine_start = self
                    .base
                    .map(|base| base.offset(DEFAULT_MINE_OFFSET, 0, 0));
            }
            self.tool_quest.reset();
            self.watchdog.reset();
            self.travel_failures = 0;
            self.state = next_state(MinerState::Idle, MinerEvent::Enabled);
            self.world.say("Miner enabled.");
        } else {
            self.state = MinerState::Idle;
            self.tool_quest.reset();
            self.watchdog.reset();
            self.world.cancel_navigation();
            self.world.say("Miner disabled.");
        }
    }

    async fn run_cycle(&mut self) -> Result<(), ProfessionError> {
        if !self.enabled {
            return Ok(());
        }
        let event = match self.state {
            MinerState::Idle => MinerEvent::Enabled,
            MinerState::TravelToMine => self.travel_to_mine().await?,
            MinerState::Mining => self.mine_step().await?,
            MinerState::ReturnToBase => self.return_to_base().await?,
            MinerState::Depositing => self.deposit().await?,
            MinerState::AwaitTool => self.await_tool().await?,
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
        let mut state = MinerState::Idle;
        state = next_state(state, MinerEvent::Enabled);
        assert_eq!(state, MinerState::TravelToMine);
        state = next_state(state, MinerEvent::Arrived);
        assert_eq!(state, MinerState::Mining);
        state = next_state(state, MinerEvent::StepComplete);
        assert_eq!(state, MinerState::Mining);
        state = next_state(state, MinerEvent::CapacityReached);
        assert_eq!(state, MinerState::ReturnToBase);
        state = next_state(state, MinerEvent::Arrived);
        assert_eq!(state, MinerState::Depositing);
        state = next_state(state, MinerEvent::Deposited);
        assert_eq!(state, MinerState::TravelToMine);
    }

    #[test]
    fn tool_loss_routes_through_await_tool() {
        let state = next_state(MinerState::Depositing, MinerEvent::ToolMissing);
        assert_eq!(state, MinerState::AwaitTool);
        // Still missing: stays put.
        assert_eq!(
            next_state(state, MinerEvent::ToolStillMissing),
            MinerState::AwaitTool
        );
        assert_eq!(
            next_state(state, MinerEvent::ToolAcquired),
            MinerState::TravelToMine
        );
    }

    #[test]
    fn abandonment_returns_to_base() {
        assert_eq!(
            next_state(MinerState::Mining, MinerEvent::Abandoned),
            MinerState::ReturnToBase
        );
        assert_eq!(
            next_state(MinerState::TravelToMine, MinerEvent::Abandoned),
            MinerState::ReturnToBase
        );
    }

    #[test]
    fn travel_retry_stays_in_travel() {
        assert_eq!(
            next_state(MinerState::TravelToMine, MinerEvent::TravelFailed),
            MinerState::TravelToMine
        );
        assert_eq!(
            next_state(MinerState::ReturnToBase, MinerEvent::TravelFailed),
            MinerState::ReturnToBase
        );
    }

    #[test]
    fn mismatched_events_stay_put() {
        assert_eq!(
            next_state(MinerState::Idle, MinerEvent::StepComplete),
            MinerState::Idle
        );
        assert_eq!(
            next_state(MinerState::Mining, MinerEvent::Deposited),
            MinerState::Mining
        );
    }
}
