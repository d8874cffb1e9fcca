//! The stock-keeping profession: ferry items from the base drop-off
//! containers into the categorized stockpile.
//!
//! Both the base zone and the stockpile zone are required locations;
//! missing either disables the role.

use std::sync::Arc;

use overseer_world::{World, BASE_ZONE, STOCK_ZONE};

use overseer_logistics::LogisticsEngine;

use crate::error::ProfessionError;
use crate::profession::{Profession, RoleKind};

/// Tunable stock-keeping parameters.
#[derive(Debug, Clone)]
pub struct StockkeeperConfig {
    /// Free slots below which collection is skipped in favor of
    /// distribution.
    pub min_free_slots: u32,
    /// Ticks to rest when there is nothing to collect.
    pub idle_wait_ticks: u32,
}

impl Default for StockkeeperConfig {
    fn default() -> Self {
        Self {
            min_free_slots: 2,
            idle_wait_ticks: 100,
        }
    }
}

/// Stock-keeper states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockkeeperState {
    /// Disabled or verifying configuration.
    Idle,
    /// Emptying the base drop-off containers.
    Collect,
    /// Sorting the haul into the stockpile.
    Distribute,
    /// Nothing to ferry; resting.
    Wait,
}

/// Events observed by the stock-keeper driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockkeeperEvent {
    /// Configuration verified.
    Ready,
    /// Items were collected (or are already held).
    HaveItems,
    /// Nothing to collect and nothing held.
    NothingToDo,
    /// The distribution pass finished.
    Distributed,
    /// The rest period ended.
    WaitOver,
}

/// The stock-keeper transition function. Unmatched pairs stay put.
pub const fn next_state(state: StockkeeperState, event: StockkeeperEvent) -> StockkeeperState {
    match (state, event) {
        (StockkeeperState::Idle, StockkeeperEvent::Ready)
        | (StockkeeperState::Distribute, StockkeeperEvent::Distributed)
        | (StockkeeperState::Wait, StockkeeperEvent::WaitOver) => StockkeeperState::Collect,
        (StockkeeperState::Collect, StockkeeperEvent::HaveItems) => StockkeeperState::Distribute,
        (StockkeeperState::Collect, StockkeeperEvent::NothingToDo) => StockkeeperState::Wait,
        (current, _) => current,
    }
}

/// The stock-keeping profession driver.
pub struct Stockkeeper<W> {
    world: Arc<W>,
    logistics: Arc<LogisticsEngine<W>>,
    config: StockkeeperConfig,
    enabled: bool,
    state: StockkeeperState,
}

impl<W: World> Stockkeeper<W> {
    /// Assemble the stock-keeper with its collaborators.
    pub const fn new(
        world: Arc<W>,
        logistics: Arc<LogisticsEngine<W>>,
        config: StockkeeperConfig,
    ) -> Self {
        Self {
            world,
            logistics,
            config,
            enabled: false,
            state: StockkeeperState::Idle,
        }
    }

    /// The current state (exposed for the status report and tests).
    pub const fn state(&self) -> StockkeeperState {
        self.state
    }

    /// Verify both required zones exist before doing anything.
    async fn verify_config(&self) -> Result<StockkeeperEvent, ProfessionError> {
        for zone in [BASE_ZONE, STOCK_ZONE] {
            if !self.logistics.locations().has(zone).await? {
                return Err(ProfessionError::MissingLocation(zone.to_owned()));
            }
        }
        Ok(StockkeeperEvent::Ready)
    }

    async fn collect(&mut self) -> Result<StockkeeperEvent, ProfessionError> {
        let mut collected = false;
        if self.world.empty_slots() >= self.config.min_free_slots {
            collected = self.logistics.collect_from_zone(BASE_ZONE).await?;
        }
        if collected || !self.world.inventory().is_empty() {
            return Ok(StockkeeperEvent::HaveItems);
        }
        Ok(StockkeeperEvent::NothingToDo)
    }

    async fn distribute(&mut self) -> Result<StockkeeperEvent, ProfessionError> {
        if !self.world.inventory().is_empty() {
            let emptied = self
                .logistics
                .distribute_to_stock(STOCK_ZONE, BASE_ZONE)
                .await?;
            if !emptied {
                self.world.say("Some items would not fit anywhere.");
            }
        }
        Ok(StockkeeperEvent::Distributed)
    }

    async fn rest(&mut self) -> Result<StockkeeperEvent, ProfessionError> {
        self.world.wait_ticks(self.config.idle_wait_ticks).await;
        Ok(StockkeeperEvent::WaitOver)
    }
}

impl<W: World> Profession for Stockkeeper<W> {
    fn role(&self) -> RoleKind {
        RoleKind::Stockkeeper
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
            self.state = StockkeeperState::Idle;
            self.world.say("Stock-keeper enabled.");
        } else {
            self.state = StockkeeperState::Idle;
            self.world.cancel_navigation();
            self.world.say("Stock-keeper disabled.");
        }
    }

    async fn run_cycle(&mut self) -> Result<(), ProfessionError> {
        if !self.enabled {
            return Ok(());
        }
        let event = match self.state {
            StockkeeperState::Idle => self.verify_config().await?,
            StockkeeperState::Collect => self.collect().await?,
            StockkeeperState::Distribute => self.distribute().await?,
            StockkeeperState::Wait => self.rest().await?,
        };
        self.state = next_state(self.state, event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ferry_loop_transitions() {
        let mut state = StockkeeperState::Idle;
        state = next_state(state, StockkeeperEvent::Ready);
        assert_eq!(state, StockkeeperState::Collect);
        state = next_state(state, StockkeeperEvent::HaveItems);
        assert_eq!(state, StockkeeperState::Distribute);
        state = next_state(state, StockkeeperEvent::Distributed);
        assert_eq!(state, StockkeeperState::Collect);
    }

    #[test]
    fn idle_base_rests() {
        let mut state = next_state(StockkeeperState::Collect, StockkeeperEvent::NothingToDo);
        assert_eq!(state, StockkeeperState::Wait);
        state = next_state(state, StockkeeperEvent::WaitOver);
        assert_eq!(state, StockkeeperState::Collect);
    }
}
