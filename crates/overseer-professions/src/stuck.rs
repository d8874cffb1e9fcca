//! Anti-stuck watchdog for navigation-heavy roles.
//!
//! Path-finding occasionally wedges an agent against a corner or a ledge.
//! The watchdog tracks the last time the agent actually moved; once it has
//! been idle past the threshold with a goal active, it escalates through a
//! bounded sequence: small corrective nudges, then reissuing the goal from
//! scratch, then abandoning the objective entirely so the role can fall
//! back to a safe state instead of looping forever.

use std::time::{Duration, Instant};

use rand::Rng;

use overseer_types::BlockPos;
use overseer_world::{MoveProfile, NavGoal, World};

/// Idle time before the watchdog intervenes.
pub const STUCK_THRESHOLD: Duration = Duration::from_secs(5);

/// Corrective nudges before the goal is reissued.
pub const NUDGE_LIMIT: u32 = 3;

/// Goal reissues before the objective is abandoned.
pub const REISSUE_LIMIT: u32 = 2;

/// What the driver should do about the current stall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckAction {
    /// Moving normally; nothing to do.
    None,
    /// Try a small corrective movement.
    Nudge,
    /// Re-issue the active navigation goal from scratch.
    Reissue,
    /// Give up on the current objective and fall back to a safe state.
    Abandon,
}

/// Tracks movement and escalates stall recovery.
#[derive(Debug)]
pub struct StuckWatchdog {
    threshold: Duration,
    last_pos: Option<BlockPos>,
    last_move: Option<Instant>,
    nudges: u32,
    reissues: u32,
}

impl StuckWatchdog {
    /// Watchdog with the default threshold.
    pub fn new() -> Self {
        Self::with_threshold(STUCK_THRESHOLD)
    }

    /// Watchdog with a custom threshold (tests use tiny ones).
    pub const fn with_threshold(threshold: Duration) -> Self {
        Self {
            threshold,
            last_pos: None,
            last_move: None,
            nudges: 0,
            reissues: 0,
        }
    }

    /// Report the agent's position once per cycle; returns the recovery
    /// action to take now.
    ///
    /// `now` is passed in rather than read so escalation is testable
    /// without real waiting.
    pub fn observe(&mut self, pos: BlockPos, now: Instant) -> StuckAction {
        let Some(last_pos) = self.last_pos else {
            self.last_pos = Some(pos);
            self.last_move = Some(now);
            return StuckAction::None;
        };

        if pos != last_pos {
            self.last_pos = Some(pos);
            self.last_move = Some(now);
            self.nudges = 0;
            self.reissues = 0;
            return StuckAction::None;
        }

        let idle = self
            .last_move
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        if idle < self.threshold {
            return StuckAction::None;
        }

        // The timer restarts after every intervention so each escalation
        // step gets a full threshold to take effect.
        self.last_move = Some(now);

        if self.nudges < NUDGE_LIMIT {
            self.nudges = self.nudges.saturating_add(1);
            return StuckAction::Nudge;
        }
        if self.reissues < REISSUE_LIMIT {
            self.reissues = self.reissues.saturating_add(1);
            self.nudges = 0;
            return StuckAction::Reissue;
        }
        self.reset();
        StuckAction::Abandon
    }

    /// Forget all tracked state (called when a role is disabled or changes
    /// objective).
    pub fn reset(&mut self) {
        self.last_pos = None;
        self.last_move = None;
        self.nudges = 0;
        self.reissues = 0;
    }
}

impl Default for StuckWatchdog {
    fn default() -> Self {
        Self::new()
    }
}

/// Attempt a small corrective movement in a random lateral direction.
pub async fn corrective_nudge<W: World>(world: &W) {
    const LATERAL: &[(i32, i32)] = &[(1, 0), (-1, 0), (0, 1), (0, -1)];
    let pick = rand::rng().random_range(0..LATERAL.len());
    let (dx, dz) = LATERAL.get(pick).copied().unwrap_or((1, 0));
    let target = world.position().offset(dx, 0, dz);
    // Best effort; a failed nudge just leaves us for the next escalation.
    let _ = world
        .navigate(NavGoal::exact(target), MoveProfile::free())
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, offset_ms: u64) -> Instant {
        base + Duration::from_millis(offset_ms)
    }

    #[test]
    fn moving_agent_never_escalates() {
        let base = Instant::now();
        let mut dog = StuckWatchdog::with_threshold(Duration::from_millis(100));
        for step in 0..20u64 {
            let pos = BlockPos::new(i32::try_from(step).unwrap_or(0), 64, 0);
            assert_eq!(dog.observe(pos, at(base, step * 200)), StuckAction::None);
        }
    }

    #[test]
    fn escalation_sequence_nudge_reissue_abandon() {
        let base = Instant::now();
        let mut dog = StuckWatchdog::with_threshold(Duration::from_millis(10));
        let pos = BlockPos::new(5, 64, 5);

        assert_eq!(dog.observe(pos, base), StuckAction::None);

        let mut actions = Vec::new();
        for step in 1..=12u64 {
            actions.push(dog.observe(pos, at(base, step * 20)));
        }

        // 3 nudges, reissue, 3 nudges, reissue, 3 nudges, abandon.
        assert_eq!(
            actions,
            vec![
                StuckAction::Nudge,
                StuckAction::Nudge,
                StuckAction::Nudge,
                StuckAction::Reissue,
                StuckAction::Nudge,
                StuckAction::Nudge,
                StuckAction::Nudge,
                StuckAction::Reissue,
                StuckAction::Nudge,
                StuckAction::Nudge,
                StuckAction::Nudge,
                StuckAction::Abandon,
            ]
        );
    }

    #[test]
    fn movement_resets_escalation() {
        let base = Instant::now();
        let mut dog = StuckWatchdog::with_threshold(Duration::from_millis(10));
        let stuck = BlockPos::new(5, 64, 5);

        assert_eq!(dog.observe(stuck, base), StuckAction::None);
        assert_eq!(dog.observe(stuck, at(base, 20)), StuckAction::Nudge);
        assert_eq!(dog.observe(stuck, at(base, 40)), StuckAction::Nudge);

        // The agent moves: everything resets.
        let moved = BlockPos::new(6, 64, 5);
        assert_eq!(dog.observe(moved, at(base, 60)), StuckAction::None);
        assert_eq!(dog.observe(moved, at(base, 80)), StuckAction::Nudge);
    }

    #[test]
    fn within_threshold_is_quiet() {
        let base = Instant::now();
        let mut dog = StuckWatchdog::with_threshold(Duration::from_secs(60));
        let pos = BlockPos::new(1, 64, 1);
        assert_eq!(dog.observe(pos, base), StuckAction::None);
        assert_eq!(dog.observe(pos, at(base, 500)), StuckAction::None);
    }

    #[tokio::test]
    async fn nudge_moves_one_block() {
        let world = overseer_world::SimWorld::vanilla();
        world.set_position(BlockPos::new(10, 64, 10));
        corrective_nudge(&world).await;
        let pos = world.position();
        assert_eq!(pos.y, 64);
        assert_eq!(
            (pos.x - 10).abs() + (pos.z - 10).abs(),
            1,
            "nudge should move exactly one lateral block"
        );
    }
}
