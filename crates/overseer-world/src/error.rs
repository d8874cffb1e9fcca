//! Error types for world operations.
//!
//! Transaction-level failures are expected during normal operation (a chest
//! fills up, a destination turns out to be unreachable) and are recovered
//! locally by the engines; nothing here aborts a profession by itself.

use overseer_types::{BlockPos, ItemId};

/// Errors produced by [`crate::World`] operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Path-finding could not reach the requested goal.
    #[error("navigation to {goal} failed: {reason}")]
    NavigationFailed {
        /// The goal position.
        goal: BlockPos,
        /// Client-reported reason.
        reason: String,
    },

    /// A navigation attempt exceeded its wall-clock deadline.
    #[error("navigation timed out after {seconds}s")]
    NavigationTimeout {
        /// The deadline that elapsed.
        seconds: u64,
    },

    /// No container block at the position, or the container refused to open.
    #[error("container at {pos} unavailable")]
    ContainerUnavailable {
        /// The container position.
        pos: BlockPos,
    },

    /// A deposit or withdraw was rejected (container full, item missing).
    #[error("container transaction rejected for item {item}: {reason}")]
    TransactionRejected {
        /// The item being moved.
        item: ItemId,
        /// Client-reported reason.
        reason: String,
    },

    /// The craft transaction was rejected by the client.
    #[error("craft rejected: {reason}")]
    CraftRejected {
        /// Client-reported reason.
        reason: String,
    },

    /// The item to equip is not held.
    #[error("cannot equip item {item}: not held")]
    EquipFailed {
        /// The item requested.
        item: ItemId,
    },

    /// Digging the block failed (missing, protected, or unbreakable).
    #[error("dig at {pos} failed: {reason}")]
    DigFailed {
        /// The block position.
        pos: BlockPos,
        /// Client-reported reason.
        reason: String,
    },

    /// Placing a block failed (no support block, position occupied).
    #[error("place at {pos} failed: {reason}")]
    PlaceFailed {
        /// The target position.
        pos: BlockPos,
        /// Client-reported reason.
        reason: String,
    },
}
