//! Block positions and cardinal directions.
//!
//! World coordinates are integer block positions. Distances are compared via
//! squared magnitudes in `i64` to avoid floating-point entirely; nothing in
//! the runtime needs a true Euclidean value, only an ordering.

use serde::{Deserialize, Serialize};

/// An integer block position in world space.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockPos {
    /// East/west axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
    /// North/south axis.
    pub z: i32,
}

impl BlockPos {
    /// Create a position from its components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Return this position shifted by the given deltas.
    ///
    /// Uses saturating arithmetic; positions at the numeric edge of the
    /// world clamp rather than wrap.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z.saturating_add(dz),
        }
    }

    /// Squared Euclidean distance to another position.
    pub fn distance_sq(self, other: Self) -> i64 {
        let dx = i64::from(self.x).saturating_sub(i64::from(other.x));
        let dy = i64::from(self.y).saturating_sub(i64::from(other.y));
        let dz = i64::from(self.z).saturating_sub(i64::from(other.z));
        dx.saturating_mul(dx)
            .saturating_add(dy.saturating_mul(dy))
            .saturating_add(dz.saturating_mul(dz))
    }

    /// Whether another position lies within `range` blocks (Euclidean).
    pub fn within(self, other: Self, range: i64) -> bool {
        self.distance_sq(other) <= range.saturating_mul(range)
    }
}

impl core::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A cardinal direction on the horizontal plane.
///
/// Used for tunnel digging ("mine north") and other directional commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Negative Z.
    North,
    /// Positive Z.
    South,
    /// Positive X.
    East,
    /// Negative X.
    West,
}

impl Direction {
    /// The unit (dx, dz) step for this direction.
    pub const fn step(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// Parse a direction name. Accepts English and Portuguese forms.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "north" | "norte" => Some(Self::North),
            "south" | "sul" => Some(Self::South),
            "east" | "leste" => Some(Self::East),
            "west" | "oeste" => Some(Self::West),
            _ => None,
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_shifts_components() {
        let pos = BlockPos::new(10, 64, -5);
        assert_eq!(pos.offset(1, -2, 3), BlockPos::new(11, 62, -2));
    }

    #[test]
    fn distance_sq_symmetric() {
        let a = BlockPos::new(0, 0, 0);
        let b = BlockPos::new(3, 4, 0);
        assert_eq!(a.distance_sq(b), 25);
        assert_eq!(b.distance_sq(a), 25);
    }

    #[test]
    fn within_range_boundary() {
        let a = BlockPos::new(0, 64, 0);
        let b = BlockPos::new(5, 64, 0);
        assert!(a.within(b, 5));
        assert!(!a.within(b, 4));
    }

    #[test]
    fn direction_steps() {
        assert_eq!(Direction::North.step(), (0, -1));
        assert_eq!(Direction::South.step(), (0, 1));
        assert_eq!(Direction::East.step(), (1, 0));
        assert_eq!(Direction::West.step(), (-1, 0));
    }

    #[test]
    fn direction_parsing_bilingual() {
        assert_eq!(Direction::from_name("North"), Some(Direction::North));
        assert_eq!(Direction::from_name("sul"), Some(Direction::South));
        assert_eq!(Direction::from_name("LESTE"), Some(Direction::East));
        assert_eq!(Direction::from_name("up"), None);
    }
}
