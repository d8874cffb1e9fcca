//! Named axis-aligned regions and persisted places.
//!
//! A [`Zone`] is the working unit for both "where to stand" and "bounding
//! box to search for storage containers". A [`Place`] is the flat record the
//! Location Store persists: a point with optional horizontal extents. A
//! place with extents is a zone; a bare point is a 1x1 zone.

use serde::{Deserialize, Serialize};

use crate::geometry::BlockPos;

/// Vertical slack applied below a zone's origin when no explicit height is
/// given. Containers sit on floors that may be one block under the marked
/// origin.
const VERTICAL_SLACK_BELOW: i32 = 1;

/// Vertical slack applied above a zone's origin when no explicit height is
/// given.
const VERTICAL_SLACK_ABOVE: i32 = 2;

/// An axis-aligned rectangular region in world space.
///
/// Invariant: `width >= 1` and `depth >= 1` (enforced by [`Zone::new`]).
/// Bounds are inclusive on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// The region's anchor corner (minimum x/z).
    pub origin: BlockPos,
    /// Extent along +x.
    pub width: u32,
    /// Extent along +z.
    pub depth: u32,
    /// Optional extent along +y. When absent, containment uses a fixed
    /// vertical tolerance band around the origin.
    pub height: Option<u32>,
}

impl Zone {
    /// Create a zone, clamping degenerate extents up to 1.
    pub fn new(origin: BlockPos, width: u32, depth: u32) -> Self {
        Self {
            origin,
            width: width.max(1),
            depth: depth.max(1),
            height: None,
        }
    }

    /// Set an explicit vertical extent.
    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Whether a position lies inside the zone's box (inclusive bounds).
    ///
    /// Without an explicit height the vertical band is `origin.y - 1` to
    /// `origin.y + 2`, matching where containers actually sit relative to a
    /// marked floor position.
    pub fn contains(&self, pos: BlockPos) -> bool {
        let max_x = self.origin.x.saturating_add(i32::try_from(self.width).unwrap_or(i32::MAX));
        let max_z = self.origin.z.saturating_add(i32::try_from(self.depth).unwrap_or(i32::MAX));

        let (min_y, max_y) = match self.height {
            Some(h) => (
                self.origin.y,
                self.origin.y.saturating_add(i32::try_from(h).unwrap_or(i32::MAX)),
            ),
            None => (
                self.origin.y.saturating_sub(VERTICAL_SLACK_BELOW),
                self.origin.y.saturating_add(VERTICAL_SLACK_ABOVE),
            ),
        };

        pos.x >= self.origin.x
            && pos.x <= max_x
            && pos.z >= self.origin.z
            && pos.z <= max_z
            && pos.y >= min_y
            && pos.y <= max_y
    }

    /// The horizontal center of the zone at origin height.
    ///
    /// Used when a single representative point is needed, e.g. where to
    /// stand or where to place a station block.
    pub fn center(&self) -> BlockPos {
        let half_w = i32::try_from(self.width / 2).unwrap_or(0);
        let half_d = i32::try_from(self.depth / 2).unwrap_or(0);
        BlockPos::new(
            self.origin.x.saturating_add(half_w),
            self.origin.y,
            self.origin.z.saturating_add(half_d),
        )
    }
}

/// A named point or region as persisted by the Location Store.
///
/// The store keeps a flat `name -> Place` mapping; the core never mutates
/// places itself beyond what setup commands write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Anchor x.
    pub x: i32,
    /// Anchor y.
    pub y: i32,
    /// Anchor z.
    pub z: i32,
    /// Optional region width (+x extent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Optional region depth (+z extent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

impl Place {
    /// A bare point.
    pub const fn point(x: i32, y: i32, z: i32) -> Self {
        Self {
            x,
            y,
            z,
            width: None,
            depth: None,
        }
    }

    /// A point with horizontal extents.
    pub const fn region(x: i32, y: i32, z: i32, width: u32, depth: u32) -> Self {
        Self {
            x,
            y,
            z,
            width: Some(width),
            depth: Some(depth),
        }
    }

    /// The anchor position.
    pub const fn anchor(&self) -> BlockPos {
        BlockPos::new(self.x, self.y, self.z)
    }

    /// View the place as a zone (bare points become 1x1 zones).
    pub fn zone(&self) -> Zone {
        Zone::new(
            self.anchor(),
            self.width.unwrap_or(1),
            self.depth.unwrap_or(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_extents_clamped() {
        let zone = Zone::new(BlockPos::new(0, 64, 0), 0, 0);
        assert_eq!(zone.width, 1);
        assert_eq!(zone.depth, 1);
    }

    #[test]
    fn contains_is_inclusive_on_horizontal_bounds() {
        let zone = Zone::new(BlockPos::new(0, 64, 0), 5, 5);
        assert!(zone.contains(BlockPos::new(0, 64, 0)));
        assert!(zone.contains(BlockPos::new(5, 64, 5)));
        assert!(!zone.contains(BlockPos::new(6, 64, 5)));
        assert!(!zone.contains(BlockPos::new(-1, 64, 0)));
    }

    #[test]
    fn default_vertical_band() {
        let zone = Zone::new(BlockPos::new(0, 64, 0), 5, 5);
        assert!(zone.contains(BlockPos::new(2, 63, 2)));
        assert!(zone.contains(BlockPos::new(2, 66, 2)));
        assert!(!zone.contains(BlockPos::new(2, 62, 2)));
        assert!(!zone.contains(BlockPos::new(2, 67, 2)));
    }

    #[test]
    fn explicit_height_overrides_band() {
        let zone = Zone::new(BlockPos::new(0, 64, 0), 5, 5).with_height(10);
        assert!(zone.contains(BlockPos::new(2, 74, 2)));
        assert!(!zone.contains(BlockPos::new(2, 63, 2)));
    }

    #[test]
    fn center_of_region() {
        let zone = Zone::new(BlockPos::new(10, 64, 20), 6, 4);
        assert_eq!(zone.center(), BlockPos::new(13, 64, 22));
    }

    #[test]
    fn place_serde_omits_absent_extents() {
        let place = Place::point(1, 2, 3);
        let json = serde_json::to_string(&place).unwrap_or_default();
        assert_eq!(json, r#"{"x":1,"y":2,"z":3}"#);

        let region = Place::region(0, 64, 0, 5, 5);
        let back: Option<Place> =
            serde_json::from_str(&serde_json::to_string(&region).unwrap_or_default()).ok();
        assert_eq!(back, Some(region));
    }

    #[test]
    fn point_becomes_unit_zone() {
        let place = Place::point(3, 70, -2);
        let zone = place.zone();
        assert_eq!(zone.width, 1);
        assert_eq!(zone.depth, 1);
        assert!(zone.contains(BlockPos::new(3, 70, -2)));
    }
}
