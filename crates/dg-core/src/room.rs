//! Rectangular rooms and the padded overlap test

use serde::{Deserialize, Serialize};

use crate::rng::DungeonRng;

/// Padding used by the generator when testing candidate rooms.
///
/// With a padding of 1, rooms that merely share an edge count as
/// overlapping, so at least one wall tile always separates two rooms.
pub const DEFAULT_PADDING: usize = 1;

/// Rectangle representing a room interior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// X coordinate of room interior (left edge)
    pub x: usize,
    /// Y coordinate of room interior (top edge)
    pub y: usize,
    /// Width of room interior
    pub width: usize,
    /// Height of room interior
    pub height: usize,
}

impl Room {
    /// Create a new room. Width and height must be positive.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0, "room must have positive size");
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if this room overlaps another once both are grown by `padding`
    ///
    /// Padding 0 treats edge-touching rooms as separate; padding 1 treats
    /// them as overlapping. The test is symmetric in its two rooms.
    pub fn overlaps(&self, other: &Room, padding: usize) -> bool {
        self.x < other.right().saturating_add(padding)
            && self.right().saturating_add(padding) > other.x
            && self.y < other.bottom().saturating_add(padding)
            && self.bottom().saturating_add(padding) > other.y
    }

    /// Center x (rounded down)
    pub fn center_x(&self) -> usize {
        self.x + self.width / 2
    }

    /// Center y (rounded down)
    pub fn center_y(&self) -> usize {
        self.y + self.height / 2
    }

    /// Get center of room
    pub fn center(&self) -> (usize, usize) {
        (self.center_x(), self.center_y())
    }

    /// Exclusive right edge
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Check if point is inside room
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Get room area
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Get a random point inside the room, e.g. for spawn placement
    pub fn random_point(&self, rng: &mut DungeonRng) -> (usize, usize) {
        let x = rng.range_inclusive(self.x, self.right() - 1);
        let y = rng.range_inclusive(self.y, self.bottom() - 1);
        (x, y)
    }
}
