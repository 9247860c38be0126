//! L-shaped corridors between room centers
//!
//! A corridor walks one axis fully from its start to a corner point, then
//! the other axis from the corner to its end. Carving only converts wall
//! tiles, so room floors crossed by a corridor stay floor.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::rng::DungeonRng;
use crate::room::Room;
use crate::tile::Tile;

/// Which axis an L-shaped corridor walks first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BendOrder {
    HorizontalThenVertical,
    VerticalThenHorizontal,
}

impl BendOrder {
    /// Pick a bend order with a fair coin flip
    pub fn random(rng: &mut DungeonRng) -> Self {
        if rng.coin_flip() {
            BendOrder::HorizontalThenVertical
        } else {
            BendOrder::VerticalThenHorizontal
        }
    }
}

/// An L-shaped path between two points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub start_x: usize,
    pub start_y: usize,
    pub end_x: usize,
    pub end_y: usize,
    pub bend: BendOrder,
}

impl Corridor {
    pub fn new(start: (usize, usize), end: (usize, usize), bend: BendOrder) -> Self {
        Self {
            start_x: start.0,
            start_y: start.1,
            end_x: end.0,
            end_y: end.1,
            bend,
        }
    }

    /// Corridor joining the centers of two rooms
    pub fn between(from: &Room, to: &Room, bend: BendOrder) -> Self {
        Self::new(from.center(), to.center(), bend)
    }

    /// Point where the corridor turns
    pub fn corner(&self) -> (usize, usize) {
        match self.bend {
            BendOrder::HorizontalThenVertical => (self.end_x, self.start_y),
            BendOrder::VerticalThenHorizontal => (self.start_x, self.end_y),
        }
    }

    /// Carve the corridor into a grid.
    ///
    /// Only wall tiles become corridor; floor, corridor and door tiles are
    /// left as they are and out-of-bounds steps are skipped. Returns the
    /// number of tiles newly carved.
    pub fn carve(&self, grid: &mut Grid) -> usize {
        let (cx, cy) = self.corner();
        match self.bend {
            BendOrder::HorizontalThenVertical => {
                carve_horizontal(grid, self.start_x, cx, self.start_y)
                    + carve_vertical(grid, cy, self.end_y, cx)
            }
            BendOrder::VerticalThenHorizontal => {
                carve_vertical(grid, self.start_y, cy, self.start_x)
                    + carve_horizontal(grid, cx, self.end_x, cy)
            }
        }
    }
}

fn carve_horizontal(grid: &mut Grid, x1: usize, x2: usize, y: usize) -> usize {
    (x1.min(x2)..=x1.max(x2))
        .filter(|&x| carve_tile(grid, x, y))
        .count()
}

fn carve_vertical(grid: &mut Grid, y1: usize, y2: usize, x: usize) -> usize {
    (y1.min(y2)..=y1.max(y2))
        .filter(|&y| carve_tile(grid, x, y))
        .count()
}

fn carve_tile(grid: &mut Grid, x: usize, y: usize) -> bool {
    grid.get(x, y) == Some(Tile::Wall) && grid.set(x, y, Tile::Corridor)
}
