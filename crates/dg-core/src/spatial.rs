//! Spatial hashing for room overlap queries
//!
//! The world is divided into square cells of `cell_size` tiles. Each room
//! is recorded in every cell its bounding box touches, so a query only has
//! to look at rooms sharing a cell with the candidate instead of scanning
//! every placed room.
//!
//! The index stores room *indices* only. Callers keep the rooms themselves
//! (see [`crate::RoomStore`]) and resolve candidates with
//! [`Room::overlaps`]; query results may contain false positives but never
//! miss a true overlap.
//!
//! A cell size close to the typical room size keeps each room in O(1)
//! cells. Much smaller cells multiply redundant entries, much larger ones
//! degrade towards a linear scan.

use hashbrown::{HashMap, HashSet};

use crate::room::{DEFAULT_PADDING, Room};

/// Upper bound on buckets reserved up front for large worlds
const MAX_PRESIZED_CELLS: usize = 4096;

/// Room indices bucketed by grid cell
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: usize,
    world_width: usize,
    cells: HashMap<usize, Vec<usize>>,
    rooms: usize,
    /// Furthest right and bottom edges of any inserted room
    extent: (usize, usize),
}

impl SpatialIndex {
    /// Create an empty index. A zero cell size is treated as 1.
    pub fn new(cell_size: usize, world_width: usize, world_height: usize) -> Self {
        let cell_size = cell_size.max(1);
        let world_cells =
            (world_width / cell_size + 1).saturating_mul(world_height / cell_size + 1);
        Self {
            cell_size,
            world_width,
            cells: HashMap::with_capacity(world_cells.min(MAX_PRESIZED_CELLS)),
            rooms: 0,
            extent: (0, 0),
        }
    }

    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    /// Fold cell coordinates into a single id
    fn cell_id(&self, cell_x: usize, cell_y: usize) -> usize {
        cell_x + cell_y * (self.world_width / self.cell_size + 1)
    }

    /// Cell ids covering the inclusive tile span `[x0, x1] × [y0, y1]`
    fn cell_ids(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> Vec<usize> {
        let cs = self.cell_size;
        let mut ids = Vec::with_capacity((x1 / cs - x0 / cs + 1) * (y1 / cs - y0 / cs + 1));
        for cy in y0 / cs..=y1 / cs {
            for cx in x0 / cs..=x1 / cs {
                ids.push(self.cell_id(cx, cy));
            }
        }
        ids
    }

    /// Cells spanned by a room: `(x, y)` through `(x + width, y + height)`
    fn room_cells(&self, room: &Room) -> Vec<usize> {
        self.cell_ids(room.x, room.y, room.right(), room.bottom())
    }

    /// Record `room_index` in every cell the room touches
    pub fn insert(&mut self, room: &Room, room_index: usize) {
        for id in self.room_cells(room) {
            self.cells.entry(id).or_default().push(room_index);
        }
        self.rooms += 1;
        self.extent = (
            self.extent.0.max(room.right()),
            self.extent.1.max(room.bottom()),
        );
    }

    /// Remove every room from the index
    pub fn clear(&mut self) {
        self.cells.clear();
        self.rooms = 0;
        self.extent = (0, 0);
    }

    /// Indices of rooms sharing at least one cell with `room`.
    ///
    /// Sorted and de-duplicated. A superset of the rooms that overlap
    /// `room` at the default padding.
    pub fn potential_overlaps(&self, room: &Room) -> Vec<usize> {
        self.collect(self.room_cells(room))
    }

    /// Indices of rooms that may overlap `room` at the given padding.
    ///
    /// The queried span is widened by `padding - 1` tiles on each side,
    /// which keeps the result a superset of the true overlaps for any
    /// padding and any cell size.
    pub fn candidates(&self, room: &Room, padding: usize) -> Vec<usize> {
        let grow = padding.saturating_sub(DEFAULT_PADDING);
        // nothing is stored past the extent, so the span can stop there
        let x1 = room
            .right()
            .saturating_add(grow)
            .min(self.extent.0.max(room.right()));
        let y1 = room
            .bottom()
            .saturating_add(grow)
            .min(self.extent.1.max(room.bottom()));
        let ids = self.cell_ids(room.x.saturating_sub(grow), room.y.saturating_sub(grow), x1, y1);
        self.collect(ids)
    }

    fn collect(&self, ids: Vec<usize>) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut found: Vec<usize> = ids
            .iter()
            .filter_map(|id| self.cells.get(id))
            .flatten()
            .copied()
            .filter(|&idx| seen.insert(idx))
            .collect();
        found.sort_unstable();
        found
    }

    /// Number of rooms inserted since the last clear
    pub fn len(&self) -> usize {
        self.rooms
    }

    pub fn is_empty(&self) -> bool {
        self.rooms == 0
    }

    /// Number of cells holding at least one room
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_id_folding() {
        let index = SpatialIndex::new(10, 50, 50);
        assert_eq!(index.cell_id(0, 0), 0);
        assert_eq!(index.cell_id(3, 0), 3);
        // 50 / 10 + 1 = 6 cells per row
        assert_eq!(index.cell_id(0, 1), 6);
        assert_eq!(index.cell_id(2, 3), 20);
    }

    #[test]
    fn test_insert_spans_cells() {
        let mut index = SpatialIndex::new(10, 100, 100);
        // x 5..=15, y 5..=8 touches cells (0,0) and (1,0)
        index.insert(&Room::new(5, 5, 10, 3), 0);
        assert_eq!(index.len(), 1);
        assert_eq!(index.occupied_cells(), 2);
    }

    #[test]
    fn test_potential_overlaps_dedups() {
        let mut index = SpatialIndex::new(5, 100, 100);
        index.insert(&Room::new(1, 1, 12, 12), 0);
        index.insert(&Room::new(40, 40, 3, 3), 1);

        let probe = Room::new(2, 2, 10, 10);
        assert_eq!(index.potential_overlaps(&probe), vec![0]);
    }

    #[test]
    fn test_far_rooms_not_reported() {
        let mut index = SpatialIndex::new(8, 64, 64);
        index.insert(&Room::new(1, 1, 4, 4), 0);
        assert!(index.potential_overlaps(&Room::new(40, 40, 4, 4)).is_empty());
    }

    #[test]
    fn test_edge_touching_found() {
        let mut index = SpatialIndex::new(10, 100, 100);
        let placed = Room::new(0, 0, 10, 10);
        index.insert(&placed, 0);

        let touching = Room::new(10, 0, 10, 10);
        assert!(placed.overlaps(&touching, DEFAULT_PADDING));
        assert_eq!(index.potential_overlaps(&touching), vec![0]);
    }

    #[test]
    fn test_candidates_wide_padding() {
        let mut index = SpatialIndex::new(4, 100, 100);
        let placed = Room::new(2, 2, 3, 3);
        index.insert(&placed, 7);

        // 4 tiles of clear space: overlapping only once padding reaches 5
        let probe = Room::new(9, 2, 3, 3);
        assert!(placed.overlaps(&probe, 5));
        assert_eq!(index.candidates(&probe, 5), vec![7]);
    }

    #[test]
    fn test_candidates_unbounded_padding() {
        let mut index = SpatialIndex::new(4, 100, 100);
        index.insert(&Room::new(2, 2, 3, 3), 0);
        index.insert(&Room::new(80, 90, 5, 5), 1);

        let probe = Room::new(40, 40, 3, 3);
        assert_eq!(index.candidates(&probe, usize::MAX), vec![0, 1]);

        index.clear();
        index.insert(&Room::new(2, 2, 3, 3), 0);
        assert_eq!(index.candidates(&probe, usize::MAX), vec![0]);
    }

    #[test]
    fn test_clear() {
        let mut index = SpatialIndex::new(10, 100, 100);
        index.insert(&Room::new(5, 5, 5, 5), 0);
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.occupied_cells(), 0);
        assert!(index.potential_overlaps(&Room::new(5, 5, 5, 5)).is_empty());
    }

    #[test]
    fn test_zero_cell_size_clamped() {
        let index = SpatialIndex::new(0, 10, 10);
        assert_eq!(index.cell_size(), 1);
    }
}
