//! The tile grid produced by generation
//!
//! Cells are stored row-major. Every in-bounds cell holds a storable tile
//! (anything but [`Tile::Empty`]); reads outside the grid return
//! [`Tile::Empty`].

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::DumpError;
use crate::room::Room;
use crate::tile::Tile;

/// A `height × width` matrix of tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "GridRepr", try_from = "GridRepr")]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a grid with every cell set to `tile`.
    ///
    /// `Tile::Empty` is not storable and is replaced by `Tile::Wall`.
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        let tile = if tile.is_storable() { tile } else { Tile::Wall };
        Self {
            width,
            height,
            tiles: vec![tile; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Tile at a position, `None` outside the grid
    pub fn get(&self, x: usize, y: usize) -> Option<Tile> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    /// Tile at a position, [`Tile::Empty`] outside the grid
    pub fn tile(&self, x: usize, y: usize) -> Tile {
        self.get(x, y).unwrap_or(Tile::Empty)
    }

    /// Store a tile. Returns false (and leaves the grid untouched) for
    /// out-of-bounds positions and for `Tile::Empty`.
    pub fn set(&mut self, x: usize, y: usize, tile: Tile) -> bool {
        if !tile.is_storable() {
            return false;
        }
        match self.index(x, y) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Rasterize a room interior as floor, clipped to the grid
    pub fn fill_room(&mut self, room: &Room) {
        let x_end = room.right().min(self.width);
        let y_end = room.bottom().min(self.height);
        for y in room.y..y_end {
            let row = y * self.width;
            self.tiles[row + room.x.min(x_end)..row + x_end].fill(Tile::Floor);
        }
    }

    /// Row slices, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks_exact(self.width.max(1))
    }

    /// Rows of integer tile codes
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|t| t.code()).collect())
            .collect()
    }

    /// Number of cells holding `tile`
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Iterate over all cells as `(x, y, tile)`
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        let width = self.width.max(1);
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &t)| (i % width, i / width, t))
    }

    /// Render the raw dump format: a `"width height"` header line followed
    /// by one line per row of space-separated tile codes.
    pub fn to_dump(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() * 2 + 16);
        let _ = writeln!(out, "{} {}", self.width, self.height);
        for row in self.rows() {
            for (x, tile) in row.iter().enumerate() {
                if x > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{}", tile.code());
            }
            out.push('\n');
        }
        out
    }

    /// Parse the raw dump format produced by [`Grid::to_dump`]
    pub fn from_dump(text: &str) -> Result<Self, DumpError> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header = lines.next().ok_or(DumpError::MissingHeader)?;

        let dims: Vec<usize> = header
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| DumpError::MalformedHeader(header.to_string()))?;
        let &[width, height] = dims.as_slice() else {
            return Err(DumpError::MalformedHeader(header.to_string()));
        };

        let cells = width
            .checked_mul(height)
            .ok_or(DumpError::TooLarge { width, height })?;
        // every tile takes at least two bytes of text
        let mut tiles = Vec::with_capacity(cells.min(text.len() / 2));
        let mut rows = 0;
        for (row, line) in lines.enumerate() {
            rows += 1;
            if row >= height {
                continue;
            }
            let mut columns = 0;
            for (column, value) in line.split_whitespace().enumerate() {
                columns += 1;
                let tile = value
                    .parse::<u8>()
                    .ok()
                    .and_then(|code| Tile::try_from(code).ok())
                    .filter(|t| t.is_storable())
                    .ok_or_else(|| DumpError::InvalidTile {
                        row,
                        column,
                        value: value.to_string(),
                    })?;
                tiles.push(tile);
            }
            if columns != width {
                return Err(DumpError::ColumnCount {
                    row,
                    expected: width,
                    found: columns,
                });
            }
        }
        if rows != height {
            return Err(DumpError::RowCount {
                expected: height,
                found: rows,
            });
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Draw the grid with one character per tile
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.rows() {
            out.extend(row.iter().map(|t| t.symbol()));
            out.push('\n');
        }
        out
    }
}

/// Serialized shape of a grid: nested rows of tile codes
#[derive(Serialize, Deserialize)]
struct GridRepr {
    width: usize,
    height: usize,
    tiles: Vec<Vec<u8>>,
}

impl From<Grid> for GridRepr {
    fn from(grid: Grid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            tiles: grid.to_codes(),
        }
    }
}

impl TryFrom<GridRepr> for Grid {
    type Error = DumpError;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        if repr.tiles.len() != repr.height {
            return Err(DumpError::RowCount {
                expected: repr.height,
                found: repr.tiles.len(),
            });
        }
        let cells = repr
            .width
            .checked_mul(repr.height)
            .ok_or(DumpError::TooLarge {
                width: repr.width,
                height: repr.height,
            })?;
        let mut tiles = Vec::with_capacity(cells.min(repr.tiles.iter().map(Vec::len).sum()));
        for (row, codes) in repr.tiles.iter().enumerate() {
            if codes.len() != repr.width {
                return Err(DumpError::ColumnCount {
                    row,
                    expected: repr.width,
                    found: codes.len(),
                });
            }
            for (column, &code) in codes.iter().enumerate() {
                let tile = Tile::try_from(code)
                    .ok()
                    .filter(|t| t.is_storable())
                    .ok_or_else(|| DumpError::InvalidTile {
                        row,
                        column,
                        value: code.to_string(),
                    })?;
                tiles.push(tile);
            }
        }
        Ok(Self {
            width: repr.width,
            height: repr.height,
            tiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_dimensions() {
        let grid = Grid::filled(7, 3, Tile::Wall);
        assert_eq!(grid.width(), 7);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.rows().count(), 3);
        assert!(grid.rows().all(|r| r.len() == 7));
        assert_eq!(grid.count(Tile::Wall), 21);
    }

    #[test]
    fn test_filled_rejects_empty() {
        let grid = Grid::filled(2, 2, Tile::Empty);
        assert_eq!(grid.count(Tile::Empty), 0);
        assert_eq!(grid.count(Tile::Wall), 4);
    }

    #[test]
    fn test_out_of_bounds_reads_empty() {
        let grid = Grid::filled(4, 4, Tile::Wall);
        assert_eq!(grid.tile(3, 3), Tile::Wall);
        assert_eq!(grid.tile(4, 0), Tile::Empty);
        assert_eq!(grid.tile(0, 4), Tile::Empty);
        assert_eq!(grid.get(10, 10), None);
    }

    #[test]
    fn test_set_refuses_empty_and_out_of_bounds() {
        let mut grid = Grid::filled(4, 4, Tile::Wall);
        assert!(grid.set(1, 2, Tile::Corridor));
        assert_eq!(grid.tile(1, 2), Tile::Corridor);
        assert!(!grid.set(1, 2, Tile::Empty));
        assert_eq!(grid.tile(1, 2), Tile::Corridor);
        assert!(!grid.set(4, 0, Tile::Floor));
    }

    #[test]
    fn test_fill_room() {
        let mut grid = Grid::filled(10, 8, Tile::Wall);
        let room = Room::new(2, 3, 4, 2);
        grid.fill_room(&room);

        assert_eq!(grid.count(Tile::Floor), 8);
        for (x, y, tile) in grid.cells() {
            assert_eq!(tile == Tile::Floor, room.contains(x, y), "({x}, {y})");
        }
    }

    #[test]
    fn test_fill_room_clips() {
        let mut grid = Grid::filled(5, 5, Tile::Wall);
        grid.fill_room(&Room::new(3, 3, 10, 10));
        assert_eq!(grid.count(Tile::Floor), 4);
    }

    #[test]
    fn test_dump_format() {
        let mut grid = Grid::filled(3, 2, Tile::Wall);
        grid.set(1, 0, Tile::Floor);
        grid.set(2, 1, Tile::Corridor);
        assert_eq!(grid.to_dump(), "3 2\n1 2 1\n1 1 3\n");
    }

    #[test]
    fn test_dump_parse_back() {
        let mut grid = Grid::filled(6, 4, Tile::Wall);
        grid.fill_room(&Room::new(1, 1, 3, 2));
        grid.set(5, 3, Tile::Door);
        let parsed = Grid::from_dump(&grid.to_dump()).unwrap();
        assert_eq!(parsed, grid);
    }

    #[test]
    fn test_dump_parse_errors() {
        assert_eq!(Grid::from_dump(""), Err(DumpError::MissingHeader));
        assert!(matches!(
            Grid::from_dump("3\n1 1 1\n"),
            Err(DumpError::MalformedHeader(_))
        ));
        assert_eq!(
            Grid::from_dump("2 2\n1 1\n"),
            Err(DumpError::RowCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Grid::from_dump("2 1\n1 1 1\n"),
            Err(DumpError::ColumnCount {
                row: 0,
                expected: 2,
                found: 3
            })
        );
        assert!(matches!(
            Grid::from_dump("2 1\n1 0\n"),
            Err(DumpError::InvalidTile { column: 1, .. })
        ));
        assert!(matches!(
            Grid::from_dump("2 1\n1 x\n"),
            Err(DumpError::InvalidTile { .. })
        ));
    }

    #[test]
    fn test_dump_huge_header() {
        assert_eq!(
            Grid::from_dump("18446744073709551615 2\n1 1\n"),
            Err(DumpError::TooLarge {
                width: usize::MAX,
                height: 2
            })
        );
        // fits in a usize but the rows do not back it up
        assert_eq!(
            Grid::from_dump("1000000000 1000000\n1 1\n"),
            Err(DumpError::ColumnCount {
                row: 0,
                expected: 1_000_000_000,
                found: 2
            })
        );
    }

    #[test]
    fn test_serde_huge_dimensions() {
        let json = r#"{"width":18446744073709551615,"height":1,"tiles":[[1,1]]}"#;
        assert!(serde_json::from_str::<Grid>(json).is_err());

        let repr = GridRepr {
            width: usize::MAX,
            height: 2,
            tiles: vec![vec![1], vec![1]],
        };
        assert_eq!(
            Grid::try_from(repr),
            Err(DumpError::TooLarge {
                width: usize::MAX,
                height: 2
            })
        );
    }

    #[test]
    fn test_render_ascii() {
        let mut grid = Grid::filled(4, 2, Tile::Wall);
        grid.set(0, 0, Tile::Floor);
        grid.set(1, 0, Tile::Corridor);
        grid.set(2, 1, Tile::Door);
        assert_eq!(grid.render_ascii(), ".#  \n  + \n");
    }

    #[test]
    fn test_serde_round_trip() {
        let mut grid = Grid::filled(3, 2, Tile::Wall);
        grid.set(0, 1, Tile::Floor);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, r#"{"width":3,"height":2,"tiles":[[1,1,1],[2,1,1]]}"#);
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);

        let bad = r#"{"width":2,"height":1,"tiles":[[1,0]]}"#;
        assert!(serde_json::from_str::<Grid>(bad).is_err());
    }
}
