//! Tile codes stored in a dungeon grid

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::TileError;

/// Tile classification of a grid cell
///
/// The discriminants are the wire codes used by grid dumps and by any
/// consumer that reads the grid as plain integers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Tile {
    /// Out-of-bounds sentinel, never stored in a grid
    Empty = 0,
    /// Solid rock, the default fill
    #[default]
    Wall = 1,
    /// Room interior
    Floor = 2,
    /// Carved passage between rooms
    Corridor = 3,
    /// Reserved for decorators; the generator never places doors
    Door = 4,
}

impl Tile {
    /// Integer code of this tile
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether this tile may be stored in a grid cell
    pub const fn is_storable(self) -> bool {
        !matches!(self, Tile::Empty)
    }

    /// Check if this is walkable terrain
    pub const fn is_passable(self) -> bool {
        matches!(self, Tile::Floor | Tile::Corridor | Tile::Door)
    }

    /// Get the display character for this tile
    pub const fn symbol(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => ' ',
            Tile::Floor => '.',
            Tile::Corridor => '#',
            Tile::Door => '+',
        }
    }
}

impl From<Tile> for u8 {
    fn from(tile: Tile) -> Self {
        tile.code()
    }
}

impl TryFrom<u8> for Tile {
    type Error = TileError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Tile::Empty),
            1 => Ok(Tile::Wall),
            2 => Ok(Tile::Floor),
            3 => Ok(Tile::Corridor),
            4 => Ok(Tile::Door),
            other => Err(TileError::UnknownCode(other)),
        }
    }
}
