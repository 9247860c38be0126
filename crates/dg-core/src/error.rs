//! Error types for configuration, tile codes and grid dumps
//!
//! Placement shortfall (fewer rooms than requested) is deliberately absent:
//! it is a normal outcome reported through [`crate::Dungeon::room_count`].

use thiserror::Error;

/// Invalid generator configuration, detected before any grid is allocated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small: both dimensions must be at least 2")]
    GridTooSmall { width: usize, height: usize },

    #[error("grid {width}x{height} has more cells than can be addressed")]
    GridTooLarge { width: usize, height: usize },

    #[error("room count range is inverted: min {min} > max {max}")]
    InvertedRoomCount { min: usize, max: usize },

    #[error("at most {limit} rooms can be requested, got {max_rooms}")]
    TooManyRooms { max_rooms: usize, limit: usize },

    #[error("minimum room size must be positive")]
    ZeroRoomSize,

    #[error("room size range is inverted: min {min} > max {max}")]
    InvertedRoomSize { min: usize, max: usize },

    #[error(
        "rooms up to {max_room_size} tiles do not fit a {width}x{height} grid with a 1-tile border \
         (need max room size + 2 <= {limit})"
    )]
    RoomTooLarge {
        max_room_size: usize,
        width: usize,
        height: usize,
        limit: usize,
    },

    #[error("spatial index cell size must be positive")]
    ZeroCellSize,
}

/// A tile code outside the known vocabulary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    #[error("unknown tile code {0}")]
    UnknownCode(u8),
}

/// Failure to parse a raw grid dump
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DumpError {
    #[error("missing \"width height\" header line")]
    MissingHeader,

    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    #[error("grid {width}x{height} has more cells than can be addressed")]
    TooLarge { width: usize, height: usize },

    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {row}: expected {expected} columns, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {column}: invalid tile code {value:?}")]
    InvalidTile {
        row: usize,
        column: usize,
        value: String,
    },
}
