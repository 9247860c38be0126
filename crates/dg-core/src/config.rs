//! Generator configuration
//!
//! A [`GeneratorConfig`] is plain data. [`GeneratorConfig::validate`] checks
//! every sampling range the generator will use, so a configuration that
//! passes validation can never feed an empty or inverted range to the RNG.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::ConfigError;

/// Room count above which [`PlacementStrategy::Auto`] goes parallel
pub const PARALLEL_MIN_ROOMS: usize = 10;

/// Grid dimension above which [`PlacementStrategy::Auto`] goes parallel
pub const PARALLEL_MIN_DIMENSION: usize = 100;

/// Attempts allowed per requested room before placement gives up
pub const ATTEMPTS_PER_ROOM: usize = 10;

/// Largest room count whose attempt budget still fits in a `usize`
pub const MAX_ROOMS: usize = usize::MAX / ATTEMPTS_PER_ROOM;

/// How the room placement phase is executed
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PlacementStrategy {
    /// Parallel for large maps with many rooms, sequential otherwise
    #[default]
    Auto,
    /// Single stream, reproducible bit-for-bit for a given seed
    Sequential,
    /// Worker pool sharing one locked room store
    Parallel,
}

impl PlacementStrategy {
    /// Resolve `Auto` for a given target room count and grid size
    pub fn resolve(self, target_rooms: usize, width: usize, height: usize) -> Self {
        match self {
            PlacementStrategy::Auto => {
                if target_rooms > PARALLEL_MIN_ROOMS
                    && width > PARALLEL_MIN_DIMENSION
                    && height > PARALLEL_MIN_DIMENSION
                {
                    PlacementStrategy::Parallel
                } else {
                    PlacementStrategy::Sequential
                }
            }
            other => other,
        }
    }
}

/// Parameters of one generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Grid width in tiles
    pub width: usize,
    /// Grid height in tiles
    pub height: usize,
    /// Minimum number of rooms to aim for (inclusive)
    pub min_rooms: usize,
    /// Maximum number of rooms to aim for (inclusive)
    pub max_rooms: usize,
    /// Minimum room width/height (inclusive)
    pub min_room_size: usize,
    /// Maximum room width/height (inclusive)
    pub max_room_size: usize,
    /// RNG seed; 0 draws a fresh seed from system entropy
    pub seed: u64,
    /// Sequential or parallel room placement
    pub strategy: PlacementStrategy,
    /// Use the spatial index for overlap queries instead of a linear scan
    pub spatial_index: bool,
    /// Spatial index cell size; defaults to `max_room_size`
    pub cell_size: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            min_rooms: 5,
            max_rooms: 15,
            min_room_size: 5,
            max_room_size: 15,
            seed: 0,
            strategy: PlacementStrategy::Auto,
            spatial_index: true,
            cell_size: None,
        }
    }
}

impl GeneratorConfig {
    /// Check the configuration before anything is allocated
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 2 || self.height < 2 {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.min_rooms > self.max_rooms {
            return Err(ConfigError::InvertedRoomCount {
                min: self.min_rooms,
                max: self.max_rooms,
            });
        }
        if self.max_rooms > MAX_ROOMS {
            return Err(ConfigError::TooManyRooms {
                max_rooms: self.max_rooms,
                limit: MAX_ROOMS,
            });
        }
        if self.min_room_size == 0 {
            return Err(ConfigError::ZeroRoomSize);
        }
        if self.min_room_size > self.max_room_size {
            return Err(ConfigError::InvertedRoomSize {
                min: self.min_room_size,
                max: self.max_room_size,
            });
        }
        // x is sampled from 1..=width - room_width - 1
        let limit = self.width.min(self.height);
        if self.max_room_size > limit.saturating_sub(2) {
            return Err(ConfigError::RoomTooLarge {
                max_room_size: self.max_room_size,
                width: self.width,
                height: self.height,
                limit,
            });
        }
        if self.cell_size == Some(0) {
            return Err(ConfigError::ZeroCellSize);
        }
        Ok(())
    }

    /// Swap inverted min/max pairs, the way command-line callers expect
    pub fn normalized(mut self) -> Self {
        if self.min_rooms > self.max_rooms {
            std::mem::swap(&mut self.min_rooms, &mut self.max_rooms);
        }
        if self.min_room_size > self.max_room_size {
            std::mem::swap(&mut self.min_room_size, &mut self.max_room_size);
        }
        self
    }

    /// Spatial index cell size actually used
    pub fn effective_cell_size(&self) -> usize {
        self.cell_size.unwrap_or(self.max_room_size).max(1)
    }
}
