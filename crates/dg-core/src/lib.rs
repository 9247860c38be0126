//! dg-core: room-and-corridor dungeon layout generation
//!
//! This crate contains the whole generation algorithm with no I/O
//! dependencies. Callers build a [`GeneratorConfig`], construct a
//! [`DungeonGenerator`] (which validates the configuration up front) and
//! call [`DungeonGenerator::generate`] to obtain a [`Dungeon`]: the tile
//! [`Grid`] plus the rooms that were placed.
//!
//! ```
//! use dg_core::{DungeonGenerator, GeneratorConfig, Tile};
//!
//! let config = GeneratorConfig {
//!     seed: 7,
//!     ..GeneratorConfig::default()
//! };
//! let dungeon = DungeonGenerator::new(config)?.generate();
//! assert_eq!(dungeon.grid().width(), 50);
//! assert!(dungeon.grid().count(Tile::Floor) > 0);
//! # Ok::<(), dg_core::ConfigError>(())
//! ```

pub mod config;
pub mod corridor;
pub mod error;
pub mod generator;
pub mod grid;
pub mod room;
pub mod spatial;
pub mod tile;

mod rng;

pub use config::{GeneratorConfig, PlacementStrategy};
pub use corridor::{BendOrder, Corridor};
pub use error::{ConfigError, DumpError, TileError};
pub use generator::{Dungeon, DungeonGenerator, RoomStore, generate};
pub use grid::Grid;
pub use rng::DungeonRng;
pub use room::{DEFAULT_PADDING, Room};
pub use spatial::SpatialIndex;
pub use tile::Tile;
