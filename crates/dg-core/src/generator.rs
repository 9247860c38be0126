//! Dungeon generation: room placement, corridor routing, rasterization
//!
//! One [`DungeonGenerator::generate`] call runs through four phases:
//!
//! 1. Init: a wall-filled grid and an empty room store.
//! 2. Room placement: pick a target count, then sample rooms (up to
//!    [`ATTEMPTS_PER_ROOM`] tries per target room) and keep those that do
//!    not overlap an accepted room. Large maps may use a worker pool.
//! 3. Corridor routing: join each room to the next one in acceptance order
//!    with an L-shaped corridor.
//! 4. Done: hand back the grid together with the rooms and corridors.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::{ATTEMPTS_PER_ROOM, GeneratorConfig, PlacementStrategy};
use crate::corridor::{BendOrder, Corridor};
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::rng::DungeonRng;
use crate::room::{DEFAULT_PADDING, Room};
use crate::spatial::SpatialIndex;
use crate::tile::Tile;

/// Accepted rooms in placement order, optionally backed by a spatial index
///
/// Room `i` in [`RoomStore::rooms`] is the room the index knows as `i`, so
/// index candidates can be resolved against real geometry.
#[derive(Debug, Clone, Default)]
pub struct RoomStore {
    rooms: Vec<Room>,
    index: Option<SpatialIndex>,
}

impl RoomStore {
    /// Store that answers overlap queries by scanning every room
    pub fn linear() -> Self {
        Self::default()
    }

    /// Store that answers overlap queries through a spatial index
    pub fn indexed(cell_size: usize, world_width: usize, world_height: usize) -> Self {
        Self {
            rooms: Vec::new(),
            index: Some(SpatialIndex::new(cell_size, world_width, world_height)),
        }
    }

    fn for_config(config: &GeneratorConfig) -> Self {
        if config.spatial_index {
            Self::indexed(config.effective_cell_size(), config.width, config.height)
        } else {
            Self::linear()
        }
    }

    /// Index of the first accepted room overlapping `room`, if any
    pub fn find_overlap(&self, room: &Room, padding: usize) -> Option<usize> {
        match &self.index {
            Some(index) => index
                .candidates(room, padding)
                .into_iter()
                .find(|&i| self.rooms[i].overlaps(room, padding)),
            None => self.rooms.iter().position(|r| r.overlaps(room, padding)),
        }
    }

    /// Accept `room` unless it overlaps an accepted room.
    ///
    /// Check and insert happen together; callers sharing a store between
    /// threads hold one lock across this whole call.
    pub fn try_place(&mut self, room: Room, padding: usize) -> bool {
        if let Some(other) = self.find_overlap(&room, padding) {
            trace!(?room, other, "candidate rejected");
            return false;
        }
        let idx = self.rooms.len();
        if let Some(index) = &mut self.index {
            index.insert(&room, idx);
        }
        self.rooms.push(room);
        true
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Whether overlap queries go through a spatial index
    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Forget every room, keeping the index configuration
    pub fn clear(&mut self) {
        self.rooms.clear();
        if let Some(index) = &mut self.index {
            index.clear();
        }
    }
}

/// Result of one generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dungeon {
    grid: Grid,
    rooms: Vec<Room>,
    corridors: Vec<Corridor>,
    seed: u64,
    strategy: PlacementStrategy,
    target_rooms: usize,
    attempts: usize,
}

impl Dungeon {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Accepted rooms in placement order
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Corridors in carving order; corridor `i` joins room `i` to `i + 1`
    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    pub fn corridor_count(&self) -> usize {
        self.corridors.len()
    }

    /// Effective seed of the generator that produced this dungeon
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Placement strategy actually used (never `Auto`)
    pub fn strategy(&self) -> PlacementStrategy {
        self.strategy
    }

    /// Room count drawn for this generation
    pub fn target_rooms(&self) -> usize {
        self.target_rooms
    }

    /// Candidate rooms sampled during placement
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// How many rooms short of `min_rooms` placement ended
    pub fn shortfall(&self, min_rooms: usize) -> usize {
        min_rooms.saturating_sub(self.rooms.len())
    }
}

/// Room-and-corridor dungeon generator
///
/// Construction validates the configuration and resolves the seed once;
/// each [`generate`](Self::generate) call then continues the same random
/// stream.
#[derive(Debug)]
pub struct DungeonGenerator {
    config: GeneratorConfig,
    rng: DungeonRng,
    store: RoomStore,
}

impl DungeonGenerator {
    /// Validate `config` and build a generator for it
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = DungeonRng::resolve(config.seed);
        let store = RoomStore::for_config(&config);
        debug!(seed = rng.seed(), ?config, "generator created");
        Ok(Self { config, rng, store })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Effective seed (never 0)
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Generate a new dungeon layout
    pub fn generate(&mut self) -> Dungeon {
        let (width, height) = (self.config.width, self.config.height);
        let mut grid = Grid::filled(width, height, Tile::Wall);
        self.store.clear();

        let target = self
            .rng
            .range_inclusive(self.config.min_rooms, self.config.max_rooms);
        let strategy = self.config.strategy.resolve(target, width, height);

        let attempts = match strategy {
            PlacementStrategy::Parallel => self.place_rooms_parallel(target),
            _ => self.place_rooms_sequential(target),
        };
        for room in self.store.rooms() {
            grid.fill_room(room);
        }

        let placed = self.store.len();
        debug!(
            target_rooms = target,
            placed,
            attempts,
            %strategy,
            "room placement finished"
        );
        if placed < self.config.min_rooms {
            warn!(
                placed,
                min_rooms = self.config.min_rooms,
                "placement ended short of the minimum room count"
            );
        }

        let corridors = self.route_corridors(&mut grid);

        Dungeon {
            grid,
            rooms: self.store.rooms().to_vec(),
            corridors,
            seed: self.rng.seed(),
            strategy,
            target_rooms: target,
            attempts,
        }
    }

    fn place_rooms_sequential(&mut self, target: usize) -> usize {
        let budget = target.saturating_mul(ATTEMPTS_PER_ROOM);
        let mut attempts = 0;
        while self.store.len() < target && attempts < budget {
            attempts += 1;
            let room = sample_room(&self.config, &mut self.rng);
            self.store.try_place(room, DEFAULT_PADDING);
        }
        attempts
    }

    /// Place rooms from a pool of workers.
    ///
    /// The target count and the attempt budget are split across workers.
    /// Each worker samples from its own forked stream and accepts rooms
    /// under a single lock spanning the overlap check and the insert, so
    /// the acceptance order (and with it the layout) depends on thread
    /// scheduling.
    fn place_rooms_parallel(&mut self, target: usize) -> usize {
        let workers = target.min(
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        );
        if workers == 0 {
            return 0;
        }

        let rngs: Vec<DungeonRng> = (0..workers)
            .map(|w| self.rng.fork(w as u64 + 1))
            .collect();
        let config = &self.config;
        let store = Mutex::new(&mut self.store);
        let attempts = AtomicUsize::new(0);

        thread::scope(|scope| {
            for (w, rng) in rngs.into_iter().enumerate() {
                let quota = target / workers + usize::from(w < target % workers);
                let store = &store;
                let attempts = &attempts;
                scope.spawn(move || {
                    place_rooms_worker(config, rng, quota, target, store, attempts);
                });
            }
        });

        attempts.into_inner()
    }

    fn route_corridors(&mut self, grid: &mut Grid) -> Vec<Corridor> {
        let rooms = self.store.rooms();
        let mut corridors = Vec::with_capacity(rooms.len().saturating_sub(1));
        for pair in rooms.windows(2) {
            let bend = BendOrder::random(&mut self.rng);
            let corridor = Corridor::between(&pair[0], &pair[1], bend);
            let carved = corridor.carve(grid);
            trace!(?corridor, carved, "corridor carved");
            corridors.push(corridor);
        }
        corridors
    }
}

fn place_rooms_worker(
    config: &GeneratorConfig,
    mut rng: DungeonRng,
    quota: usize,
    target: usize,
    store: &Mutex<&mut RoomStore>,
    attempts: &AtomicUsize,
) {
    let mut placed = 0;
    for _ in 0..quota.saturating_mul(ATTEMPTS_PER_ROOM) {
        if placed >= quota {
            break;
        }
        let room = sample_room(config, &mut rng);
        attempts.fetch_add(1, Ordering::Relaxed);

        let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);
        if store.len() >= target {
            break;
        }
        if store.try_place(room, DEFAULT_PADDING) {
            placed += 1;
        }
    }
}

/// Sample a candidate room that fits inside the 1-tile border.
///
/// The configuration has been validated, so every range here is non-empty.
fn sample_room(config: &GeneratorConfig, rng: &mut DungeonRng) -> Room {
    let width = rng.range_inclusive(config.min_room_size, config.max_room_size);
    let height = rng.range_inclusive(config.min_room_size, config.max_room_size);
    let x = rng.range_inclusive(1, config.width - width - 1);
    let y = rng.range_inclusive(1, config.height - height - 1);
    Room::new(x, y, width, height)
}

/// Validate `config` and generate one dungeon with a fresh generator
pub fn generate(config: GeneratorConfig) -> Result<Dungeon, ConfigError> {
    Ok(DungeonGenerator::new(config)?.generate())
}
