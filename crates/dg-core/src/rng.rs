//! Random number generation for dungeon layouts
//!
//! Uses a seeded ChaCha RNG so a given non-zero seed reproduces the same
//! layout on every platform.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Generator-owned random number stream
///
/// Wraps ChaCha8Rng together with the seed it was built from.
/// Note: RNG state is not serialized - only the seed round-trips.
#[derive(Debug, Clone)]
pub struct DungeonRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Serialize for DungeonRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DungeonRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(DungeonRng::new(seed))
    }
}

impl DungeonRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a seed drawn from system entropy
    pub fn from_entropy() -> Self {
        Self::new(Self::entropy_seed())
    }

    /// Resolve a configured seed: 0 means "draw one from entropy".
    ///
    /// The drawn value becomes the effective seed for the lifetime of the
    /// returned RNG and is reported by [`DungeonRng::seed`].
    pub fn resolve(seed: u64) -> Self {
        if seed == 0 {
            Self::from_entropy()
        } else {
            Self::new(seed)
        }
    }

    fn entropy_seed() -> u64 {
        // 0 is reserved for "random", never hand it out as an effective seed
        loop {
            let seed: u64 = rand::random();
            if seed != 0 {
                return seed;
            }
        }
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent stream for a worker.
    ///
    /// Draws one value from this stream as the fork's seed and places the
    /// fork on ChaCha stream `stream`. Forking is deterministic: the same
    /// parent state and stream index always give the same sequence.
    pub fn fork(&mut self, stream: u64) -> Self {
        let seed = self.rng.next_u64();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng, seed }
    }

    /// Uniform value in `lo..=hi`.
    ///
    /// Callers guarantee `lo <= hi`; the generator validates every range it
    /// samples from before generation starts.
    pub fn range_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        debug_assert!(lo <= hi, "empty sampling range {lo}..={hi}");
        self.rng.gen_range(lo..=hi)
    }

    /// Returns 0..n-1, or 0 if n is 0
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Fair coin flip
    pub fn coin_flip(&mut self) -> bool {
        self.rn2(2) == 0
    }

}
