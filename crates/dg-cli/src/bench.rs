//! Repeat-timing for `--repeat`

use std::fmt;
use std::time::{Duration, Instant};

use dg_core::{Dungeon, DungeonGenerator};
use tracing::debug;

/// Wall-clock statistics over repeated generations
#[derive(Debug, Clone, PartialEq)]
pub struct Timings {
    pub runs: usize,
    pub min: Duration,
    pub max: Duration,
    pub total: Duration,
}

impl Timings {
    fn from_samples(samples: &[Duration]) -> Option<Self> {
        let min = *samples.iter().min()?;
        let max = *samples.iter().max()?;
        Some(Self {
            runs: samples.len(),
            min,
            max,
            total: samples.iter().sum(),
        })
    }

    pub fn mean(&self) -> Duration {
        let nanos = self.total.as_nanos() / self.runs.max(1) as u128;
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for Timings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} runs: min {:.3} ms, mean {:.3} ms, max {:.3} ms",
            self.runs,
            self.min.as_secs_f64() * 1000.0,
            self.mean().as_secs_f64() * 1000.0,
            self.max.as_secs_f64() * 1000.0
        )
    }
}

/// Generate `repeat` dungeons and keep the last one.
///
/// Timings are only returned when more than one run was requested.
pub fn run(generator: &mut DungeonGenerator, repeat: usize) -> (Dungeon, Option<Timings>) {
    let repeat = repeat.max(1);
    let mut samples = Vec::new();
    let mut last = None;

    for round in 0..repeat {
        let start = Instant::now();
        let dungeon = generator.generate();
        let elapsed = start.elapsed();
        debug!(round, elapsed_us = elapsed.as_micros() as u64, "generation timed");
        samples.push(elapsed);
        last = Some(dungeon);
    }

    let timings = if repeat > 1 {
        Timings::from_samples(&samples)
    } else {
        None
    };
    // repeat >= 1 so the loop ran at least once
    let dungeon = last.unwrap_or_else(|| generator.generate());
    (dungeon, timings)
}
