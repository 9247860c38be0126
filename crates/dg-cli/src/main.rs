//! Dungeon layout generator
//!
//! Command-line entry point: builds a generator configuration from flags
//! (optionally layered over a JSON config file), generates a dungeon and
//! writes it out.

mod bench;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dg_core::{ConfigError, DungeonGenerator, GeneratorConfig, PlacementStrategy};

use crate::output::OutputFormat;

/// Procedural room-and-corridor dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungeon-gen")]
#[command(author, version, about = "Generate a dungeon layout grid", long_about = None)]
struct Args {
    /// Grid width in tiles
    #[arg(requires = "height")]
    width: Option<usize>,

    /// Grid height in tiles
    height: Option<usize>,

    /// Minimum number of rooms
    #[arg(long = "min-rooms")]
    min_rooms: Option<usize>,

    /// Maximum number of rooms
    #[arg(long = "max-rooms")]
    max_rooms: Option<usize>,

    /// Minimum room width/height
    #[arg(long = "min-room-size")]
    min_room_size: Option<usize>,

    /// Maximum room width/height
    #[arg(long = "max-room-size")]
    max_room_size: Option<usize>,

    /// Random seed (0 picks one at random)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Room placement strategy (auto, sequential, parallel)
    #[arg(long = "strategy")]
    strategy: Option<PlacementStrategy>,

    /// Check overlaps with a linear scan instead of the spatial index
    #[arg(long = "linear-scan")]
    linear_scan: bool,

    /// Load base settings from a JSON config file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Output file ("-" for stdout)
    #[arg(short = 'o', long = "output", default_value = "dungeon.txt")]
    output: PathBuf,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Dump)]
    format: OutputFormat,

    /// Generate this many dungeons and report timings
    #[arg(short = 'n', long = "repeat", default_value_t = 1)]
    repeat: usize,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("could not read config file '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse config file '{path}': {source}")]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("could not write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not encode dungeon as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = build_config(args)?;
    let mut generator = DungeonGenerator::new(config)?;
    print_summary(generator.config(), args);

    let (dungeon, timings) = bench::run(&mut generator, args.repeat);
    if let Some(timings) = timings {
        eprintln!("{timings}");
    }

    let shortfall = dungeon.shortfall(generator.config().min_rooms);
    if shortfall > 0 {
        eprintln!("Note: {shortfall} fewer rooms than the requested minimum fit in the grid");
    }
    info!(
        seed = dungeon.seed(),
        rooms = dungeon.room_count(),
        corridors = dungeon.corridor_count(),
        "dungeon generated"
    );

    let rendered = output::render(&dungeon, args.format)?;
    output::write(&args.output, &rendered).map_err(|source| CliError::Write {
        path: args.output.clone(),
        source,
    })?;

    if !output::is_stdout(&args.output) {
        eprintln!(
            "Dungeon generated ({} rooms, seed {}) and saved to {}",
            dungeon.room_count(),
            dungeon.seed(),
            args.output.display()
        );
    }
    Ok(())
}

/// Config file (or defaults), then flag overrides, then min/max swapping
fn build_config(args: &Args) -> Result<GeneratorConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GeneratorConfig::default(),
    };

    if let (Some(width), Some(height)) = (args.width, args.height) {
        config.width = width;
        config.height = height;
    }
    if let Some(v) = args.min_rooms {
        config.min_rooms = v;
    }
    if let Some(v) = args.max_rooms {
        config.max_rooms = v;
    }
    if let Some(v) = args.min_room_size {
        config.min_room_size = v;
    }
    if let Some(v) = args.max_room_size {
        config.max_room_size = v;
    }
    if let Some(v) = args.seed {
        config.seed = v;
    }
    if let Some(v) = args.strategy {
        config.strategy = v;
    }
    if args.linear_scan {
        config.spatial_index = false;
    }

    Ok(config.normalized())
}

fn load_config(path: &PathBuf) -> Result<GeneratorConfig, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::ParseConfig {
        path: path.clone(),
        source,
    })
}

fn print_summary(config: &GeneratorConfig, args: &Args) {
    let seed = if config.seed == 0 {
        "random".to_string()
    } else {
        config.seed.to_string()
    };
    eprintln!("Generating dungeon with parameters:");
    eprintln!("  Size: {}x{}", config.width, config.height);
    eprintln!("  Rooms: {}-{}", config.min_rooms, config.max_rooms);
    eprintln!(
        "  Room size: {}-{}",
        config.min_room_size, config.max_room_size
    );
    eprintln!("  Seed: {seed}");
    eprintln!("  Strategy: {}", config.strategy);
    eprintln!("  Output: {} ({})", args.output.display(), args.format);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("dungeon-gen").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        let config = build_config(&args).unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(args.output, PathBuf::from("dungeon.txt"));
        assert_eq!(args.format, OutputFormat::Dump);
        assert_eq!(args.repeat, 1);
    }

    #[test]
    fn test_positional_size_and_flags() {
        let args = parse(&[
            "80",
            "60",
            "--min-rooms",
            "3",
            "--max-rooms",
            "9",
            "--seed",
            "42",
            "--strategy",
            "parallel",
            "--linear-scan",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!((config.width, config.height), (80, 60));
        assert_eq!((config.min_rooms, config.max_rooms), (3, 9));
        assert_eq!(config.seed, 42);
        assert_eq!(config.strategy, PlacementStrategy::Parallel);
        assert!(!config.spatial_index);
    }

    #[test]
    fn test_width_requires_height() {
        let argv = ["dungeon-gen", "80"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_inverted_ranges_are_swapped() {
        let args = parse(&["--min-room-size", "9", "--max-room-size", "4"]);
        let config = build_config(&args).unwrap();
        assert_eq!((config.min_room_size, config.max_room_size), (4, 9));
    }

    #[test]
    fn test_config_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dungeon.json");
        std::fs::write(&path, r#"{"width": 90, "height": 70, "seed": 5}"#).unwrap();

        let args = parse(&["--config", path.to_str().unwrap(), "--seed", "6"]);
        let config = build_config(&args).unwrap();
        assert_eq!((config.width, config.height), (90, 70));
        assert_eq!(config.seed, 6);
        assert_eq!(config.max_rooms, GeneratorConfig::default().max_rooms);
    }

    #[test]
    fn test_bad_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ width: ").unwrap();
        let args = parse(&["--config", path.to_str().unwrap()]);
        assert!(matches!(
            build_config(&args),
            Err(CliError::ParseConfig { .. })
        ));

        let missing = dir.path().join("missing.json");
        let args = parse(&["--config", missing.to_str().unwrap()]);
        assert!(matches!(
            build_config(&args),
            Err(CliError::ReadConfig { .. })
        ));
    }

    #[test]
    fn test_run_writes_dump() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dungeon.txt");
        let args = parse(&["30", "20", "--seed", "3", "-o", out.to_str().unwrap()]);
        run(&args).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        let grid = dg_core::Grid::from_dump(&text).unwrap();
        assert_eq!((grid.width(), grid.height()), (30, 20));
    }

    #[test]
    fn test_run_rejects_oversized_rooms() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dungeon.txt");
        let args = parse(&[
            "10",
            "10",
            "--min-room-size",
            "10",
            "--max-room-size",
            "10",
            "-o",
            out.to_str().unwrap(),
        ]);
        assert!(matches!(
            run(&args),
            Err(CliError::Config(ConfigError::RoomTooLarge { .. }))
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_run_rejects_unbounded_room_size() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dungeon.txt");
        let args = parse(&[
            "--max-room-size",
            "18446744073709551615",
            "-o",
            out.to_str().unwrap(),
        ]);
        assert!(matches!(
            run(&args),
            Err(CliError::Config(ConfigError::RoomTooLarge { .. }))
        ));
        assert!(!out.exists());
    }
}
