//! Rendering and writing generated dungeons

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use dg_core::{Dungeon, Room};

/// How the generated dungeon is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// "width height" header followed by one row of tile codes per line
    Dump,
    /// Seed, dimensions, rooms and tile codes as a JSON document
    Json,
    /// Printable map using one symbol per tile
    Ascii,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Dump => "dump",
            OutputFormat::Json => "json",
            OutputFormat::Ascii => "ascii",
        };
        f.write_str(name)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    seed: u64,
    width: usize,
    height: usize,
    rooms: &'a [Room],
    grid: Vec<Vec<u8>>,
}

pub fn render(dungeon: &Dungeon, format: OutputFormat) -> Result<String, serde_json::Error> {
    let grid = dungeon.grid();
    match format {
        OutputFormat::Dump => Ok(grid.to_dump()),
        OutputFormat::Ascii => Ok(grid.render_ascii()),
        OutputFormat::Json => {
            let report = JsonReport {
                seed: dungeon.seed(),
                width: grid.width(),
                height: grid.height(),
                rooms: dungeon.rooms(),
                grid: grid.to_codes(),
            };
            let mut text = serde_json::to_string_pretty(&report)?;
            text.push('\n');
            Ok(text)
        }
    }
}

pub fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Write to `path`, or to stdout when the path is "-"
pub fn write(path: &Path, contents: &str) -> io::Result<()> {
    if is_stdout(path) {
        let mut stdout = io::stdout().lock();
        stdout.write_all(contents.as_bytes())?;
        stdout.flush()
    } else {
        std::fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::{GeneratorConfig, Grid, PlacementStrategy, generate};

    fn dungeon() -> Dungeon {
        generate(GeneratorConfig {
            width: 40,
            height: 30,
            seed: 11,
            strategy: PlacementStrategy::Sequential,
            ..GeneratorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_dump_parses_back() {
        let dungeon = dungeon();
        let text = render(&dungeon, OutputFormat::Dump).unwrap();
        assert!(text.starts_with("40 30\n"));
        assert_eq!(&Grid::from_dump(&text).unwrap(), dungeon.grid());
    }

    #[test]
    fn test_json_report_shape() {
        let dungeon = dungeon();
        let text = render(&dungeon, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["seed"], 11);
        assert_eq!(value["width"], 40);
        assert_eq!(value["height"], 30);
        assert_eq!(
            value["rooms"].as_array().unwrap().len(),
            dungeon.room_count()
        );
        let rows = value["grid"].as_array().unwrap();
        assert_eq!(rows.len(), 30);
        assert!(rows.iter().all(|row| row.as_array().unwrap().len() == 40));
    }

    #[test]
    fn test_ascii_rows() {
        let dungeon = dungeon();
        let text = render(&dungeon, OutputFormat::Ascii).unwrap();
        assert_eq!(text.lines().count(), 30);
        assert!(text.contains('.'));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        assert!(!is_stdout(&path));
        write(&path, "2 1\n1 1\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2 1\n1 1\n");
        assert!(is_stdout(Path::new("-")));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(
            OutputFormat::from_str("ascii", true).unwrap(),
            OutputFormat::Ascii
        );
    }
}
