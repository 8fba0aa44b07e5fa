use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::{Report, eyre::eyre};
use pekseg_data::Rgb;

#[derive(Parser, Debug)]
#[command(
    name = "pekseg-player",
    about = "Byte-stream player for the pekseg segmented glyph display",
    long_about = "Feeds a recorded byte stream through the protocol dispatcher and writes \
                  every composited render pass as PNG frames, one image per display slot"
)]
pub struct Cli {
    /// Byte stream to play (.bin)
    #[arg(value_name = "STREAM", value_parser = validate_file_exists)]
    pub stream: PathBuf,

    /// Directory holding segment sprites, one <id>.png per segment
    #[arg(short = 'd', long, default_value = "segments", value_name = "DIR")]
    pub segments_dir: PathBuf,

    /// Display grid columns
    #[arg(long, default_value = "12")]
    pub cols: usize,

    /// Display grid rows
    #[arg(long, default_value = "9")]
    pub rows: usize,

    /// Total number of segment ids
    #[arg(long, default_value = "47", value_name = "COUNT")]
    pub segment_count: u8,

    /// First background-band segment id
    #[arg(long, default_value = "39", value_name = "ID")]
    pub fg_split: u8,

    /// Initial static segment color as RRGGBB hex
    #[arg(short = 'c', long, default_value = "FFFFFF", value_parser = parse_hex_color)]
    pub color: Rgb,

    /// Initial color mode
    #[arg(long, value_enum, default_value = "static")]
    pub color_mode: ColorModeArg,

    /// Pacing interval in milliseconds honored on PACE bytes
    #[arg(long, default_value = "16.667", value_name = "MS")]
    pub interval_ms: f64,

    /// Output directory for rendered frames
    #[arg(short = 'o', long, default_value = "./frames", value_name = "DIR")]
    pub out: PathBuf,

    /// Overlay each frame with its slot index and active segments
    #[arg(long)]
    pub debug_overlay: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModeArg {
    Static,
    Rainbow,
    Transition,
}

impl Cli {
    /// Validates argument combinations the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error for zero-sized grids, impossible segment
    /// layouts, and non-positive pacing intervals.
    pub fn validate(&self) -> Result<(), Report> {
        if self.cols == 0 || self.rows == 0 {
            return Err(eyre!(
                "Display grid must be non-empty, got {}x{}",
                self.cols,
                self.rows
            ));
        }

        if self.segment_count == 0 {
            return Err(eyre!("Segment count must be positive"));
        }

        if self.fg_split > self.segment_count {
            return Err(eyre!(
                "Foreground split {} exceeds segment count {}",
                self.fg_split,
                self.segment_count
            ));
        }

        if !self.interval_ms.is_finite() || self.interval_ms <= 0.0 {
            return Err(eyre!("Pacing interval must be a positive number of milliseconds"));
        }

        Ok(())
    }

    /// Prints a run summary before playback starts.
    pub fn print_summary(&self) {
        println!("Playing byte stream:");
        println!("  Stream: {}", self.stream.display());
        println!("  Sprites: {}", self.segments_dir.display());
        println!("  Grid: {}x{}", self.cols, self.rows);
        println!(
            "  Segments: {} ({} foreground)",
            self.segment_count, self.fg_split
        );
        println!("  Output: {}", self.out.display());

        if self.interval_ms != 16.667 {
            println!("  Pacing interval: {} ms", self.interval_ms);
        }
    }
}

fn parse_hex_color(s: &str) -> Result<Rgb, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(format!("Expected RRGGBB hex color, got '{s}'"));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| format!("Invalid hex color: {s}"))
    };

    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    match () {
        _ if !path.exists() => Err(format!("Input file does not exist: {s}")),
        _ if !path.is_file() => Err(format!("Path is not a file: {s}")),
        _ => Ok(path),
    }
}
