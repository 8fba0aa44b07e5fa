mod cli;
mod logging;
mod sprites;

use std::{fs::File, io::BufWriter, path::Path, time::Duration};

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use pekseg_core::{ColorMode, DispatchEvent, DisplaySession, Pacer};
use pekseg_data::{GlyphMap, SegmentLayout};
use pekseg_render::{Compositor, Frame};

use crate::{
    cli::{Cli, ColorModeArg},
    logging::{LoggingConfig, init_logging},
    sprites::load_sprite_store,
};

fn main() -> Result<()> {
    // panic hook
    color_eyre::install()?;

    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(&logging_config).wrap_err("Failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "pekseg-player starting up"
    );

    let cli = Cli::parse();
    cli.validate()?;
    cli.print_summary();

    let layout = SegmentLayout::new(cli.segment_count, cli.fg_split)?;
    let store = load_sprite_store(&cli.segments_dir, layout)
        .wrap_err("Failed to load segment sprites")?;

    // Glyph maps are authored and persisted outside this tool; without one,
    // character-mode bytes are defined no-ops.
    let mut session =
        DisplaySession::new(cli.cols, cli.rows, layout, GlyphMap::empty(), cli.color)?;
    match cli.color_mode {
        ColorModeArg::Static => {},
        ColorModeArg::Rainbow => session.set_color_mode(ColorMode::Rainbow),
        ColorModeArg::Transition => session.set_color_mode(ColorMode::Transition),
    }

    let compositor = Compositor::new(store, layout).debug_overlay(cli.debug_overlay);
    let pacer = Pacer::new(Duration::from_secs_f64(cli.interval_ms / 1000.0));

    let stream = std::fs::read(&cli.stream)
        .wrap_err_with(|| format!("Failed to read stream '{}'", cli.stream.display()))?;

    let mut passes = 0usize;
    let mut frames_written = 0usize;

    for &byte in &stream {
        match session.dispatch(byte) {
            DispatchEvent::None => {},
            DispatchEvent::Render => {
                let frames = compositor.render(&session);
                write_render_pass(&cli.out, passes, &frames)?;
                frames_written += frames.len();
                passes += 1;
            },
            DispatchEvent::Pace => pacer.pace(),
        }
    }

    tracing::info!(
        bytes = stream.len(),
        passes,
        frames = frames_written,
        "playback finished"
    );

    println!("\nPlayback complete!");
    println!("  Bytes consumed: {}", stream.len());
    println!("  Render passes: {passes}");
    println!("  Frames written: {frames_written}");
    println!("  Output: {}", cli.out.display());

    Ok(())
}

/// Writes one render pass as `pass_NNNN/slot_NNN.png` under the output
/// directory.
fn write_render_pass(out: &Path, pass: usize, frames: &[Frame]) -> Result<()> {
    let dir = out.join(format!("pass_{pass:04}"));
    std::fs::create_dir_all(&dir)?;

    for frame in frames {
        let path = dir.join(format!("slot_{:03}.png", frame.slot()));
        let file = File::create(&path)
            .wrap_err_with(|| format!("Failed to create '{}'", path.display()))?;

        let mut encoder = png::Encoder::new(BufWriter::new(file), frame.width(), frame.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(frame.pixels())?;
    }

    tracing::debug!(pass, frames = frames.len(), "render pass written");
    Ok(())
}
