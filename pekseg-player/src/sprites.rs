use std::{fs::File, io::BufReader, path::Path};

use color_eyre::{
    Report,
    eyre::{WrapErr, eyre},
};
use pekseg_data::{SegmentLayout, Sprite, SpriteStore};
use tracing::{debug, info, warn};

/// Loads the segment sprite store from a directory of `<id>.png` files.
///
/// Missing files are tolerated: the segment renders as absent and the
/// compositor skips it with a warning. Dimension consistency is enforced by
/// [`SpriteStore::new`].
///
/// # Errors
///
/// Fails if a present file cannot be decoded, or if the store ends up with
/// no sprites or inconsistent dimensions.
pub fn load_sprite_store(dir: &Path, layout: SegmentLayout) -> Result<SpriteStore, Report> {
    let mut sprites = Vec::with_capacity(layout.count() as usize);
    let mut loaded = 0usize;

    for id in 0..layout.count() {
        let path = dir.join(format!("{id}.png"));
        if !path.is_file() {
            warn!(segment = id, path = %path.display(), "sprite file missing");
            sprites.push(None);
            continue;
        }

        let sprite = decode_sprite(&path)
            .wrap_err_with(|| format!("Failed to decode sprite '{}'", path.display()))?;
        debug!(
            segment = id,
            width = sprite.width(),
            height = sprite.height(),
            "sprite loaded"
        );
        sprites.push(Some(sprite));
        loaded += 1;
    }

    info!(loaded, total = layout.count(), "sprite store loaded");
    SpriteStore::new(layout, sprites).map_err(Report::from)
}

/// Decodes one PNG into straight-alpha RGBA8, expanding grayscale and
/// alpha-less inputs.
fn decode_sprite(path: &Path) -> Result<Sprite, Report> {
    let file = File::open(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(
        png::Transformations::normalize_to_color8() | png::Transformations::ALPHA,
    );

    let mut reader = decoder.read_info()?;
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };

    // RGBA8 is the widest output the transformations above can produce.
    let mut buf = vec![0u8; width as usize * height as usize * 4];
    let frame = reader.next_frame(&mut buf)?;
    buf.truncate(frame.buffer_size());

    let rgba = match frame.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        other => {
            return Err(eyre!(
                "Unsupported color type {other:?} after expansion in '{}'",
                path.display()
            ));
        },
    };

    Sprite::new(frame.width, frame.height, rgba).map_err(Report::from)
}
