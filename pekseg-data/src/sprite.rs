use tracing::warn;

use crate::SegmentLayout;

/// A pre-rendered RGBA8 image for one segment.
///
/// Sprites are produced by an offline asset pipeline (segment extraction
/// from master artwork) and consumed read-only here. All sprites in a
/// [`SpriteStore`] share identical pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Sprite {
    /// Wraps raw RGBA8 pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::SizeMismatch`] if `data.len()` is not
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, SpriteError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(SpriteError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the RGBA pixel at `(x, y)`. Caller must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y * self.width + x) as usize * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

/// Fixed-size indexed collection of segment sprites.
///
/// Holds one optional sprite per segment id in `[0, layout.count())`.
/// Missing entries are tolerated: the compositor skips them and keeps
/// rendering (a missing asset never aborts a frame).
#[derive(Debug, Clone)]
pub struct SpriteStore {
    sprites: Vec<Option<Sprite>>,
    cell_size: (u32, u32),
}

impl SpriteStore {
    /// Builds a store from per-id sprite slots.
    ///
    /// `sprites` is indexed by segment id and must have exactly
    /// `layout.count()` entries. All present sprites must share the same
    /// dimensions; that dimension becomes the store's cell size.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::CountMismatch`] on a wrong entry count,
    /// [`SpriteError::DimensionMismatch`] on inconsistent sprite sizes, and
    /// [`SpriteError::Empty`] if no sprite is present at all (the cell size
    /// would be undefined).
    pub fn new(
        layout: SegmentLayout,
        sprites: Vec<Option<Sprite>>,
    ) -> Result<Self, SpriteError> {
        if sprites.len() != layout.count() as usize {
            return Err(SpriteError::CountMismatch {
                expected: layout.count() as usize,
                actual: sprites.len(),
            });
        }

        let mut cell_size = None;
        for (id, sprite) in sprites.iter().enumerate() {
            let Some(sprite) = sprite else {
                warn!(segment = id, "no sprite for segment, will render as missing");
                continue;
            };

            let dims = (sprite.width(), sprite.height());
            match cell_size {
                None => cell_size = Some(dims),
                Some(expected) if expected != dims => {
                    return Err(SpriteError::DimensionMismatch {
                        segment: id,
                        expected,
                        actual: dims,
                    });
                },
                Some(_) => {},
            }
        }

        let cell_size = cell_size.ok_or(SpriteError::Empty)?;
        Ok(Self { sprites, cell_size })
    }

    /// Looks up the sprite for a segment id.
    ///
    /// Returns `None` for out-of-range ids and for ids whose asset is
    /// missing.
    pub fn sprite(&self, id: u8) -> Option<&Sprite> {
        self.sprites.get(id as usize)?.as_ref()
    }

    /// Pixel dimensions shared by every sprite (and thus every frame).
    pub fn cell_size(&self) -> (u32, u32) {
        self.cell_size
    }
}

/// Sprite and sprite store construction errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SpriteError {
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("store holds {actual} entries, layout expects {expected}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("sprite for segment {segment} is {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        segment: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("store contains no sprites")]
    Empty,
}
