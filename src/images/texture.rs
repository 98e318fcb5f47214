//! Raw RGBA reactor textures and feature blending

use image::{Rgba, RgbaImage};
use thiserror::Error;

use super::definition::{Feature, ReactorSize};

/// Pixels per texture row (4096 bytes).
pub const TEXTURE_WIDTH: u32 = 1024;
/// Edge of one reactor cell in pixels.
pub const CELL_SIZE: i64 = 79;
/// Width of a vertical barrier image in pixels.
const VBARRIER_WIDTH: u32 = 3;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextureError {
    #[error("Image of {len} bytes does not hold whole rows of {width} pixels")]
    Shape { len: usize, width: usize },
    #[error("Feature at ({x}, {y}) does not fit in the texture")]
    OutOfBounds { x: i64, y: i64 },
}

/// Which part of the reactor grid a texture shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureLayout {
    pub file_name: &'static str,
    /// Pixel x of column 0
    pub origin_x: i64,
    pub min_column: i64,
    pub max_column: i64,
}

/// Textures to patch for a reactor size, in patch order.
pub fn layouts(size: ReactorSize) -> Vec<TextureLayout> {
    match size {
        ReactorSize::Normal => vec![TextureLayout {
            file_name: "024.tex",
            origin_x: 4,
            min_column: 0,
            max_column: 9,
        }],
        ReactorSize::Large => vec![
            TextureLayout {
                file_name: "024.tex",
                origin_x: 4,
                min_column: 0,
                max_column: 5,
            },
            TextureLayout {
                file_name: "041.tex",
                origin_x: -145,
                min_column: 6,
                max_column: 9,
            },
        ],
    }
}

/// The three feature images, loaded once per run.
#[derive(Debug, Clone)]
pub struct FeatureImages {
    pub no_waldo: RgbaImage,
    pub hbarrier: RgbaImage,
    pub vbarrier: RgbaImage,
}

impl FeatureImages {
    /// Wrap the raw contents of `nowaldo.tex`, `hbarrier.tex` and
    /// `vbarrier.tex`.
    pub fn from_raw(
        no_waldo: Vec<u8>,
        hbarrier: Vec<u8>,
        vbarrier: Vec<u8>,
    ) -> Result<Self, TextureError> {
        let cell = CELL_SIZE as u32;
        Ok(Self {
            no_waldo: rgba(cell, no_waldo)?,
            hbarrier: rgba(cell, hbarrier)?,
            vbarrier: rgba(VBARRIER_WIDTH, vbarrier)?,
        })
    }
}

/// Raw RGBA pixels, `width` pixels per row, as many rows as the bytes hold.
fn rgba(width: u32, bytes: Vec<u8>) -> Result<RgbaImage, TextureError> {
    let row_len = 4 * width as usize;
    let shape_error = |len: usize| TextureError::Shape {
        len,
        width: width as usize,
    };
    if row_len == 0 || bytes.len() % row_len != 0 {
        return Err(shape_error(bytes.len()));
    }
    let height = u32::try_from(bytes.len() / row_len).map_err(|_| shape_error(bytes.len()))?;
    let len = bytes.len();
    RgbaImage::from_raw(width, height, bytes).ok_or_else(|| shape_error(len))
}

/// A reactor texture as stored by the game: 1024 pixels per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    image: RgbaImage,
}

impl Texture {
    pub fn from_raw(bytes: Vec<u8>) -> Result<Self, TextureError> {
        Ok(Self {
            image: rgba(TEXTURE_WIDTH, bytes)?,
        })
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.image.into_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Alpha-blend `overlay` with its top-left corner at (x, y). The
    /// texture's own alpha is left untouched.
    pub fn blend(&mut self, x: i64, y: i64, overlay: &RgbaImage) -> Result<(), TextureError> {
        let (width, height) = self.image.dimensions();
        let (overlay_width, overlay_height) = overlay.dimensions();
        let (left, top) = match (u32::try_from(x), u32::try_from(y)) {
            (Ok(left), Ok(top))
                if u64::from(left) + u64::from(overlay_width) <= u64::from(width)
                    && u64::from(top) + u64::from(overlay_height) <= u64::from(height) =>
            {
                (left, top)
            }
            _ => return Err(TextureError::OutOfBounds { x, y }),
        };

        for (dx, dy, src) in overlay.enumerate_pixels() {
            let dst = self.image.get_pixel_mut(left + dx, top + dy);
            let alpha = f32::from(src[3]) / 255.0;
            for channel in 0..3 {
                let blended =
                    (1.0 - alpha) * f32::from(dst[channel]) + alpha * f32::from(src[channel]);
                dst[channel] = blended as u8;
            }
        }
        Ok(())
    }

    /// Paint one feature, clipped to the columns the layout shows.
    pub fn apply(
        &mut self,
        layout: &TextureLayout,
        feature: &Feature,
        images: &FeatureImages,
    ) -> Result<(), TextureError> {
        let columns = |x1: i64, x2: i64| x1.max(layout.min_column)..=x2.min(layout.max_column);
        let left = |column: i64| layout.origin_x + CELL_SIZE * column;

        match *feature {
            Feature::NoWaldo { x1, y1, x2, y2 } => {
                for row in y1..=y2 {
                    for column in columns(x1, x2) {
                        self.blend(left(column), CELL_SIZE * row + 1, &images.no_waldo)?;
                    }
                }
            }
            Feature::HBarrier { y, x1, x2 } => {
                for column in columns(x1, x2) {
                    self.blend(left(column), CELL_SIZE * y, &images.hbarrier)?;
                }
            }
            Feature::VBarrier { x, y1, y2 } => {
                if (layout.min_column..=layout.max_column).contains(&x) {
                    for row in y1..=y2 {
                        self.blend(left(x) - 1, CELL_SIZE * row + 1, &images.vbarrier)?;
                    }
                }
            }
        }
        Ok(())
    }
}
