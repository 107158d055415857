use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{BeatposeError, BeatposeResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded base image: premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub rgba8_premul: Vec<u8>,
}

impl PreparedImage {
    /// Premultiply a straight-alpha RGBA image.
    pub fn from_rgba_image(img: image::RgbaImage) -> BeatposeResult<Self> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(BeatposeError::validation("base image must be non-empty"));
        }
        let mut rgba8_premul = img.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Ok(Self {
            width,
            height,
            rgba8_premul,
        })
    }

    /// Image dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

/// Decode any format the `image` crate understands. Images without alpha become fully opaque.
pub fn decode_image(bytes: &[u8]) -> BeatposeResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    PreparedImage::from_rgba_image(dyn_img.to_rgba8())
}

/// Read and decode the image at `path`.
pub fn load_image(path: &Path) -> BeatposeResult<PreparedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let img = decode_image(&bytes)?;
    tracing::info!(
        width = img.width,
        height = img.height,
        path = %path.display(),
        "base image loaded"
    );
    Ok(img)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
