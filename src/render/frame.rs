use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{BeatposeError, BeatposeResult};

/// Opaque RGB8 output frame, row-major and tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB8 bytes (`width * height * 3`).
    pub data: Vec<u8>,
}

impl Frame {
    /// RGB triple at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Copy into an `image` buffer.
    pub fn to_rgb_image(&self) -> BeatposeResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            BeatposeError::validation("frame data size mismatch with width*height*3")
        })
    }

    /// Write the frame as a PNG, creating parent directories.
    pub fn save_png(&self, path: &Path) -> BeatposeResult<()> {
        crate::encode::ffmpeg::ensure_parent_dir(path)?;
        self.to_rgb_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}
