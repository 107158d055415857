use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{BeatposeError, BeatposeResult};
use crate::foundation::math::{mul_div255_u16, mul_div255_u8};
use crate::motion::model::Warp;
use crate::render::frame::Frame;
use crate::rig::segment::PartCrop;

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Per-frame compositing buffer: premultiplied RGBA8, zero-initialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl Raster {
    /// Fully transparent raster of `canvas` size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.rgba_len()],
        }
    }

    /// Pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        let idx = self.index(x, y);
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Composite `src` over the pixel at `(x, y)`.
    pub fn blend_pixel(&mut self, x: u32, y: u32, src: PremulRgba8) {
        let idx = self.index(x, y);
        let dst = [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ];
        self.data[idx..idx + 4].copy_from_slice(&over(dst, src));
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

/// Source-over for premultiplied pixels: `out = src + (1 - src_alpha) * dst`.
///
/// An opaque source replaces `dst` exactly; a fully transparent one leaves it unchanged.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Paste an unrotated `width` x `height` premultiplied block with its top-left at `offset`.
///
/// The pasted region is clipped to the raster; pixels outside it are never touched.
pub fn paste_over(
    dst: &mut Raster,
    src: &[u8],
    width: u32,
    height: u32,
    offset: (i64, i64),
) -> BeatposeResult<()> {
    if src.len() != (width as usize) * (height as usize) * 4 {
        return Err(BeatposeError::evaluation(
            "paste_over expects src matching width*height*4",
        ));
    }

    let x0 = offset.0.max(0);
    let y0 = offset.1.max(0);
    let x1 = (offset.0 + i64::from(width)).min(i64::from(dst.width));
    let y1 = (offset.1 + i64::from(height)).min(i64::from(dst.height));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    for y in y0..y1 {
        let sy = (y - offset.1) as usize;
        for x in x0..x1 {
            let sx = (x - offset.0) as usize;
            let si = (sy * (width as usize) + sx) * 4;
            let px = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            dst.blend_pixel(x as u32, y as u32, px);
        }
    }
    Ok(())
}

/// Composite `crop` onto `dst` through `warp` (crop-local to canvas).
///
/// Destination pixels are inverse-mapped into the crop and sampled bilinearly. Only pixels
/// inside both the raster and the warped crop's bounds are visited.
pub fn warp_over(dst: &mut Raster, crop: &PartCrop, warp: &Warp) -> BeatposeResult<()> {
    if let Some(offset) = warp.as_integer_translation() {
        return paste_over(dst, &crop.rgba8_premul, crop.width, crop.height, offset);
    }

    let Some(inverse) = warp.inverse() else {
        tracing::debug!(part = %crop.name, "singular warp, part skipped");
        return Ok(());
    };

    let (x0, y0, x1, y1) = dest_bounds(dst, crop, warp);
    for y in y0..y1 {
        for x in x0..x1 {
            let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let Some(local) = inverse.map(center) else {
                continue;
            };
            let px = sample_bilinear(crop, local);
            if px[3] != 0 {
                dst.blend_pixel(x, y, px);
            }
        }
    }
    Ok(())
}

// Pixel bounds of the warped crop clipped to the raster, as `[x0, x1) x [y0, y1)`.
fn dest_bounds(dst: &Raster, crop: &PartCrop, warp: &Warp) -> (u32, u32, u32, u32) {
    let (w, h) = (f64::from(crop.width), f64::from(crop.height));
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(0.0, h),
        Point::new(w, h),
    ];
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for c in corners {
        let Some(p) = warp.map(c) else {
            // A corner behind the camera: fall back to the whole raster.
            return (0, 0, dst.width, dst.height);
        };
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    }

    let clip = |v: f64, hi: u32| v.clamp(0.0, f64::from(hi)) as u32;
    (
        clip(min.x.floor() - 1.0, dst.width),
        clip(min.y.floor() - 1.0, dst.height),
        clip(max.x.ceil() + 1.0, dst.width),
        clip(max.y.ceil() + 1.0, dst.height),
    )
}

/// Bilinear sample at crop-local `p` (pixel centers at `+0.5`); outside the crop is transparent.
pub fn sample_bilinear(crop: &PartCrop, p: Point) -> PremulRgba8 {
    let fx = p.x - 0.5;
    let fy = p.y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let fetch = |x: i64, y: i64| -> [f64; 4] {
        if x < 0 || y < 0 || x >= i64::from(crop.width) || y >= i64::from(crop.height) {
            return [0.0; 4];
        }
        crop.pixel(x as u32, y as u32).map(f64::from)
    };

    let p00 = fetch(x0, y0);
    let p10 = fetch(x0 + 1, y0);
    let p01 = fetch(x0, y0 + 1);
    let p11 = fetch(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = p00[i] + (p10[i] - p00[i]) * tx;
        let bottom = p01[i] + (p11[i] - p01[i]) * tx;
        out[i] = (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8;
    }
    // Keep the premultiplied invariant (color <= alpha) after rounding.
    let a = out[3];
    for c in &mut out[..3] {
        *c = (*c).min(a);
    }
    out
}

/// Flatten the premultiplied raster over `bg_rgba` into an opaque RGB frame.
pub fn flatten_to_rgb(raster: &Raster, bg_rgba: [u8; 4]) -> Frame {
    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    let mut data = Vec::with_capacity((raster.width as usize) * (raster.height as usize) * 3);
    for s in raster.data.chunks_exact(4) {
        let inv = 255u16 - u16::from(s[3]);
        for i in 0..3 {
            let v = u16::from(s[i]) + mul_div255_u16(bg[i], inv);
            data.push(v.min(255) as u8);
        }
    }
    Frame {
        width: raster.width,
        height: raster.height,
        data,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
