use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{BeatposeError, BeatposeResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::pose::keypoint::Skeleton;
use crate::rig::parts::{BodyPart, PartClass, Pivot, RigConfig, Side};

/// Rectangular sub-image of one body part, extracted once and reused for every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PartCrop {
    /// Part name from the rig table.
    pub name: String,
    /// Part classification.
    pub class: PartClass,
    /// Body side.
    pub side: Side,
    /// Crop width in pixels (>= 1).
    pub width: u32,
    /// Crop height in pixels (>= 1).
    pub height: u32,
    /// Premultiplied RGBA8 pixels.
    pub rgba8_premul: Vec<u8>,
    /// Top-left corner in base-image coordinates.
    pub offset: (i32, i32),
    /// Rotation pivot in crop-local coordinates (may lie outside the crop).
    pub pivot: Point,
    /// The part's keypoints in crop-local coordinates.
    pub keypoints: Vec<Point>,
    /// Depth change per pixel of 2D length from the first to the last keypoint, in `[-1, 1]`.
    /// Zero when the skeleton has no 3D points.
    pub depth_slope: f64,
}

impl PartCrop {
    /// Premultiplied pixel at crop-local `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.rgba8_premul[idx],
            self.rgba8_premul[idx + 1],
            self.rgba8_premul[idx + 2],
            self.rgba8_premul[idx + 3],
        ]
    }

    /// Straight-alpha copy of the crop, for writing it out as an image.
    pub fn to_rgba_image(&self) -> BeatposeResult<image::RgbaImage> {
        let mut data = self.rgba8_premul.clone();
        unpremultiply_rgba8_in_place(&mut data);
        image::RgbaImage::from_raw(self.width, self.height, data).ok_or_else(|| {
            BeatposeError::validation(format!(
                "part '{}' data size mismatch with width*height*4",
                self.name
            ))
        })
    }
}

/// Part crops in compositing order (torso, head, limbs) plus the canvas they came from.
#[derive(Clone, Debug, PartialEq)]
pub struct PartTable {
    /// Base-image dimensions.
    pub canvas: Canvas,
    /// One crop per rig part, z-ordered.
    pub crops: Vec<PartCrop>,
}

impl PartTable {
    /// Crop by part name.
    pub fn get(&self, name: &str) -> Option<&PartCrop> {
        self.crops.iter().find(|c| c.name == name)
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.crops.len()
    }

    /// `true` when the table holds no parts.
    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}

/// Part Segmenter: cuts each body part of the rig out of the base image.
#[derive(Clone, Debug)]
pub struct Segmenter {
    rig: RigConfig,
}

impl Segmenter {
    /// Build a segmenter for `rig`.
    pub fn new(rig: RigConfig) -> BeatposeResult<Self> {
        rig.validate()?;
        Ok(Self { rig })
    }

    /// The rig this segmenter was built with.
    pub fn rig(&self) -> &RigConfig {
        &self.rig
    }

    /// Crop every part. Fails before extracting anything if a referenced keypoint is missing.
    #[tracing::instrument(
        skip_all,
        fields(parts = self.rig.parts.len(), keypoints = skeleton.len())
    )]
    pub fn segment(&self, image: &PreparedImage, skeleton: &Skeleton) -> BeatposeResult<PartTable> {
        if image.width == 0 || image.height == 0 {
            return Err(BeatposeError::validation("base image must be non-empty"));
        }
        if image.rgba8_premul.len() != image.canvas().rgba_len() {
            return Err(BeatposeError::validation(
                "base image data size mismatch with width*height*4",
            ));
        }
        for part in &self.rig.parts {
            check_indices(part, skeleton)?;
        }

        let mut crops = self
            .rig
            .parts
            .iter()
            .map(|part| self.crop_part(image, skeleton, part))
            .collect::<Vec<_>>();
        crops.sort_by_key(|c| c.class.z_rank());

        Ok(PartTable {
            canvas: image.canvas(),
            crops,
        })
    }

    fn crop_part(&self, image: &PreparedImage, skeleton: &Skeleton, part: &BodyPart) -> PartCrop {
        let pts = part
            .keypoints
            .iter()
            .filter_map(|&i| skeleton.get(i))
            .collect::<Vec<_>>();

        let mut min_x = pts.iter().map(|p| i64::from(p.x)).min().unwrap_or(0);
        let mut max_x = pts.iter().map(|p| i64::from(p.x)).max().unwrap_or(0);
        let mut min_y = pts.iter().map(|p| i64::from(p.y)).min().unwrap_or(0);
        let mut max_y = pts.iter().map(|p| i64::from(p.y)).max().unwrap_or(0);

        let min_extent = i64::from(self.rig.min_extent);
        if max_x - min_x < min_extent || max_y - min_y < min_extent {
            tracing::debug!(part = %part.name, "degenerate keypoint box widened to min extent");
            (min_x, max_x) = widen(min_x, max_x, min_extent);
            (min_y, max_y) = widen(min_y, max_y, min_extent);
        }

        let pad = i64::from(self.rig.padding.for_class(part.class));
        let (x0, x1) = clamp_span(min_x - pad, max_x + pad + 1, i64::from(image.width));
        let (y0, y1) = clamp_span(min_y - pad, max_y + pad + 1, i64::from(image.height));
        if x0 != min_x - pad || x1 != max_x + pad + 1 || y0 != min_y - pad || y1 != max_y + pad + 1
        {
            tracing::debug!(part = %part.name, x0, y0, x1, y1, "crop clamped to image bounds");
        }

        let width = (x1 - x0) as u32;
        let height = (y1 - y0) as u32;
        let mut rgba8_premul = Vec::with_capacity((width as usize) * (height as usize) * 4);
        let stride = (image.width as usize) * 4;
        for y in y0..y1 {
            let row = (y as usize) * stride;
            let start = row + (x0 as usize) * 4;
            let end = row + (x1 as usize) * 4;
            rgba8_premul.extend_from_slice(&image.rgba8_premul[start..end]);
        }

        let origin = Point::new(x0 as f64, y0 as f64);
        let local = |p: Point| Point::new(p.x - origin.x, p.y - origin.y);
        let keypoints = pts.iter().map(|p| local(p.to_point())).collect::<Vec<_>>();
        let pivot = match part.pivot {
            Pivot::Joint(i) => skeleton.get(i).map(|p| local(p.to_point())),
            Pivot::Midpoint(a, b) => skeleton
                .get(a)
                .zip(skeleton.get(b))
                .map(|(a, b)| local(a.to_point().midpoint(b.to_point()))),
            Pivot::Center => None,
        }
        .unwrap_or_else(|| {
            Point::new(
                (min_x + max_x) as f64 / 2.0 - origin.x,
                (min_y + max_y) as f64 / 2.0 - origin.y,
            )
        });

        PartCrop {
            name: part.name.clone(),
            class: part.class,
            side: part.side,
            width,
            height,
            rgba8_premul,
            offset: (x0 as i32, y0 as i32),
            pivot,
            keypoints,
            depth_slope: depth_slope(part, skeleton),
        }
    }
}

fn check_indices(part: &BodyPart, skeleton: &Skeleton) -> BeatposeResult<()> {
    let missing = part
        .keypoints
        .iter()
        .copied()
        .chain(part.pivot.indices())
        .find(|&i| i >= skeleton.len());
    match missing {
        Some(index) => Err(BeatposeError::MissingKeypoint {
            part: part.name.clone(),
            index,
            available: skeleton.len(),
        }),
        None => Ok(()),
    }
}

fn widen(lo: i64, hi: i64, min_extent: i64) -> (i64, i64) {
    let extent = hi - lo;
    if extent >= min_extent {
        return (lo, hi);
    }
    let grow = min_extent - extent;
    let before = grow / 2;
    (lo - before, hi + (grow - before))
}

// Clamp `[lo, hi)` into `[0, len)`, keeping at least one pixel.
fn clamp_span(lo: i64, hi: i64, len: i64) -> (i64, i64) {
    let lo_c = lo.clamp(0, len - 1);
    let hi_c = hi.clamp(lo_c + 1, len);
    (lo_c, hi_c)
}

fn depth_slope(part: &BodyPart, skeleton: &Skeleton) -> f64 {
    let (Some(&first), Some(&last)) = (part.keypoints.first(), part.keypoints.last()) else {
        return 0.0;
    };
    let (Some(a), Some(b)) = (skeleton.get_3d(first), skeleton.get_3d(last)) else {
        return 0.0;
    };
    let len_2d = (b.x - a.x).hypot(b.y - a.y).max(1.0);
    ((b.z - a.z) / len_2d).clamp(-1.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/rig/segment.rs"]
mod tests;
