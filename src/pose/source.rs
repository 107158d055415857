use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{BeatposeError, BeatposeResult};
use crate::pose::keypoint::{Keypoint2, Keypoint3, Skeleton};

/// Supplier of a single pose for an image.
///
/// Pose estimation itself happens outside this crate; implementations adapt whatever an external
/// estimator produced.
pub trait KeypointSource {
    /// Detect the pose in `image`. `Ok(None)` means no skeleton was found.
    fn detect(&self, image: &Path) -> BeatposeResult<Option<Skeleton>>;
}

/// Run `source` and turn "no pose" into [`BeatposeError::NoPoseDetected`].
pub fn require_pose(source: &dyn KeypointSource, image: &Path) -> BeatposeResult<Skeleton> {
    let skeleton = source
        .detect(image)?
        .ok_or(BeatposeError::NoPoseDetected)?;
    tracing::info!(
        keypoints = skeleton.len(),
        has_3d = skeleton.points_3d.is_some(),
        "pose loaded"
    );
    Ok(skeleton)
}

/// Coordinate space of landmarks in a pose document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordSpace {
    /// Integer-valued pixel coordinates.
    #[default]
    Pixels,
    /// `[0, 1]` coordinates relative to the image width/height.
    Normalized,
}

/// On-disk pose document.
///
/// `null`, or a document with an empty `keypoints` list, means the estimator found no pose.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct PoseDoc {
    /// Coordinate space of every landmark in the document.
    #[serde(default)]
    pub space: CoordSpace,
    /// `[x, y]` pairs in landmark order.
    pub keypoints: Vec<[f64; 2]>,
    /// Optional `[x, y, z]` triples in landmark order.
    #[serde(default)]
    pub keypoints_3d: Option<Vec<[f64; 3]>>,
}

impl PoseDoc {
    /// Convert to a pixel-space skeleton for an image of `width` x `height`.
    pub fn into_skeleton(self, width: u32, height: u32) -> BeatposeResult<Option<Skeleton>> {
        if self.keypoints.is_empty() {
            return Ok(None);
        }

        let (sx, sy) = match self.space {
            CoordSpace::Pixels => (1.0, 1.0),
            CoordSpace::Normalized => (f64::from(width), f64::from(height)),
        };

        let mut points = Vec::with_capacity(self.keypoints.len());
        for (i, [x, y]) in self.keypoints.into_iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(BeatposeError::validation(format!(
                    "keypoint {i} has a non-finite coordinate"
                )));
            }
            points.push(Keypoint2::new((x * sx) as i32, (y * sy) as i32));
        }

        let points_3d = match self.keypoints_3d {
            Some(raw) => {
                if raw.len() != points.len() {
                    return Err(BeatposeError::validation(format!(
                        "keypoints_3d has {} entries, keypoints has {}",
                        raw.len(),
                        points.len()
                    )));
                }
                Some(
                    raw.into_iter()
                        .map(|[x, y, z]| Keypoint3 {
                            x: x * sx,
                            y: y * sy,
                            // Depth shares the horizontal scale.
                            z: z * sx,
                        })
                        .collect(),
                )
            }
            None => None,
        };

        Ok(Some(Skeleton { points, points_3d }))
    }
}

/// [`KeypointSource`] backed by a JSON [`PoseDoc`] written by an external estimator.
#[derive(Clone, Debug)]
pub struct PoseFile {
    path: PathBuf,
}

impl PoseFile {
    /// Read poses from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_doc(&self) -> BeatposeResult<Option<PoseDoc>> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read pose file '{}'", self.path.display()))?;
        serde_json::from_slice::<Option<PoseDoc>>(&bytes).map_err(|e| {
            BeatposeError::serde(format!(
                "parse pose file '{}': {e}",
                self.path.display()
            ))
        })
    }
}

impl KeypointSource for PoseFile {
    fn detect(&self, image: &Path) -> BeatposeResult<Option<Skeleton>> {
        let Some(doc) = self.read_doc()? else {
            return Ok(None);
        };
        let (width, height) = match doc.space {
            CoordSpace::Pixels => (1, 1),
            CoordSpace::Normalized => image::image_dimensions(image)
                .with_context(|| format!("read image dimensions of '{}'", image.display()))?,
        };
        doc.into_skeleton(width, height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pose/source.rs"]
mod tests;
