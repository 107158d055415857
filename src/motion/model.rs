use crate::foundation::core::{Affine, Point, Transform2D, Vec2};
use crate::foundation::error::{BeatposeError, BeatposeResult};
use crate::motion::oscillate::PartPose;
use crate::rig::segment::PartCrop;

const W_EPS: f64 = 1e-6;

/// Projective 3x3 matrix, row-major, acting on `(x, y, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography(pub [f64; 9]);

impl Homography {
    /// Identity mapping.
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Pure translation.
    pub fn translate(v: Vec2) -> Self {
        Self([1.0, 0.0, v.x, 0.0, 1.0, v.y, 0.0, 0.0, 1.0])
    }

    /// Map `p`; `None` when the point lands on or behind the projection plane.
    pub fn map(&self, p: Point) -> Option<Point> {
        let m = &self.0;
        let w = m[6] * p.x + m[7] * p.y + m[8];
        if w <= W_EPS {
            return None;
        }
        Some(Point::new(
            (m[0] * p.x + m[1] * p.y + m[2]) / w,
            (m[3] * p.x + m[4] * p.y + m[5]) / w,
        ))
    }

    /// Inverse matrix. Points in front of the projection plane keep a positive `w`.
    pub fn inverse(&self) -> Option<Self> {
        let [a, b, c, d, e, f, g, h, i] = self.0;
        let co_a = e * i - f * h;
        let co_b = -(d * i - f * g);
        let co_c = d * h - e * g;
        let det = a * co_a + b * co_b + c * co_c;
        if det.abs() < 1e-12 {
            return None;
        }
        let inv = [
            co_a,
            -(b * i - c * h),
            b * f - c * e,
            co_b,
            a * i - c * g,
            -(a * f - c * d),
            co_c,
            -(a * h - b * g),
            a * e - b * d,
        ];
        let s = 1.0 / det;
        Some(Self(inv.map(|v| v * s)))
    }
}

impl std::ops::Mul for Homography {
    type Output = Homography;

    fn mul(self, rhs: Homography) -> Homography {
        let a = self.0;
        let b = rhs.0;
        let mut out = [0.0; 9];
        for r in 0..3 {
            for c in 0..3 {
                out[r * 3 + c] =
                    a[r * 3] * b[c] + a[r * 3 + 1] * b[3 + c] + a[r * 3 + 2] * b[6 + c];
            }
        }
        Homography(out)
    }
}

/// Crop-local to canvas mapping produced by a [`MotionModel`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Warp {
    /// Rigid planar mapping.
    Affine(Affine),
    /// Perspective mapping.
    Projective(Homography),
}

impl Warp {
    /// Map a crop-local point to canvas space.
    pub fn map(&self, p: Point) -> Option<Point> {
        match self {
            Warp::Affine(a) => Some(*a * p),
            Warp::Projective(h) => h.map(p),
        }
    }

    /// Canvas to crop-local mapping.
    pub fn inverse(&self) -> Option<Warp> {
        match self {
            Warp::Affine(a) => {
                if a.determinant().abs() < 1e-12 {
                    None
                } else {
                    Some(Warp::Affine(a.inverse()))
                }
            }
            Warp::Projective(h) => h.inverse().map(Warp::Projective),
        }
    }

    /// Integer translation, when the warp is exactly one.
    pub fn as_integer_translation(&self) -> Option<(i64, i64)> {
        let Warp::Affine(a) = self else {
            return None;
        };
        let [xx, yx, xy, yy, tx, ty] = a.as_coeffs();
        let is_int = |v: f64| v.fract() == 0.0 && v.abs() < 1e9;
        if xx == 1.0 && yx == 0.0 && xy == 0.0 && yy == 1.0 && is_int(tx) && is_int(ty) {
            Some((tx as i64, ty as i64))
        } else {
            None
        }
    }
}

/// Strategy that turns a part's pose into a crop-to-canvas warp.
pub trait MotionModel: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Warp placing `crop` on the canvas at `pose`.
    fn warp(&self, crop: &PartCrop, pose: PartPose) -> Warp;
}

fn placement(crop: &PartCrop, pose: PartPose) -> Vec2 {
    Vec2::new(f64::from(crop.offset.0), f64::from(crop.offset.1)) + pose.translate
}

/// In-plane rotation about the part pivot.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rotate2D;

impl MotionModel for Rotate2D {
    fn name(&self) -> &'static str {
        "rotate2d"
    }

    fn warp(&self, crop: &PartCrop, pose: PartPose) -> Warp {
        let t = Transform2D {
            translate: placement(crop, pose),
            rotation_rad: pose.angle_rad,
            anchor: crop.pivot.to_vec2(),
        };
        Warp::Affine(t.to_affine())
    }
}

/// Rotation about the pivot followed by an out-of-plane yaw, projected through a pinhole camera.
///
/// The yaw is `angle * depth_slope * depth_gain`, so parts that point toward or away from the
/// camera foreshorten as they swing. Without 3D keypoints the slope is zero and this reduces to
/// [`Rotate2D`].
#[derive(Clone, Copy, Debug)]
pub struct Perspective3D {
    /// Focal length in pixels.
    pub focal_px: f64,
    /// Coupling between in-plane swing and out-of-plane yaw.
    pub depth_gain: f64,
}

impl Default for Perspective3D {
    fn default() -> Self {
        Self {
            focal_px: 1000.0,
            depth_gain: 1.0,
        }
    }
}

impl Perspective3D {
    const MAX_YAW_RAD: f64 = std::f64::consts::FRAC_PI_4;

    fn yaw(&self, crop: &PartCrop, pose: PartPose) -> f64 {
        (pose.angle_rad * crop.depth_slope * self.depth_gain)
            .clamp(-Self::MAX_YAW_RAD, Self::MAX_YAW_RAD)
    }
}

impl MotionModel for Perspective3D {
    fn name(&self) -> &'static str {
        "perspective3d"
    }

    fn warp(&self, crop: &PartCrop, pose: PartPose) -> Warp {
        let f = self.focal_px;
        let (s, c) = pose.angle_rad.sin_cos();
        let (sy, cy) = self.yaw(crop, pose).sin_cos();

        // Columns of Ry(yaw) * Rz(angle) for the plane's x and y axes.
        let r1 = [cy * c, s, -sy * c];
        let r2 = [-cy * s, c, sy * s];
        let project = Homography([
            f * r1[0],
            f * r2[0],
            0.0,
            f * r1[1],
            f * r2[1],
            0.0,
            r1[2],
            r2[2],
            f,
        ]);

        let pivot = crop.pivot.to_vec2();
        let to_canvas = Homography::translate(pivot + placement(crop, pose));
        Warp::Projective(to_canvas * project * Homography::translate(-pivot))
    }
}

/// Serializable motion-model selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MotionModelKind {
    /// [`Rotate2D`].
    #[default]
    Rotate2d,
    /// [`Perspective3D`].
    Perspective3d {
        /// Focal length in pixels.
        focal_px: f64,
        /// Yaw coupling.
        depth_gain: f64,
    },
}

impl MotionModelKind {
    /// Instantiate the model.
    pub fn build(self) -> BeatposeResult<Box<dyn MotionModel>> {
        match self {
            MotionModelKind::Rotate2d => Ok(Box::new(Rotate2D)),
            MotionModelKind::Perspective3d {
                focal_px,
                depth_gain,
            } => {
                if !(focal_px.is_finite() && focal_px > 0.0) {
                    return Err(BeatposeError::validation(
                        "perspective3d focal_px must be > 0",
                    ));
                }
                if !depth_gain.is_finite() {
                    return Err(BeatposeError::validation(
                        "perspective3d depth_gain must be finite",
                    ));
                }
                Ok(Box::new(Perspective3D {
                    focal_px,
                    depth_gain,
                }))
            }
        }
    }

    /// Perspective model with default focal length and gain.
    pub fn perspective_default() -> Self {
        let d = Perspective3D::default();
        MotionModelKind::Perspective3d {
            focal_px: d.focal_px,
            depth_gain: d.depth_gain,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/model.rs"]
mod tests;
