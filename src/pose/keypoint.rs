use crate::foundation::core::Point;

/// 2D landmark in base-image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Keypoint2 {
    /// Column in pixels.
    pub x: i32,
    /// Row in pixels.
    pub y: i32,
}

impl Keypoint2 {
    /// Create a keypoint at `(x, y)`.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Keypoint as a floating-point position.
    pub fn to_point(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

/// 3D landmark. `x`/`y` are pixels, `z` is a depth estimate in the same units (smaller is
/// closer to the camera).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keypoint3 {
    /// Column in pixels.
    pub x: f64,
    /// Row in pixels.
    pub y: f64,
    /// Depth in pixel units.
    pub z: f64,
}

/// One detected pose: an ordered keypoint sequence plus an optional parallel 3D sequence.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Skeleton {
    /// 2D keypoints in landmark order.
    pub points: Vec<Keypoint2>,
    /// 3D keypoints in the same order, when the pose source provides them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_3d: Option<Vec<Keypoint3>>,
}

impl Skeleton {
    /// Skeleton from 2D points only.
    pub fn from_points(points: Vec<Keypoint2>) -> Self {
        Self {
            points,
            points_3d: None,
        }
    }

    /// Number of 2D keypoints.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when no keypoints were detected.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 2D keypoint at `index`.
    pub fn get(&self, index: usize) -> Option<Keypoint2> {
        self.points.get(index).copied()
    }

    /// 3D keypoint at `index`, only when the 3D sequence is present and long enough.
    pub fn get_3d(&self, index: usize) -> Option<Keypoint3> {
        self.points_3d.as_ref()?.get(index).copied()
    }
}

/// Landmark indices of the 33-point body model.
pub mod landmark {
    /// Nose tip.
    pub const NOSE: usize = 0;
    /// Left eye center.
    pub const LEFT_EYE: usize = 2;
    /// Right eye center.
    pub const RIGHT_EYE: usize = 5;
    /// Left ear.
    pub const LEFT_EAR: usize = 7;
    /// Right ear.
    pub const RIGHT_EAR: usize = 8;
    /// Left shoulder.
    pub const LEFT_SHOULDER: usize = 11;
    /// Right shoulder.
    pub const RIGHT_SHOULDER: usize = 12;
    /// Left elbow.
    pub const LEFT_ELBOW: usize = 13;
    /// Right elbow.
    pub const RIGHT_ELBOW: usize = 14;
    /// Left wrist.
    pub const LEFT_WRIST: usize = 15;
    /// Right wrist.
    pub const RIGHT_WRIST: usize = 16;
    /// Left hip.
    pub const LEFT_HIP: usize = 23;
    /// Right hip.
    pub const RIGHT_HIP: usize = 24;
    /// Left knee.
    pub const LEFT_KNEE: usize = 25;
    /// Right knee.
    pub const RIGHT_KNEE: usize = 26;
    /// Left ankle.
    pub const LEFT_ANKLE: usize = 27;
    /// Right ankle.
    pub const RIGHT_ANKLE: usize = 28;
    /// Number of landmarks in the model.
    pub const COUNT: usize = 33;
}
