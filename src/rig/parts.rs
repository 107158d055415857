use std::collections::BTreeSet;

use crate::foundation::error::{BeatposeError, BeatposeResult};
use crate::pose::keypoint::landmark as lm;

/// Part classification; selects padding, motion parameters and compositing order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PartClass {
    /// Trunk between shoulders and hips.
    Torso,
    /// Head and face.
    Head,
    /// Arm or leg segment.
    Limb,
}

impl PartClass {
    /// Compositing rank: torso first, then head, then limbs.
    pub fn z_rank(self) -> u8 {
        match self {
            PartClass::Torso => 0,
            PartClass::Head => 1,
            PartClass::Limb => 2,
        }
    }
}

/// Body side. Left and right parts swing with mirrored angles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Subject's left.
    Left,
    /// Subject's right.
    Right,
    /// On the midline; not mirrored.
    #[default]
    Center,
}

impl Side {
    /// Sign applied to the part's rotation angle.
    pub fn mirror_sign(self) -> f64 {
        match self {
            Side::Right => -1.0,
            Side::Left | Side::Center => 1.0,
        }
    }
}

/// Point a part rotates about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pivot {
    /// A single joint, usually the proximal one.
    Joint(usize),
    /// Midpoint of two joints (e.g. between the hips).
    Midpoint(usize, usize),
    /// Center of the part's keypoint bounding box.
    Center,
}

impl Pivot {
    /// Keypoint indices the pivot reads.
    pub fn indices(self) -> Vec<usize> {
        match self {
            Pivot::Joint(i) => vec![i],
            Pivot::Midpoint(a, b) => vec![a, b],
            Pivot::Center => Vec::new(),
        }
    }
}

/// A named group of keypoints animated as one rigid unit.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BodyPart {
    /// Unique part name, e.g. `left_upper_arm`.
    pub name: String,
    /// Keypoint indices covered by the part (at least 2).
    pub keypoints: Vec<usize>,
    /// Part classification.
    pub class: PartClass,
    /// Body side for mirrored motion.
    #[serde(default)]
    pub side: Side,
    /// Rotation pivot.
    pub pivot: Pivot,
}

impl BodyPart {
    /// Build a part from its fields.
    pub fn new(
        name: impl Into<String>,
        keypoints: Vec<usize>,
        class: PartClass,
        side: Side,
        pivot: Pivot,
    ) -> Self {
        Self {
            name: name.into(),
            keypoints,
            class,
            side,
            pivot,
        }
    }

    /// Largest keypoint index the part reads, pivot included.
    pub fn max_index(&self) -> Option<usize> {
        self.keypoints
            .iter()
            .copied()
            .chain(self.pivot.indices())
            .max()
    }
}

/// Crop padding in pixels, per part class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Padding around head crops.
    pub head: u32,
    /// Padding around torso crops.
    pub torso: u32,
    /// Padding around limb crops.
    pub limb: u32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            head: 40,
            torso: 30,
            limb: 15,
        }
    }
}

impl Padding {
    /// Padding for `class`.
    pub fn for_class(self, class: PartClass) -> u32 {
        match class {
            PartClass::Head => self.head,
            PartClass::Torso => self.torso,
            PartClass::Limb => self.limb,
        }
    }
}

/// Static rig passed to the segmenter at construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Body-part table.
    pub parts: Vec<BodyPart>,
    /// Per-class padding.
    pub padding: Padding,
    /// Minimum keypoint-box extent in pixels; thinner boxes are widened to this size.
    pub min_extent: u32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            parts: default_body_parts(),
            padding: Padding::default(),
            min_extent: 8,
        }
    }
}

impl RigConfig {
    /// Rig with `parts` and default padding.
    pub fn with_parts(parts: Vec<BodyPart>) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    /// Check table shape: non-empty, unique names, at least two keypoints per part.
    pub fn validate(&self) -> BeatposeResult<()> {
        if self.parts.is_empty() {
            return Err(BeatposeError::validation("rig must define at least one part"));
        }
        if self.min_extent == 0 {
            return Err(BeatposeError::validation("rig min_extent must be >= 1"));
        }
        let mut names = BTreeSet::new();
        for part in &self.parts {
            if part.keypoints.len() < 2 {
                return Err(BeatposeError::validation(format!(
                    "part '{}' needs at least 2 keypoints",
                    part.name
                )));
            }
            if !names.insert(part.name.as_str()) {
                return Err(BeatposeError::validation(format!(
                    "duplicate part name '{}'",
                    part.name
                )));
            }
        }
        Ok(())
    }

    /// Largest keypoint index referenced anywhere in the table.
    pub fn max_index(&self) -> Option<usize> {
        self.parts.iter().filter_map(BodyPart::max_index).max()
    }
}

/// Ten-part table for the 33-landmark body model.
pub fn default_body_parts() -> Vec<BodyPart> {
    use PartClass::{Head, Limb, Torso};
    use Side::{Center, Left, Right};

    vec![
        BodyPart::new(
            "torso",
            vec![lm::LEFT_SHOULDER, lm::RIGHT_SHOULDER, lm::LEFT_HIP, lm::RIGHT_HIP],
            Torso,
            Center,
            Pivot::Midpoint(lm::LEFT_HIP, lm::RIGHT_HIP),
        ),
        BodyPart::new(
            "head",
            vec![lm::NOSE, lm::LEFT_EYE, lm::RIGHT_EYE, lm::LEFT_EAR, lm::RIGHT_EAR],
            Head,
            Center,
            Pivot::Midpoint(lm::LEFT_SHOULDER, lm::RIGHT_SHOULDER),
        ),
        BodyPart::new(
            "left_upper_arm",
            vec![lm::LEFT_SHOULDER, lm::LEFT_ELBOW],
            Limb,
            Left,
            Pivot::Joint(lm::LEFT_SHOULDER),
        ),
        BodyPart::new(
            "left_forearm",
            vec![lm::LEFT_ELBOW, lm::LEFT_WRIST],
            Limb,
            Left,
            Pivot::Joint(lm::LEFT_ELBOW),
        ),
        BodyPart::new(
            "right_upper_arm",
            vec![lm::RIGHT_SHOULDER, lm::RIGHT_ELBOW],
            Limb,
            Right,
            Pivot::Joint(lm::RIGHT_SHOULDER),
        ),
        BodyPart::new(
            "right_forearm",
            vec![lm::RIGHT_ELBOW, lm::RIGHT_WRIST],
            Limb,
            Right,
            Pivot::Joint(lm::RIGHT_ELBOW),
        ),
        BodyPart::new(
            "left_thigh",
            vec![lm::LEFT_HIP, lm::LEFT_KNEE],
            Limb,
            Left,
            Pivot::Joint(lm::LEFT_HIP),
        ),
        BodyPart::new(
            "left_shin",
            vec![lm::LEFT_KNEE, lm::LEFT_ANKLE],
            Limb,
            Left,
            Pivot::Joint(lm::LEFT_KNEE),
        ),
        BodyPart::new(
            "right_thigh",
            vec![lm::RIGHT_HIP, lm::RIGHT_KNEE],
            Limb,
            Right,
            Pivot::Joint(lm::RIGHT_HIP),
        ),
        BodyPart::new(
            "right_shin",
            vec![lm::RIGHT_KNEE, lm::RIGHT_ANKLE],
            Limb,
            Right,
            Pivot::Joint(lm::RIGHT_KNEE),
        ),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/rig/parts.rs"]
mod tests;
