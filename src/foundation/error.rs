/// Convenience result type used across beatpose.
pub type BeatposeResult<T> = Result<T, BeatposeError>;

/// Top-level error taxonomy used by the animation APIs.
///
/// Crops that fall outside the image and boxes that collapse to zero area are not errors: the
/// segmenter clamps or expands them and the compositor clips pasted regions.
#[derive(thiserror::Error, Debug)]
pub enum BeatposeError {
    /// The keypoint source found no skeleton in the input image.
    #[error("no pose detected in input image")]
    NoPoseDetected,

    /// A body part references a keypoint index that the skeleton does not contain.
    #[error("missing keypoint: part '{part}' needs index {index}, skeleton has {available} points")]
    MissingKeypoint {
        /// Name of the body part that referenced the index.
        part: String,
        /// Referenced keypoint index.
        index: usize,
        /// Number of keypoints in the skeleton.
        available: usize,
    },

    /// Invalid caller-provided data (frame rates, sizes, beat times, rig tables).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while producing or encoding frames.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when parsing config, pose, or beat documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BeatposeError {
    /// Build a [`BeatposeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BeatposeError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`BeatposeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
