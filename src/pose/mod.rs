//! Skeleton keypoints and the adapters that load them.

/// Keypoint and skeleton types plus the 33-landmark numbering.
pub mod keypoint;
/// `KeypointSource` trait and the JSON pose-file implementation.
pub mod source;
