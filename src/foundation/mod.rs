//! Shared core types, the crate error, and pixel math.

/// Frame indices, frame rates, canvas size, planar transforms.
pub mod core;
/// `BeatposeError` and `BeatposeResult`.
pub mod error;
pub(crate) mod math;
