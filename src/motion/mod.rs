//! Beat-driven motion: per-part angles and the warp models that apply them.

/// Pluggable warp models (`rotate2d`, `perspective3d`).
pub mod model;
/// Idle oscillation and beat amplification.
pub mod oscillate;
