//! Beat timestamps and their mapping onto output frames.

/// Frame-index beat schedule.
pub mod schedule;
/// `BeatSource` trait and the beat-file implementation.
pub mod source;
