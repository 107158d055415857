use std::collections::BTreeSet;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{BeatposeError, BeatposeResult};

/// Output frame indices that coincide with a beat.
///
/// Built once from beat timestamps and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BeatSchedule {
    frames: BTreeSet<u64>,
}

impl BeatSchedule {
    /// Empty schedule: every frame uses idle motion only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Map each beat time to `trunc(t * fps)`.
    pub fn from_times(beat_times: &[f64], fps: Fps) -> BeatposeResult<Self> {
        validate_beat_times(beat_times)?;
        let frames = beat_times
            .iter()
            .map(|&t| fps.secs_to_frames_floor(t))
            .collect();
        Ok(Self { frames })
    }

    /// Schedule from explicit frame indices.
    pub fn from_frames(frames: impl IntoIterator<Item = u64>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// `true` when `frame` lands on a beat.
    pub fn is_beat(&self, frame: FrameIndex) -> bool {
        self.frames.contains(&frame.0)
    }

    /// Beat frames in ascending order.
    pub fn frames(&self) -> impl Iterator<Item = u64> + '_ {
        self.frames.iter().copied()
    }

    /// Number of distinct beat frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when no frame is on a beat.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Beat times must be finite, non-negative and non-decreasing.
pub fn validate_beat_times(beat_times: &[f64]) -> BeatposeResult<()> {
    let mut prev = 0.0f64;
    for (i, &t) in beat_times.iter().enumerate() {
        if !t.is_finite() {
            return Err(BeatposeError::validation(format!(
                "beat time {i} is not finite"
            )));
        }
        if t < 0.0 {
            return Err(BeatposeError::validation(format!(
                "beat time {i} is negative ({t})"
            )));
        }
        if t < prev {
            return Err(BeatposeError::validation(format!(
                "beat times must be non-decreasing (index {i}: {t} < {prev})"
            )));
        }
        prev = t;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/beat/schedule.rs"]
mod tests;
