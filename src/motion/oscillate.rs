use std::f64::consts::TAU;

use crate::foundation::core::{Fps, FrameIndex, Vec2};
use crate::rig::parts::{PartClass, Side};

/// Idle oscillation `amplitude * sin(2π * frame * freq / fps)`.
///
/// Evaluated for every frame, beat or not, so the figure never freezes.
pub fn osc(frame: FrameIndex, freq_hz: f64, amplitude: f64, fps: Fps) -> f64 {
    amplitude * (TAU * (frame.0 as f64) * freq_hz / fps.as_f64()).sin()
}

/// Motion parameters of one part class.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClassMotion {
    /// Idle oscillation frequency.
    pub freq_hz: f64,
    /// Idle oscillation amplitude in degrees.
    pub amplitude_deg: f64,
    /// Multiplier on the idle angle for beat frames.
    pub beat_gain: f64,
    /// Offset added to the angle on beat frames, in degrees.
    pub beat_kick_deg: f64,
}

impl ClassMotion {
    /// Unmirrored angle in degrees for `frame`.
    pub fn angle_deg(&self, frame: FrameIndex, on_beat: bool, fps: Fps) -> f64 {
        let idle = osc(frame, self.freq_hz, self.amplitude_deg, fps);
        if on_beat {
            idle * self.beat_gain + self.beat_kick_deg
        } else {
            idle
        }
    }
}

/// Motion parameters for all classes plus the whole-figure beat bounce.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Torso sway.
    pub torso: ClassMotion,
    /// Head bob.
    pub head: ClassMotion,
    /// Arm and leg swing.
    pub limb: ClassMotion,
    /// Vertical offset in pixels applied to every part on beat frames (negative is up).
    pub bounce_px: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            torso: ClassMotion {
                freq_hz: 0.5,
                amplitude_deg: 3.0,
                beat_gain: 2.0,
                beat_kick_deg: 0.0,
            },
            head: ClassMotion {
                freq_hz: 0.75,
                amplitude_deg: 6.0,
                beat_gain: 2.0,
                beat_kick_deg: 5.0,
            },
            limb: ClassMotion {
                freq_hz: 1.5,
                amplitude_deg: 10.0,
                beat_gain: 2.0,
                beat_kick_deg: 15.0,
            },
            bounce_px: -10.0,
        }
    }
}

/// Rigid pose of one part for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PartPose {
    /// Rotation about the part pivot in radians.
    pub angle_rad: f64,
    /// Translation applied after rotation.
    pub translate: Vec2,
}

impl MotionConfig {
    /// Parameters for `class`.
    pub fn for_class(&self, class: PartClass) -> &ClassMotion {
        match class {
            PartClass::Torso => &self.torso,
            PartClass::Head => &self.head,
            PartClass::Limb => &self.limb,
        }
    }

    /// Pose of a part of `class` on `side` at `frame`. Right-side parts get the mirrored angle.
    pub fn pose(
        &self,
        class: PartClass,
        side: Side,
        frame: FrameIndex,
        on_beat: bool,
        fps: Fps,
    ) -> PartPose {
        let deg = self.for_class(class).angle_deg(frame, on_beat, fps) * side.mirror_sign();
        let translate = if on_beat {
            Vec2::new(0.0, self.bounce_px)
        } else {
            Vec2::ZERO
        };
        PartPose {
            angle_rad: deg.to_radians(),
            translate,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/oscillate.rs"]
mod tests;
