use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Fps;
use crate::foundation::error::{BeatposeError, BeatposeResult};
use crate::motion::model::MotionModelKind;
use crate::motion::oscillate::MotionConfig;
use crate::render::overlay::OverlayStyle;
use crate::rig::parts::RigConfig;

/// Animation settings. Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimConfig {
    /// Output frame rate.
    pub fps: Fps,
    /// Animation length in seconds.
    pub duration_secs: f64,
    /// Body-part table handed to the segmenter.
    pub rig: RigConfig,
    /// Per-class oscillation and beat parameters.
    pub motion: MotionConfig,
    /// Warp model.
    pub model: MotionModelKind,
    /// Color behind the parts (straight alpha).
    pub bg_rgba: [u8; 4],
    /// Keypoint markers; `None` disables them.
    pub overlay: Option<OverlayStyle>,
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            duration_secs: 10.0,
            rig: RigConfig::default(),
            motion: MotionConfig::default(),
            model: MotionModelKind::default(),
            bg_rgba: [0, 0, 0, 255],
            overlay: None,
        }
    }
}

impl AnimConfig {
    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> BeatposeResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| BeatposeError::serde(format!("invalid config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse the JSON config at `path`.
    pub fn from_path(path: &Path) -> BeatposeResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    /// Reject values no animation can be built from.
    pub fn validate(&self) -> BeatposeResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if !(self.duration_secs.is_finite() && self.duration_secs >= 0.0) {
            return Err(BeatposeError::validation(
                "duration_secs must be finite and >= 0",
            ));
        }
        self.rig.validate()?;
        for (name, m) in [
            ("torso", &self.motion.torso),
            ("head", &self.motion.head),
            ("limb", &self.motion.limb),
        ] {
            let values = [m.freq_hz, m.amplitude_deg, m.beat_gain, m.beat_kick_deg];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(BeatposeError::validation(format!(
                    "motion.{name} values must be finite"
                )));
            }
        }
        if !self.motion.bounce_px.is_finite() {
            return Err(BeatposeError::validation("motion.bounce_px must be finite"));
        }
        self.model.build()?;
        Ok(())
    }

    /// `round(fps * duration_secs)`.
    pub fn frame_count(&self) -> u64 {
        self.fps.secs_to_frames_round(self.duration_secs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
