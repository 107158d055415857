use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::beat::schedule::validate_beat_times;
use crate::foundation::error::{BeatposeError, BeatposeResult};

/// Supplier of beat timestamps (seconds) for an audio track.
///
/// Beat tracking happens outside this crate; implementations adapt its output.
pub trait BeatSource {
    /// Ordered beat timestamps for `audio`.
    fn beats(&self, audio: &Path) -> BeatposeResult<Vec<f64>>;
}

/// [`BeatSource`] backed by a file written by an external beat tracker.
///
/// Accepts a JSON array of seconds (`[0.5, 1.0]`) or whitespace-separated decimal numbers.
#[derive(Clone, Debug)]
pub struct BeatFile {
    path: PathBuf,
}

impl BeatFile {
    /// Read beats from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BeatSource for BeatFile {
    fn beats(&self, _audio: &Path) -> BeatposeResult<Vec<f64>> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read beat file '{}'", self.path.display()))?;
        let times = parse_beat_times(&text)
            .map_err(|e| BeatposeError::serde(format!("{}: {e}", self.path.display())))?;
        validate_beat_times(&times)?;
        tracing::info!(beats = times.len(), "beats loaded");
        Ok(times)
    }
}

/// Parse a JSON array or whitespace-separated list of beat times.
pub fn parse_beat_times(text: &str) -> Result<Vec<f64>, String> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str::<Vec<f64>>(trimmed).map_err(|e| e.to_string());
    }
    trimmed
        .split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|e| format!("invalid beat time '{tok}': {e}"))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/beat/source.rs"]
mod tests;
