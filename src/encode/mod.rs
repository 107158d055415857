//! Encoding sinks.
//!
//! Sinks consume rendered frames in index order and are used by `Synthesizer::render_into`.

/// `ffmpeg`-based sinks (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
