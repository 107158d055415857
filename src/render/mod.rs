//! Frame synthesis: per-frame canvases, compositing, and output frames.

/// Premultiplied RGBA canvas and alpha compositing.
pub mod composite;
/// Opaque RGB output frame.
pub mod frame;
/// Keypoint marker overlay.
pub mod overlay;
/// Frame Synthesizer.
pub mod synth;
