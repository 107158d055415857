//! End-to-end animation session: configuration plus the segment -> synthesize -> encode pipeline.

/// JSON animation configuration.
pub mod config;
/// `DanceSession`: prepared parts and beat schedule, ready to render.
pub mod pipeline;
