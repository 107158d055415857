//! Beatpose animates a still portrait in time with music.
//!
//! The body is cut into part crops once, then every output frame re-composites the crops on a
//! fresh canvas, each rotated about its joint by an idle oscillation that is amplified on beat
//! frames:
//!
//! - Segment the base image with a [`Skeleton`] into a [`PartTable`] ([`Segmenter`])
//! - Map beat times onto frames ([`BeatSchedule`])
//! - Render single frames or stream the whole range into a [`FrameSink`] ([`Synthesizer`],
//!   [`DanceSession`])
//!
//! Pose estimation and beat tracking are external; their output is read through
//! [`KeypointSource`] and [`BeatSource`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Base-image decoding.
pub mod assets;
/// Beat schedule and beat sources.
pub mod beat;
/// Frame sinks, including the `ffmpeg` MP4 encoder.
pub mod encode;
/// Core types and errors.
pub mod foundation;
/// Oscillation parameters and warp models.
pub mod motion;
/// Keypoints, skeletons, and keypoint sources.
pub mod pose;
/// Compositing and the Frame Synthesizer.
pub mod render;
/// Body-part rig and the Part Segmenter.
pub mod rig;
/// Configuration and the end-to-end session.
pub mod session;

pub use crate::assets::decode::{PreparedImage, decode_image, load_image};
pub use crate::beat::schedule::BeatSchedule;
pub use crate::beat::source::{BeatFile, BeatSource};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, Transform2D, Vec2};
pub use crate::foundation::error::{BeatposeError, BeatposeResult};
pub use crate::motion::model::{MotionModel, MotionModelKind, Perspective3D, Rotate2D, Warp};
pub use crate::motion::oscillate::{ClassMotion, MotionConfig, PartPose};
pub use crate::pose::keypoint::{Keypoint2, Keypoint3, Skeleton, landmark};
pub use crate::pose::source::{KeypointSource, PoseFile, require_pose};
pub use crate::render::frame::Frame;
pub use crate::render::overlay::OverlayStyle;
pub use crate::render::synth::{RenderStats, SynthOpts, Synthesizer};
pub use crate::rig::parts::{
    BodyPart, Padding, PartClass, Pivot, RigConfig, Side, default_body_parts,
};
pub use crate::rig::segment::{PartCrop, PartTable, Segmenter};
pub use crate::session::config::AnimConfig;
pub use crate::session::pipeline::DanceSession;
