use std::path::{Path, PathBuf};

use crate::assets::decode::{PreparedImage, load_image};
use crate::beat::schedule::BeatSchedule;
use crate::beat::source::BeatSource;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{BeatposeError, BeatposeResult};
use crate::pose::keypoint::Skeleton;
use crate::pose::source::{KeypointSource, require_pose};
use crate::render::frame::Frame;
use crate::render::synth::{RenderStats, SynthOpts, Synthesizer};
use crate::rig::segment::Segmenter;
use crate::session::config::AnimConfig;

/// A segmented portrait bound to a beat schedule, ready to render.
pub struct DanceSession {
    synth: Synthesizer,
    schedule: BeatSchedule,
    fps: Fps,
    frame_count: u64,
}

impl DanceSession {
    /// Segment `image` with `skeleton` and map `beat_times` onto frames.
    #[tracing::instrument(skip_all, fields(beats = beat_times.len()))]
    pub fn prepare(
        cfg: &AnimConfig,
        image: &PreparedImage,
        skeleton: &Skeleton,
        beat_times: &[f64],
    ) -> BeatposeResult<Self> {
        cfg.validate()?;
        let schedule = BeatSchedule::from_times(beat_times, cfg.fps)?;
        let parts = Segmenter::new(cfg.rig.clone())?.segment(image, skeleton)?;
        let synth = Synthesizer::new(parts, cfg.motion, cfg.model.build()?)
            .with_overlay(cfg.overlay)
            .with_background(cfg.bg_rgba);

        let frame_count = cfg.frame_count();
        tracing::info!(
            parts = synth.parts().len(),
            frame_count,
            beat_frames = schedule.frames().filter(|&f| f < frame_count).count(),
            "session prepared"
        );
        Ok(Self {
            synth,
            schedule,
            fps: cfg.fps,
            frame_count,
        })
    }

    /// Load the image, ask `poses` for its skeleton and `beats` for the beat times of `audio`.
    pub fn load(
        cfg: &AnimConfig,
        image_path: &Path,
        poses: &dyn KeypointSource,
        beats: &dyn BeatSource,
        audio: &Path,
    ) -> BeatposeResult<Self> {
        let image = load_image(image_path)?;
        let skeleton = require_pose(poses, image_path)?;
        let beat_times = beats.beats(audio)?;
        Self::prepare(cfg, &image, &skeleton, &beat_times)
    }

    /// Number of frames in the animation.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Beat frames.
    pub fn schedule(&self) -> &BeatSchedule {
        &self.schedule
    }

    /// The underlying synthesizer.
    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synth
    }

    /// Render frame `idx`, which must be below [`Self::frame_count`].
    pub fn render_frame(&self, idx: FrameIndex) -> BeatposeResult<Frame> {
        if idx.0 >= self.frame_count {
            return Err(BeatposeError::validation(format!(
                "frame {} is outside the animation (frame_count {})",
                idx.0, self.frame_count
            )));
        }
        self.synth.render_frame(idx, &self.schedule, self.fps)
    }

    /// Render every frame into memory.
    pub fn synthesize(&self) -> BeatposeResult<Vec<Frame>> {
        self.synth
            .synthesize(&self.schedule, self.frame_count, self.fps)
    }

    /// Stream every frame into `sink`, muxing `audio` when given.
    pub fn render_into(
        &self,
        opts: &SynthOpts,
        audio: Option<&Path>,
        sink: &mut dyn FrameSink,
    ) -> BeatposeResult<RenderStats> {
        let canvas = self.synth.parts().canvas;
        let cfg = SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.fps,
            audio: audio.map(|path| AudioInputConfig {
                path: path.to_path_buf(),
                duration_secs: self.fps.frames_to_secs(self.frame_count),
            }),
        };
        self.synth
            .render_into(&self.schedule, self.frame_count, self.fps, opts, cfg, sink)
    }

    /// Encode the animation to an MP4 at `out_path` with the system `ffmpeg`.
    pub fn render_to_mp4(
        &self,
        out_path: impl Into<PathBuf>,
        audio: Option<&Path>,
        opts: &SynthOpts,
    ) -> BeatposeResult<RenderStats> {
        if self.frame_count == 0 {
            return Err(BeatposeError::validation(
                "render_to_mp4 needs at least one frame",
            ));
        }
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out_path));
        self.render_into(opts, audio, &mut sink)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/pipeline.rs"]
mod tests;
