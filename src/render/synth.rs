use rayon::prelude::*;

use crate::beat::schedule::BeatSchedule;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, Point};
use crate::foundation::error::{BeatposeError, BeatposeResult};
use crate::motion::model::MotionModel;
use crate::motion::oscillate::MotionConfig;
use crate::render::composite::{Raster, flatten_to_rgb, warp_over};
use crate::render::frame::Frame;
use crate::render::overlay::{OverlayStyle, draw_disc};
use crate::rig::segment::PartTable;

/// Threading options for range rendering.
#[derive(Clone, Debug)]
pub struct SynthOpts {
    /// Render frames of each chunk on a dedicated rayon pool.
    pub parallel: bool,
    /// Frames per chunk handed to the pool (and buffered before the sink sees them).
    pub chunk_size: usize,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for SynthOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 32,
            threads: None,
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames delivered to the sink.
    pub frames_total: u64,
    /// Delivered frames that landed on a beat.
    pub beat_frames: u64,
}

/// Frame Synthesizer: poses every part crop per frame and composites them onto a fresh canvas.
///
/// Holds only read-only state, so a frame depends on nothing but its index and the inputs.
pub struct Synthesizer {
    parts: PartTable,
    motion: MotionConfig,
    model: Box<dyn MotionModel>,
    overlay: Option<OverlayStyle>,
    bg_rgba: [u8; 4],
}

impl Synthesizer {
    /// Synthesizer over `parts` with the given motion parameters and warp model.
    pub fn new(parts: PartTable, motion: MotionConfig, model: Box<dyn MotionModel>) -> Self {
        Self {
            parts,
            motion,
            model,
            overlay: None,
            bg_rgba: [0, 0, 0, 255],
        }
    }

    /// Draw keypoint markers on top of every frame.
    pub fn with_overlay(mut self, style: Option<OverlayStyle>) -> Self {
        self.overlay = style;
        self
    }

    /// Color the transparent canvas is flattened over.
    pub fn with_background(mut self, bg_rgba: [u8; 4]) -> Self {
        self.bg_rgba = bg_rgba;
        self
    }

    /// The part table being animated.
    pub fn parts(&self) -> &PartTable {
        &self.parts
    }

    /// Render one frame.
    pub fn render_frame(
        &self,
        frame: FrameIndex,
        schedule: &BeatSchedule,
        fps: Fps,
    ) -> BeatposeResult<Frame> {
        let on_beat = schedule.is_beat(frame);
        let mut canvas = Raster::new(self.parts.canvas);
        let mut markers = Vec::<Point>::new();

        for crop in &self.parts.crops {
            let pose = self.motion.pose(crop.class, crop.side, frame, on_beat, fps);
            let warp = self.model.warp(crop, pose);
            warp_over(&mut canvas, crop, &warp)?;
            if self.overlay.is_some() {
                markers.extend(crop.keypoints.iter().filter_map(|&kp| warp.map(kp)));
            }
        }

        if let Some(style) = self.overlay {
            for m in markers {
                draw_disc(&mut canvas, m, style);
            }
        }

        Ok(flatten_to_rgb(&canvas, self.bg_rgba))
    }

    /// Render frames `[0, frame_count)` in order. An empty range yields no frames.
    pub fn synthesize(
        &self,
        schedule: &BeatSchedule,
        frame_count: u64,
        fps: Fps,
    ) -> BeatposeResult<Vec<Frame>> {
        (0..frame_count)
            .map(|i| self.render_frame(FrameIndex(i), schedule, fps))
            .collect()
    }

    /// Render frames `[0, frame_count)` and stream them into `sink` in index order.
    #[tracing::instrument(
        skip_all,
        fields(frame_count = frame_count, parallel = opts.parallel, model = self.model.name())
    )]
    pub fn render_into(
        &self,
        schedule: &BeatSchedule,
        frame_count: u64,
        fps: Fps,
        opts: &SynthOpts,
        cfg: SinkConfig,
        sink: &mut dyn FrameSink,
    ) -> BeatposeResult<RenderStats> {
        if cfg.width != self.parts.canvas.width || cfg.height != self.parts.canvas.height {
            return Err(BeatposeError::validation(format!(
                "sink size {}x{} does not match canvas {}x{}",
                cfg.width, cfg.height, self.parts.canvas.width, self.parts.canvas.height
            )));
        }

        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            None
        };
        let chunk_size = normalized_chunk_size(opts.chunk_size);

        sink.begin(cfg)?;
        let mut stats = RenderStats::default();
        let mut chunk_start = 0u64;
        while chunk_start < frame_count {
            let chunk_end = (chunk_start + chunk_size).min(frame_count);
            let frames = match pool.as_ref() {
                Some(pool) => pool.install(|| {
                    (chunk_start..chunk_end)
                        .into_par_iter()
                        .map(|i| self.render_frame(FrameIndex(i), schedule, fps))
                        .collect::<BeatposeResult<Vec<_>>>()
                })?,
                None => (chunk_start..chunk_end)
                    .map(|i| self.render_frame(FrameIndex(i), schedule, fps))
                    .collect::<BeatposeResult<Vec<_>>>()?,
            };

            for (i, frame) in (chunk_start..chunk_end).zip(frames.iter()) {
                let idx = FrameIndex(i);
                sink.push_frame(idx, frame)?;
                stats.frames_total += 1;
                if schedule.is_beat(idx) {
                    stats.beat_frames += 1;
                }
            }
            tracing::debug!(chunk_start, chunk_end, "chunk delivered");
            chunk_start = chunk_end;
        }
        sink.end()?;

        tracing::info!(
            frames = stats.frames_total,
            beat_frames = stats.beat_frames,
            "render complete"
        );
        Ok(stats)
    }
}

fn build_thread_pool(threads: Option<usize>) -> BeatposeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(BeatposeError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BeatposeError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 { 1 } else { chunk_size as u64 }
}

#[cfg(test)]
#[path = "../../tests/unit/render/synth.rs"]
mod tests;
