use std::path::{Path, PathBuf};

use anyhow::Context as _;
use beatpose::{
    AnimConfig, BeatFile, BeatSource as _, DanceSession, FrameIndex, MotionModelKind,
    OverlayStyle, PoseFile, Segmenter, SynthOpts,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "beatpose", version)]
struct Cli {
    /// Log at DEBUG level (default INFO).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Write every segmented part crop as a PNG.
    Parts(PartsArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Base portrait image.
    #[arg(long)]
    image: PathBuf,

    /// Pose JSON produced by an external pose estimator.
    #[arg(long)]
    pose: PathBuf,

    /// Animation config JSON. Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AnimOverrides {
    /// Output frames per second (integer).
    #[arg(long)]
    fps: Option<u32>,

    /// Animation length in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Warp model.
    #[arg(long, value_enum)]
    model: Option<ModelChoice>,

    /// Draw markers at every transformed keypoint.
    #[arg(long)]
    overlay_keypoints: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Beat times file (JSON array or whitespace-separated seconds).
    #[arg(long)]
    beats: Option<PathBuf>,

    #[command(flatten)]
    anim: AnimOverrides,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Beat times file (JSON array or whitespace-separated seconds).
    #[arg(long)]
    beats: PathBuf,

    /// Audio track muxed under the video, trimmed to the animation length.
    #[arg(long)]
    audio: Option<PathBuf>,

    #[command(flatten)]
    anim: AnimOverrides,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Render frames on a rayon pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel` (default: rayon's choice).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames rendered per parallel batch.
    #[arg(long, default_value_t = 32)]
    chunk_size: usize,
}

#[derive(Parser, Debug)]
struct PartsArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Directory receiving one PNG per part.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModelChoice {
    #[value(name = "rotate2d")]
    Rotate2d,
    #[value(name = "perspective3d")]
    Perspective3d,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Parts(args) => cmd_parts(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(input: &InputArgs, overrides: Option<&AnimOverrides>) -> anyhow::Result<AnimConfig> {
    let mut cfg = match input.config.as_deref() {
        Some(path) => AnimConfig::from_path(path)?,
        None => AnimConfig::default(),
    };
    if let Some(o) = overrides {
        if let Some(fps) = o.fps {
            cfg.fps = beatpose::Fps::new(fps, 1)?;
        }
        if let Some(duration) = o.duration {
            cfg.duration_secs = duration;
        }
        match o.model {
            Some(ModelChoice::Rotate2d) => cfg.model = MotionModelKind::Rotate2d,
            Some(ModelChoice::Perspective3d) => {
                if !matches!(cfg.model, MotionModelKind::Perspective3d { .. }) {
                    cfg.model = MotionModelKind::perspective_default();
                }
            }
            None => {}
        }
        if o.overlay_keypoints && cfg.overlay.is_none() {
            cfg.overlay = Some(OverlayStyle::default());
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_subject(
    input: &InputArgs,
) -> anyhow::Result<(beatpose::PreparedImage, beatpose::Skeleton)> {
    let image = beatpose::load_image(&input.image)?;
    let skeleton = beatpose::require_pose(&PoseFile::new(&input.pose), &input.image)?;
    Ok((image, skeleton))
}

fn read_beats(beats: &Path, audio: Option<&Path>) -> anyhow::Result<Vec<f64>> {
    Ok(BeatFile::new(beats).beats(audio.unwrap_or(beats))?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.input, Some(&args.anim))?;
    let (image, skeleton) = load_subject(&args.input)?;
    let beat_times = match args.beats.as_deref() {
        Some(path) => read_beats(path, None)?,
        None => Vec::new(),
    };

    let session = DanceSession::prepare(&cfg, &image, &skeleton, &beat_times)?;
    let frame = session.render_frame(FrameIndex(args.frame))?;
    frame.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.input, Some(&args.anim))?;
    let (image, skeleton) = load_subject(&args.input)?;
    let beat_times = read_beats(&args.beats, args.audio.as_deref())?;

    let session = DanceSession::prepare(&cfg, &image, &skeleton, &beat_times)?;
    let opts = SynthOpts {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
    };
    let stats = session.render_to_mp4(&args.out, args.audio.as_deref(), &opts)?;

    eprintln!(
        "wrote {} ({} frames, {} on beat)",
        args.out.display(),
        stats.frames_total,
        stats.beat_frames
    );
    Ok(())
}

fn cmd_parts(args: PartsArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.input, None)?;
    let (image, skeleton) = load_subject(&args.input)?;
    let table = Segmenter::new(cfg.rig)?.segment(&image, &skeleton)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (i, crop) in table.crops.iter().enumerate() {
        let path = args.out_dir.join(format!("{i:02}_{}.png", crop.name));
        crop.to_rgba_image()?
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::debug!(
            part = %crop.name,
            offset = ?crop.offset,
            width = crop.width,
            height = crop.height,
            "part written"
        );
    }

    eprintln!("wrote {} parts to {}", table.len(), args.out_dir.display());
    Ok(())
}
