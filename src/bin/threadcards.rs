use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

use threadcards::{
    BackgroundChoice, Canvas, EscapeMode, FfmpegFrameSource, NamedImage, Progress, ResvgRasterizer,
    Rng64, ThreadcardsConfig, TimestampMode,
};

#[derive(Parser, Debug)]
#[command(name = "threadcards", version, about = "Turn comment threads into card images")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    /// JSON config file; command-line flags take precedence.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render comment cards as PNGs plus manifest.json.
    Cards(CardsArgs),
    /// Write the per-page SVG scenes without rasterizing.
    Scene(SceneArgs),
    /// Capture stills from a video (requires `ffmpeg`/`ffprobe` on PATH).
    Frames(FramesArgs),
    /// Print capture timestamps for a video duration.
    Timestamps(TimestampsArgs),
    /// Join video stills and comment cards into an MP4 (requires `ffmpeg` on PATH).
    Slideshow(SlideshowArgs),
}

#[derive(Args, Debug)]
struct RenderFlags {
    /// Escaping of user text.
    #[arg(long, value_enum)]
    escape: Option<EscapeArg>,

    /// Seed for background picks and random timestamps.
    #[arg(long)]
    seed: Option<u64>,

    /// Use palette entry N for every page instead of a seeded pick.
    #[arg(long, conflicts_with = "background_file")]
    background_index: Option<usize>,

    /// Image or SVG file used as every page's background.
    #[arg(long)]
    background_file: Option<PathBuf>,

    /// Render on the calling thread only.
    #[arg(long)]
    sequential: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EscapeArg {
    Correct,
    Legacy,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Uniform,
    Random,
}

impl From<ModeArg> for TimestampMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Uniform => TimestampMode::Uniform,
            ModeArg::Random => TimestampMode::Random,
        }
    }
}

#[derive(Parser, Debug)]
struct CardsArgs {
    /// Input comments JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    render: RenderFlags,
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Input comments JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `page_N.svg` files.
    #[arg(long)]
    out: PathBuf,

    /// Escaping of user text.
    #[arg(long, value_enum)]
    escape: Option<EscapeArg>,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input video.
    #[arg(long)]
    video: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    shots: ShotFlags,

    #[command(flatten)]
    render: RenderFlags,
}

#[derive(Args, Debug)]
struct ShotFlags {
    /// Number of stills.
    #[arg(long)]
    count: Option<usize>,

    /// How capture times are spread.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(Parser, Debug)]
struct TimestampsArgs {
    /// Video duration in seconds.
    #[arg(long)]
    duration: f64,

    #[command(flatten)]
    shots: ShotFlags,

    /// Seed for random mode.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct SlideshowArgs {
    /// Input comments JSON.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Video to take stills from; they are shown before the comment cards.
    #[arg(long)]
    video: Option<PathBuf>,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Seconds per video still.
    #[arg(long)]
    screenshot_duration: Option<f64>,

    /// Seconds per comment card.
    #[arg(long)]
    comment_duration: Option<f64>,

    #[command(flatten)]
    shots: ShotFlags,

    #[command(flatten)]
    render: RenderFlags,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut cfg = match &cli.config {
        Some(path) => ThreadcardsConfig::from_path(path)?,
        None => ThreadcardsConfig::default(),
    };

    match cli.cmd {
        Command::Cards(args) => cmd_cards(&mut cfg, args),
        Command::Scene(args) => cmd_scene(&mut cfg, args),
        Command::Frames(args) => cmd_frames(&mut cfg, args),
        Command::Timestamps(args) => cmd_timestamps(&mut cfg, args),
        Command::Slideshow(args) => cmd_slideshow(&mut cfg, args),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn apply_escape(cfg: &mut ThreadcardsConfig, escape: Option<EscapeArg>) {
    match escape {
        Some(EscapeArg::Correct) => cfg.escape = EscapeMode::Correct,
        Some(EscapeArg::Legacy) => cfg.escape = EscapeMode::Legacy,
        None => {}
    }
}

fn apply_render_flags(cfg: &mut ThreadcardsConfig, flags: RenderFlags) -> anyhow::Result<()> {
    apply_escape(cfg, flags.escape);
    if let Some(seed) = flags.seed {
        cfg.seed = seed;
    }
    if let Some(index) = flags.background_index {
        cfg.background = BackgroundChoice::Fixed { index };
    }
    if let Some(path) = flags.background_file {
        cfg.background = BackgroundChoice::File { path };
    }
    if flags.sequential {
        cfg.parallel = false;
    }
    if flags.threads.is_some() {
        cfg.threads = flags.threads;
    }
    cfg.font_dirs.extend(flags.font_dirs);
    cfg.validate()?;
    Ok(())
}

fn apply_shot_flags(cfg: &mut ThreadcardsConfig, shots: ShotFlags) {
    if let Some(count) = shots.count {
        cfg.screenshots.count = count;
    }
    if let Some(mode) = shots.mode {
        cfg.screenshots.mode = mode.into();
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read comments '{}'", path.display()))
}

fn rasterizer(cfg: &ThreadcardsConfig) -> ResvgRasterizer {
    if cfg.font_dirs.is_empty() {
        ResvgRasterizer::default()
    } else {
        ResvgRasterizer::new(Arc::new(cfg.font_library()))
    }
}

fn report_failures(batch: &threadcards::CardBatch) {
    for failure in &batch.failures {
        eprintln!("warning: {failure}");
    }
}

fn cmd_cards(cfg: &mut ThreadcardsConfig, args: CardsArgs) -> anyhow::Result<()> {
    apply_render_flags(cfg, args.render)?;
    let json = read_input(&args.in_path)?;

    let batch = threadcards::generate_cards(&json, &rasterizer(cfg), &cfg.card_opts())?;
    report_failures(&batch);
    let paths = threadcards::write_batch(&args.out, &batch.title, &batch.images)?;

    eprintln!("{}: wrote {} images to {}", batch.title, paths.len(), args.out.display());
    Ok(())
}

fn cmd_scene(cfg: &mut ThreadcardsConfig, args: SceneArgs) -> anyhow::Result<()> {
    apply_escape(cfg, args.escape);
    let json = read_input(&args.in_path)?;

    let opts = cfg.card_opts();
    let pages = threadcards::prepare_pages(&json, &opts.scene.params)?;
    let scenes = threadcards::render_scenes(&pages, &opts.scene);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;
    for (i, scene) in scenes.iter().enumerate() {
        let path = args.out.join(format!("page_{}.svg", i + 1));
        std::fs::write(&path, scene.to_svg())
            .with_context(|| format!("write svg '{}'", path.display()))?;
    }

    eprintln!("wrote {} scenes to {}", scenes.len(), args.out.display());
    Ok(())
}

fn capture(cfg: &ThreadcardsConfig, video: &Path) -> anyhow::Result<threadcards::CardBatch> {
    let source = FfmpegFrameSource::open(video, Canvas::SQUARE_1080)?;
    let batch = threadcards::capture_screenshots(&source, &cfg.screenshot_opts())?;
    report_failures(&batch);
    Ok(batch)
}

fn cmd_frames(cfg: &mut ThreadcardsConfig, args: FramesArgs) -> anyhow::Result<()> {
    apply_render_flags(cfg, args.render)?;
    apply_shot_flags(cfg, args.shots);

    let batch = capture(cfg, &args.video)?;
    let paths = threadcards::write_batch(&args.out, &batch.title, &batch.images)?;

    eprintln!("{}: wrote {} images to {}", batch.title, paths.len(), args.out.display());
    Ok(())
}

fn cmd_timestamps(cfg: &mut ThreadcardsConfig, args: TimestampsArgs) -> anyhow::Result<()> {
    apply_shot_flags(cfg, args.shots);
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }

    let mut rng = Rng64::new(cfg.seed);
    let ts = threadcards::generate_timestamps(
        cfg.screenshots.mode,
        cfg.screenshots.count,
        args.duration,
        &mut rng,
    )?;
    for t in ts {
        println!("{t:.3}");
    }
    Ok(())
}

fn cmd_slideshow(cfg: &mut ThreadcardsConfig, args: SlideshowArgs) -> anyhow::Result<()> {
    if args.in_path.is_none() && args.video.is_none() {
        anyhow::bail!("slideshow needs --in and/or --video");
    }
    apply_render_flags(cfg, args.render)?;
    apply_shot_flags(cfg, args.shots);
    if let Some(d) = args.screenshot_duration {
        cfg.slideshow.screenshot_duration_sec = d;
    }
    if let Some(d) = args.comment_duration {
        cfg.slideshow.comment_duration_sec = d;
    }
    cfg.validate()?;

    let mut images: Vec<NamedImage> = Vec::new();
    if let Some(video) = &args.video {
        images.extend(capture(cfg, video)?.images);
    }
    if let Some(in_path) = &args.in_path {
        let json = read_input(in_path)?;
        let batch = threadcards::generate_cards(&json, &rasterizer(cfg), &cfg.card_opts())?;
        report_failures(&batch);
        images.extend(batch.images);
    }

    let bytes = threadcards::render_slideshow(&images, &cfg.slideshow, &mut |p: Progress| {
        match p.percentage {
            Some(pct) => tracing::info!(stage = p.stage.tag(), pct, "slideshow"),
            None => tracing::info!(stage = p.stage.tag(), "slideshow"),
        }
    })?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write video '{}'", args.out.display()))?;

    eprintln!("wrote {} ({} slides)", args.out.display(), images.len());
    Ok(())
}
