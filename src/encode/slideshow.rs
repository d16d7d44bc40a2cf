use std::io::{BufRead, BufReader, Read as _};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::OnceLock;
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::archive::{ImageGroup, NamedImage};
use crate::encode::png::encode_png;
use crate::foundation::core::Canvas;
use crate::foundation::error::{CardError, CardResult};

const MANIFEST_NAME: &str = "inputs.txt";
const OUTPUT_NAME: &str = "output.mp4";

/// Steps of [`render_slideshow`], in the only order they may occur.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Acquiring the shared ffmpeg runtime.
    LoadingCore,
    /// Writing slide images and the concat manifest.
    WritingAssets,
    /// Assembling ffmpeg arguments.
    BuildingCommand,
    /// ffmpeg is encoding.
    Transcoding,
    /// Reading the encoded video back.
    ReadingResult,
    /// Removing temporary files.
    CleaningUp,
}

impl Stage {
    /// Every stage, in order.
    pub const ALL: [Stage; 6] = [
        Stage::LoadingCore,
        Stage::WritingAssets,
        Stage::BuildingCommand,
        Stage::Transcoding,
        Stage::ReadingResult,
        Stage::CleaningUp,
    ];

    /// Stable status tag.
    pub fn tag(self) -> &'static str {
        match self {
            Stage::LoadingCore => "loading_core",
            Stage::WritingAssets => "writing_assets",
            Stage::BuildingCommand => "building_command",
            Stage::Transcoding => "transcoding",
            Stage::ReadingResult => "reading_result",
            Stage::CleaningUp => "cleaning_up",
        }
    }

    /// The stage that must follow this one, if any.
    pub fn next(self) -> Option<Stage> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(idx + 1).copied()
    }
}

/// A progress report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Progress {
    /// Current stage.
    pub stage: Stage,
    /// Completion of the current stage, `0..=100`, when known.
    pub percentage: Option<u8>,
}

/// Enforces stage order and forwards reports to a callback.
pub struct StageTracker<'a> {
    current: Option<Stage>,
    last_pct: Option<u8>,
    sink: &'a mut dyn FnMut(Progress),
}

impl<'a> StageTracker<'a> {
    /// Tracker that has not entered any stage yet.
    pub fn new(sink: &'a mut dyn FnMut(Progress)) -> Self {
        Self {
            current: None,
            last_pct: None,
            sink,
        }
    }

    /// Stage most recently entered.
    pub fn current(&self) -> Option<Stage> {
        self.current
    }

    /// Move to `stage`, which must be the successor of the current one.
    pub fn enter(&mut self, stage: Stage) -> CardResult<()> {
        let expected = match self.current {
            None => Some(Stage::LoadingCore),
            Some(s) => s.next(),
        };
        if expected != Some(stage) {
            return Err(CardError::contract(format!(
                "slideshow stage '{}' entered after {}",
                stage.tag(),
                self.current.map_or("start", Stage::tag)
            )));
        }
        tracing::debug!(stage = stage.tag(), "slideshow stage");
        self.current = Some(stage);
        self.last_pct = None;
        (self.sink)(Progress {
            stage,
            percentage: None,
        });
        Ok(())
    }

    /// Report progress within the current stage. Values are clamped to 100 and never go back.
    pub fn report(&mut self, percentage: u8) -> CardResult<()> {
        let stage = self
            .current
            .ok_or_else(|| CardError::contract("slideshow progress reported before any stage"))?;
        let pct = percentage.min(100);
        if self.last_pct.is_some_and(|last| pct <= last) {
            return Ok(());
        }
        self.last_pct = Some(pct);
        (self.sink)(Progress {
            stage,
            percentage: Some(pct),
        });
        Ok(())
    }

    /// Fail unless every stage has been entered.
    pub fn finish(&self) -> CardResult<()> {
        if self.current != Some(Stage::CleaningUp) {
            return Err(CardError::contract(format!(
                "slideshow ended during {}",
                self.current.map_or("start", Stage::tag)
            )));
        }
        Ok(())
    }
}

/// Slideshow timing and output size.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideshowOpts {
    /// Output video size.
    pub canvas: Canvas,
    /// Seconds each video frame stays on screen.
    pub screenshot_duration_sec: f64,
    /// Seconds each comment card stays on screen.
    pub comment_duration_sec: f64,
    /// Output frame rate.
    pub fps: u32,
}

impl Default for SlideshowOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::SQUARE_1080,
            screenshot_duration_sec: 3.0,
            comment_duration_sec: 5.0,
            fps: 30,
        }
    }
}

impl SlideshowOpts {
    /// Check durations, frame rate and canvas.
    pub fn validate(&self) -> CardResult<()> {
        for (name, d) in [
            ("screenshot_duration_sec", self.screenshot_duration_sec),
            ("comment_duration_sec", self.comment_duration_sec),
        ] {
            if !d.is_finite() || d <= 0.0 {
                return Err(CardError::invalid_argument(format!(
                    "{name} must be positive and finite, got {d}"
                )));
            }
        }
        if self.fps == 0 {
            return Err(CardError::invalid_argument("fps must be non-zero"));
        }
        let Canvas { width, height } = self.canvas;
        if width == 0 || height == 0 || !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(CardError::invalid_argument(format!(
                "slideshow size must be non-zero and even (yuv420p), got {width}x{height}"
            )));
        }
        Ok(())
    }

    /// On-screen time of an image from `group`.
    pub fn duration_for(&self, group: ImageGroup) -> f64 {
        match group {
            ImageGroup::VideoFrame => self.screenshot_duration_sec,
            ImageGroup::CommentCard => self.comment_duration_sec,
        }
    }

    /// Total video length for slides of `groups`.
    pub fn total_duration(&self, groups: &[ImageGroup]) -> f64 {
        groups.iter().map(|g| self.duration_for(*g)).sum()
    }
}

/// Name of the `index`-th slide image inside the work directory.
pub fn slide_file_name(index: usize) -> String {
    format!("img{index:03}.png")
}

/// Concat-demuxer script showing each slide for its group's duration.
///
/// The last file is listed once more without a duration; the demuxer otherwise drops the final
/// `duration` line.
pub fn concat_manifest(groups: &[ImageGroup], opts: &SlideshowOpts) -> String {
    let mut out = String::new();
    for (i, group) in groups.iter().enumerate() {
        out.push_str(&format!("file '{}'\n", slide_file_name(i)));
        out.push_str(&format!("duration {}\n", opts.duration_for(*group)));
    }
    if let Some(last) = groups.len().checked_sub(1) {
        out.push_str(&format!("file '{}'\n", slide_file_name(last)));
    }
    out
}

/// ffmpeg arguments encoding the concat manifest in the work directory.
pub fn build_command(opts: &SlideshowOpts) -> Vec<String> {
    let Canvas { width, height } = opts.canvas;
    let mut args: Vec<String> = ["-loglevel", "error", "-nostats", "-progress", "pipe:1"]
        .into_iter()
        .map(String::from)
        .collect();
    args.extend(
        [
            "-f".to_owned(),
            "concat".to_owned(),
            "-safe".to_owned(),
            "0".to_owned(),
            "-i".to_owned(),
            MANIFEST_NAME.to_owned(),
            "-vf".to_owned(),
            format!(
                "scale={width}:{height}:force_original_aspect_ratio=decrease,pad={width}:{height}:-1:-1:black"
            ),
            "-c:v".to_owned(),
            "libx264".to_owned(),
            "-r".to_owned(),
            opts.fps.to_string(),
            "-pix_fmt".to_owned(),
            "yuv420p".to_owned(),
            "-y".to_owned(),
            OUTPUT_NAME.to_owned(),
        ],
    );
    args
}

/// Handle to the system ffmpeg, probed once per process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FfmpegRuntime {
    /// First line of `ffmpeg -version`.
    pub version: String,
}

impl FfmpegRuntime {
    /// Shared runtime; the first call probes `ffmpeg -version`, later calls reuse the outcome.
    pub fn acquire() -> CardResult<&'static FfmpegRuntime> {
        static RUNTIME: OnceLock<Result<FfmpegRuntime, String>> = OnceLock::new();
        RUNTIME
            .get_or_init(probe_runtime)
            .as_ref()
            .map_err(|e| CardError::resource_load(e.clone()))
    }
}

#[cfg(feature = "media-ffmpeg")]
fn probe_runtime() -> Result<FfmpegRuntime, String> {
    let out = Command::new("ffmpeg")
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .map_err(|e| format!("ffmpeg is required for slideshows but could not be run: {e}"))?;
    if !out.status.success() {
        return Err(format!("ffmpeg -version exited with status {}", out.status));
    }
    let version = String::from_utf8_lossy(&out.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_owned();
    tracing::debug!(%version, "ffmpeg runtime loaded");
    Ok(FfmpegRuntime { version })
}

#[cfg(not(feature = "media-ffmpeg"))]
fn probe_runtime() -> Result<FfmpegRuntime, String> {
    Err("slideshows require the 'media-ffmpeg' feature".to_owned())
}

struct TempDirGuard(Option<PathBuf>);

impl TempDirGuard {
    fn create() -> CardResult<Self> {
        let path = std::env::temp_dir().join(format!(
            "threadcards_slideshow_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        std::fs::create_dir_all(&path)
            .with_context(|| format!("create work directory '{}'", path.display()))?;
        Ok(Self(Some(path)))
    }

    fn path(&self) -> &Path {
        self.0.as_deref().unwrap_or(Path::new("."))
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_dir_all(path);
        }
    }
}

/// Encode `images` into an MP4 slideshow and return its bytes.
///
/// `on_progress` sees every [`Stage`] in order, each followed by zero or more non-decreasing
/// percentages.
#[tracing::instrument(level = "info", skip_all, fields(slides = images.len()))]
pub fn render_slideshow(
    images: &[NamedImage],
    opts: &SlideshowOpts,
    on_progress: &mut dyn FnMut(Progress),
) -> CardResult<Vec<u8>> {
    if images.is_empty() {
        return Err(CardError::invalid_argument("slideshow needs at least one image"));
    }
    opts.validate()?;
    let mut tracker = StageTracker::new(on_progress);

    tracker.enter(Stage::LoadingCore)?;
    let runtime = FfmpegRuntime::acquire()?;
    tracing::debug!(version = %runtime.version, "using ffmpeg");
    tracker.report(100)?;

    tracker.enter(Stage::WritingAssets)?;
    tracker.report(0)?;
    let work = TempDirGuard::create()?;
    for (i, named) in images.iter().enumerate() {
        let path = work.path().join(slide_file_name(i));
        let png = encode_png(&named.image)?;
        std::fs::write(&path, png).with_context(|| format!("write slide '{}'", path.display()))?;
        tracker.report(percent(i + 1, images.len()))?;
    }
    let groups: Vec<ImageGroup> = images.iter().map(|n| n.group).collect();
    let manifest_path = work.path().join(MANIFEST_NAME);
    std::fs::write(&manifest_path, concat_manifest(&groups, opts))
        .with_context(|| format!("write concat manifest '{}'", manifest_path.display()))?;

    tracker.enter(Stage::BuildingCommand)?;
    let args = build_command(opts);
    tracing::debug!(command = %args.join(" "), "ffmpeg command");

    tracker.enter(Stage::Transcoding)?;
    let total_sec = opts.total_duration(&groups);
    run_ffmpeg(work.path(), &args, total_sec, &mut tracker)?;

    tracker.enter(Stage::ReadingResult)?;
    let output_path = work.path().join(OUTPUT_NAME);
    let bytes = std::fs::read(&output_path)
        .map_err(|e| CardError::encode(format!("read '{}': {e}", output_path.display())))?;

    tracker.enter(Stage::CleaningUp)?;
    drop(work);
    tracker.finish()?;

    tracing::info!(bytes = bytes.len(), seconds = total_sec, "slideshow encoded");
    Ok(bytes)
}

fn run_ffmpeg(
    work_dir: &Path,
    args: &[String],
    total_sec: f64,
    tracker: &mut StageTracker<'_>,
) -> CardResult<()> {
    let mut child = Command::new("ffmpeg")
        .args(args)
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            CardError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| CardError::encode("failed to open ffmpeg stdout (unexpected)"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| CardError::encode("failed to open ffmpeg stderr (unexpected)"))?;
    let stderr_drain = std::thread::spawn(move || {
        let mut stderr_bytes = Vec::new();
        stderr.read_to_end(&mut stderr_bytes)?;
        Ok::<_, std::io::Error>(stderr_bytes)
    });

    let pumped = pump_progress(BufReader::new(stdout), total_sec, tracker);
    let (status, stderr_bytes) = reap_child(child, stderr_drain, pumped.is_err())?;
    pumped?;

    if !status.success() {
        return Err(CardError::encode(format!(
            "ffmpeg exited with status {status}: {}",
            String::from_utf8_lossy(&stderr_bytes).trim()
        )));
    }
    tracker.report(100)
}

fn pump_progress(
    reader: impl BufRead,
    total_sec: f64,
    tracker: &mut StageTracker<'_>,
) -> CardResult<()> {
    for line in reader.lines() {
        let line = line.map_err(|e| CardError::encode(format!("ffmpeg progress read failed: {e}")))?;
        if let Some(secs) = parse_progress_time(&line) {
            let pct = if total_sec > 0.0 {
                ((secs / total_sec) * 100.0).round().clamp(0.0, 100.0) as u8
            } else {
                0
            };
            tracker.report(pct)?;
        }
    }
    Ok(())
}

/// Wait for `child` (killing it first when `kill` is set) and collect its drained stderr.
fn reap_child(
    mut child: Child,
    stderr_drain: JoinHandle<std::io::Result<Vec<u8>>>,
    kill: bool,
) -> CardResult<(ExitStatus, Vec<u8>)> {
    if kill {
        let _ = child.kill();
    }
    let status = child
        .wait()
        .map_err(|e| CardError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
    let stderr_bytes = stderr_drain
        .join()
        .map_err(|_| CardError::encode("ffmpeg stderr drain thread panicked"))?
        .map_err(|e| CardError::encode(format!("ffmpeg stderr read failed: {e}")))?;
    Ok((status, stderr_bytes))
}

/// Encoded time in seconds from one `-progress` line (`out_time_us=` / `out_time_ms=`, both µs).
fn parse_progress_time(line: &str) -> Option<f64> {
    let (key, value) = line.trim().split_once('=')?;
    match key {
        "out_time_us" | "out_time_ms" => {
            let us = value.parse::<i64>().ok()?;
            Some(us.max(0) as f64 / 1_000_000.0)
        }
        _ => None,
    }
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/encode/slideshow.rs"]
mod tests;
