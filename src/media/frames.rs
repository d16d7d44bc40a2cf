use std::path::{Path, PathBuf};

use crate::foundation::core::{Canvas, RasterImage, Rect};
use crate::foundation::error::{CardError, CardResult};

/// Probed properties of a video file.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSourceInfo {
    /// File the info was probed from.
    pub source_path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Container duration; `0.0` when the container does not report one.
    pub duration_sec: f64,
}

/// Something that can produce still frames of a video.
pub trait VideoFrameSource: Send + Sync {
    /// Probed source properties.
    fn info(&self) -> &VideoSourceInfo;

    /// Frame at `timestamp_sec`, letterboxed onto the source's output canvas.
    ///
    /// Fails with [`CardError::Seek`] when the time is outside the video or no frame exists
    /// there, and with [`CardError::Decode`] when the frame cannot be decoded.
    fn capture_frame(&self, timestamp_sec: f64) -> CardResult<RasterImage>;
}

/// Frame source backed by the `ffprobe`/`ffmpeg` executables.
#[derive(Clone, Debug)]
pub struct FfmpegFrameSource {
    info: VideoSourceInfo,
    canvas: Canvas,
}

impl FfmpegFrameSource {
    /// Probe `path` and prepare to capture frames onto `canvas`.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path, canvas: Canvas) -> CardResult<Self> {
        let info = probe_video(path)?;
        tracing::debug!(
            width = info.width,
            height = info.height,
            duration_sec = info.duration_sec,
            "probed video"
        );
        Ok(Self { info, canvas })
    }

    /// Output canvas of captured frames.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn check_seek(&self, t: f64) -> CardResult<()> {
        let d = self.info.duration_sec;
        if !t.is_finite() || t < 0.0 || (d > 0.0 && t > d) {
            return Err(CardError::seek(format!(
                "timestamp {t}s outside video '{}' (duration {d}s)",
                self.info.source_path.display()
            )));
        }
        Ok(())
    }
}

impl VideoFrameSource for FfmpegFrameSource {
    fn info(&self) -> &VideoSourceInfo {
        &self.info
    }

    fn capture_frame(&self, timestamp_sec: f64) -> CardResult<RasterImage> {
        self.check_seek(timestamp_sec)?;
        let rgba = decode_video_frame_rgba8(&self.info, timestamp_sec)?;
        letterbox(&rgba, self.info.width, self.info.height, self.canvas)
    }
}

/// Where a `src_w`x`src_h` frame lands inside `canvas` when fitted without cropping.
///
/// Sources wider than the canvas span its full width and are centered vertically; others span
/// the full height and are centered horizontally.
pub fn letterbox_rect(src_w: u32, src_h: u32, canvas: Canvas) -> Rect {
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    let ratio = f64::from(src_w) / f64::from(src_h);
    if ratio > canvas.aspect_ratio() {
        let dh = cw / ratio;
        let y = (ch - dh) / 2.0;
        Rect::new(0.0, y, cw, y + dh)
    } else {
        let dw = ch * ratio;
        let x = (cw - dw) / 2.0;
        Rect::new(x, 0.0, x + dw, ch)
    }
}

/// Fit straight-alpha RGBA8 `frame` into `canvas` over opaque black.
pub fn letterbox(frame: &[u8], src_w: u32, src_h: u32, canvas: Canvas) -> CardResult<RasterImage> {
    if src_w == 0 || src_h == 0 {
        return Err(CardError::decode("video frame has zero size"));
    }
    let src = image::RgbaImage::from_raw(src_w, src_h, frame.to_vec()).ok_or_else(|| {
        CardError::decode(format!(
            "video frame buffer has {} bytes, expected {}",
            frame.len(),
            src_w as usize * src_h as usize * 4
        ))
    })?;

    let dst = letterbox_rect(src_w, src_h, canvas);
    let draw_w = (dst.width().round() as u32).max(1);
    let draw_h = (dst.height().round() as u32).max(1);
    let scaled = image::imageops::resize(
        &src,
        draw_w,
        draw_h,
        image::imageops::FilterType::Triangle,
    );

    let mut out =
        image::RgbaImage::from_pixel(canvas.width, canvas.height, image::Rgba([0, 0, 0, 255]));
    image::imageops::overlay(&mut out, &scaled, dst.x0.round() as i64, dst.y0.round() as i64);

    RasterImage::from_rgba8(canvas.width, canvas.height, out.into_raw(), false)
}

#[cfg(feature = "media-ffmpeg")]
fn probe_video(source_path: &Path) -> CardResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| CardError::resource_load(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(CardError::decode(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| CardError::decode(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| CardError::decode("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| CardError::decode("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| CardError::decode("missing video height from ffprobe"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        duration_sec,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
fn probe_video(_source_path: &Path) -> CardResult<VideoSourceInfo> {
    Err(CardError::resource_load(
        "video capture requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
fn decode_video_frame_rgba8(source: &VideoSourceInfo, time_sec: f64) -> CardResult<Vec<u8>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{time_sec:.9}")])
        .arg("-i")
        .arg(&source.source_path)
        .args([
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .output()
        .map_err(|e| CardError::resource_load(format!("failed to run ffmpeg: {e}")))?;

    if !out.status.success() {
        return Err(CardError::decode(format!(
            "ffmpeg frame decode failed for '{}': {}",
            source.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected_len = source.width as usize * source.height as usize * 4;
    if out.stdout.is_empty() {
        return Err(CardError::seek(format!(
            "no frame at {time_sec}s in '{}'",
            source.source_path.display()
        )));
    }
    if out.stdout.len() < expected_len {
        return Err(CardError::decode(format!(
            "decoded frame has {} bytes, expected {expected_len}",
            out.stdout.len()
        )));
    }
    let mut frame = out.stdout;
    frame.truncate(expected_len);
    Ok(frame)
}

#[cfg(not(feature = "media-ffmpeg"))]
fn decode_video_frame_rgba8(_source: &VideoSourceInfo, _time_sec: f64) -> CardResult<Vec<u8>> {
    Err(CardError::resource_load(
        "video capture requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/media/frames.rs"]
mod tests;
