use rayon::prelude::*;

use crate::assets::backgrounds::{BackgroundChoice, BackgroundPlan};
use crate::comments::model::Comment;
use crate::comments::parse::parse_comments;
use crate::encode::archive::{
    ImageGroup, NamedImage, comment_batch_title, comment_card_caption, video_frame_caption,
};
use crate::foundation::core::RasterImage;
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::Rng64;
use crate::layout::engine::{LayoutParams, layout_comments};
use crate::layout::paginate::{Page, paginate};
use crate::media::frames::VideoFrameSource;
use crate::media::timestamps::{TimestampMode, generate_timestamps};
use crate::raster::Rasterizer;
use crate::scene::build::{SceneOpts, render_page_with};
use crate::scene::model::Scene;

/// Worker pool settings for per-page and per-frame work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Threading {
    /// Run items on a rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Pool size; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for Threading {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// Options for [`generate_cards`].
#[derive(Clone, Debug, Default)]
pub struct CardOpts {
    /// Canvas, escaping and layout metrics.
    pub scene: SceneOpts,
    /// How page backgrounds are chosen.
    pub background: BackgroundChoice,
    /// Seed for background picks.
    pub seed: u64,
    /// Worker pool settings.
    pub threading: Threading,
}

/// Options for [`capture_screenshots`].
#[derive(Clone, Debug, Default)]
pub struct ScreenshotOpts {
    /// How capture times are spread.
    pub mode: TimestampMode,
    /// Number of frames to capture.
    pub count: usize,
    /// Seed for random capture times.
    pub seed: u64,
    /// Worker pool settings.
    pub threading: Threading,
}

/// A page or frame that could not be produced.
#[derive(Debug, thiserror::Error)]
#[error("{label}: {error}")]
pub struct PageFailure {
    /// 0-based position in the batch.
    pub index: usize,
    /// Human-readable name, e.g. `comment card 3`.
    pub label: String,
    /// Underlying cause.
    #[source]
    pub error: CardError,
}

/// Output of a batch run: the images that succeeded, in order, and the ones that did not.
#[derive(Debug)]
pub struct CardBatch {
    /// Batch title.
    pub title: String,
    /// Successful images in original page/frame order.
    pub images: Vec<NamedImage>,
    /// Failed items in original order.
    pub failures: Vec<PageFailure>,
}

/// Parse, lay out and paginate a comment thread.
///
/// Fails with [`CardError::Parse`] on malformed input and [`CardError::InvalidArgument`] when the
/// input holds no comments.
#[tracing::instrument(level = "debug", skip_all, fields(input_len = json_text.len()))]
pub fn prepare_pages(json_text: &str, params: &LayoutParams) -> CardResult<Vec<Page>> {
    let comments = parse_comments(json_text)?;
    layout_pages(comments, params)
}

/// Lay out and paginate already-parsed comments.
pub fn layout_pages(comments: Vec<Comment>, params: &LayoutParams) -> CardResult<Vec<Page>> {
    if comments.is_empty() {
        return Err(CardError::invalid_argument("no comments found"));
    }
    let count = comments.len();
    let pages = paginate(layout_comments(comments, params)?);
    for (i, page) in pages.iter().enumerate() {
        tracing::debug!(
            page = i + 1,
            comments = page.len(),
            height = page.height(),
            oversized = page.is_oversized(),
            "paginated"
        );
    }
    tracing::debug!(comments = count, pages = pages.len(), "layout done");
    Ok(pages)
}

/// Build one scene per page.
pub fn render_scenes(pages: &[Page], opts: &SceneOpts) -> Vec<Scene> {
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let scene = render_page_with(page, opts);
            tracing::trace!(page = i + 1, fingerprint = scene.fingerprint(), "scene built");
            scene
        })
        .collect()
}

/// Turn a comment thread into captioned card images.
///
/// Pages are rasterized independently and returned in page order. A failing page is recorded in
/// [`CardBatch::failures`]; the call fails with [`CardError::Batch`] only when no page succeeds.
#[tracing::instrument(level = "info", skip_all)]
pub fn generate_cards(
    json_text: &str,
    rasterizer: &dyn Rasterizer,
    opts: &CardOpts,
) -> CardResult<CardBatch> {
    let pages = prepare_pages(json_text, &opts.scene.params)?;
    let scenes = render_scenes(&pages, &opts.scene);
    let backgrounds = BackgroundPlan::resolve(&opts.background, opts.scene.canvas, opts.seed)?;

    let results = run_indexed(scenes.len(), &opts.threading, |i| {
        let scene = &scenes[i];
        tracing::debug!(page = i + 1, fingerprint = scene.fingerprint(), "rasterizing");
        rasterizer.rasterize(scene, &backgrounds.for_page(i))
    })?;

    let (images, failures) = gather(
        results,
        |i| format!("comment card {}", i + 1),
        |i, image| NamedImage {
            caption: comment_card_caption(i, pages[i].len()),
            group: ImageGroup::CommentCard,
            image,
        },
    )?;
    let title = comment_batch_title(images.len());
    tracing::info!(
        pages = pages.len(),
        images = images.len(),
        failed = failures.len(),
        %title,
        "cards generated"
    );
    Ok(CardBatch {
        title,
        images,
        failures,
    })
}

/// Capture `opts.count` stills from `source` at generated timestamps.
///
/// Frames are returned in timestamp order. Failures are handled as in [`generate_cards`].
#[tracing::instrument(level = "info", skip_all, fields(count = opts.count))]
pub fn capture_screenshots(
    source: &dyn VideoFrameSource,
    opts: &ScreenshotOpts,
) -> CardResult<CardBatch> {
    let mut rng = Rng64::new(opts.seed);
    let timestamps = generate_timestamps(
        opts.mode,
        opts.count,
        source.info().duration_sec,
        &mut rng,
    )?;

    let results = run_indexed(timestamps.len(), &opts.threading, |i| {
        tracing::debug!(frame = i + 1, t = timestamps[i], "capturing");
        source.capture_frame(timestamps[i])
    })?;

    let (images, failures) = gather(
        results,
        |i| format!("video frame {}", i + 1),
        |i, image| NamedImage {
            caption: video_frame_caption(i),
            group: ImageGroup::VideoFrame,
            image,
        },
    )?;
    let title = format!("Video frames ({} images)", images.len());
    tracing::info!(images = images.len(), failed = failures.len(), "frames captured");
    Ok(CardBatch {
        title,
        images,
        failures,
    })
}

/// Run `f(0..count)` sequentially or on a pool; results come back in index order.
fn run_indexed<T, F>(count: usize, threading: &Threading, f: F) -> CardResult<Vec<CardResult<T>>>
where
    T: Send,
    F: Fn(usize) -> CardResult<T> + Send + Sync,
{
    if !threading.parallel || count <= 1 {
        return Ok((0..count).map(f).collect());
    }
    let pool = build_thread_pool(threading.threads)?;
    Ok(pool.install(|| (0..count).into_par_iter().map(f).collect()))
}

fn gather(
    results: Vec<CardResult<RasterImage>>,
    label: impl Fn(usize) -> String,
    named: impl Fn(usize, RasterImage) -> NamedImage,
) -> CardResult<(Vec<NamedImage>, Vec<PageFailure>)> {
    let total = results.len();
    let mut images = Vec::with_capacity(total);
    let mut failures = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(image) => images.push(named(index, image)),
            Err(error) => {
                let failure = PageFailure {
                    index,
                    label: label(index),
                    error,
                };
                tracing::warn!(%failure, "item failed");
                failures.push(failure);
            }
        }
    }

    if total > 0 && images.is_empty() {
        let detail = failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(CardError::batch(format!("all {total} items failed: {detail}")));
    }
    Ok((images, failures))
}

fn build_thread_pool(threads: Option<usize>) -> CardResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CardError::invalid_argument(
            "threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CardError::contract(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
