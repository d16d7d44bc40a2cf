//! Threadcards turns comment threads into paginated, social-media-style card images.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: JSON text -> [`Comment`]s (array, or object with a `comments` array)
//! 2. **Lay out**: each comment is wrapped and measured ([`LayoutInfo`])
//! 3. **Paginate**: comments are packed greedily into pages no taller than [`MAX_PAGE_HEIGHT`]
//! 4. **Build scenes**: every page becomes a resolution-independent [`Scene`] on a 1080x1080 canvas
//! 5. **Rasterize**: a [`Rasterizer`] draws a page background plus the scene ([`ResvgRasterizer`])
//! 6. **Package** (optional): images are written as PNGs with a manifest, or joined into an MP4
//!    slideshow through the system `ffmpeg`
//!
//! Video stills for the same slideshow come from a [`VideoFrameSource`] sampled at
//! [`generate_timestamps`].
//!
//! Steps 1-4 are pure and deterministic: equal input and options give byte-identical scenes.
//! Rasterization and frame capture run one task per page/frame on a rayon pool and are gathered
//! in page order.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod comments;
mod config;
mod encode;
mod foundation;
mod layout;
mod media;
mod pipeline;
mod raster;
mod scene;

pub use assets::backgrounds::{Backdrop, Background, BackgroundChoice, BackgroundPlan, PALETTE};
pub use assets::decode::{decode_image, parse_svg};
pub use assets::fonts::{FontLibrary, shared_fonts};
pub use comments::model::{Comment, Reply, UNKNOWN_USER};
pub use comments::parse::parse_comments;
pub use config::{DEFAULT_SEED, ScreenshotConfig, ThreadcardsConfig};
pub use encode::archive::{
    ImageGroup, Manifest, ManifestEntry, NamedImage, comment_batch_title, comment_card_caption,
    image_file_name, video_frame_caption, write_batch,
};
pub use encode::png::{encode_png, write_png};
pub use encode::slideshow::{
    FfmpegRuntime, Progress, SlideshowOpts, Stage, StageTracker, build_command, concat_manifest,
    render_slideshow, slide_file_name,
};
pub use foundation::core::{Canvas, Point, RasterImage, Rect, Vec2};
pub use foundation::error::{CardError, CardResult};
pub use foundation::math::{Rng64, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
pub use layout::engine::{
    LaidOutComment, LayoutInfo, LayoutParams, ReplyLayout, compute_layout, compute_layout_with,
    layout_comments,
};
pub use layout::paginate::{MAX_PAGE_HEIGHT, Page, paginate, paginate_with_limit};
pub use layout::wrap::wrap_text;
pub use media::frames::{
    FfmpegFrameSource, VideoFrameSource, VideoSourceInfo, letterbox, letterbox_rect,
};
pub use media::timestamps::{TimestampMode, generate_timestamps};
pub use pipeline::{
    CardBatch, CardOpts, PageFailure, ScreenshotOpts, Threading, capture_screenshots,
    generate_cards, layout_pages, prepare_pages, render_scenes,
};
pub use raster::Rasterizer;
pub use raster::cpu::ResvgRasterizer;
pub use scene::build::{SceneOpts, render_page, render_page_with};
pub use scene::escape::{EscapeMode, escape_markup};
pub use scene::model::{
    Icon, Node, Scene, Span, StyleClass, TextAnchor, TextContent, TextRun,
};
