use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::png::write_png;
use crate::foundation::core::RasterImage;
use crate::foundation::error::CardResult;

/// Which producer an output image came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageGroup {
    /// A rendered comment page.
    CommentCard,
    /// A still captured from a video.
    VideoFrame,
}

/// An output image with its display caption.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedImage {
    /// Human-readable caption.
    pub caption: String,
    /// Producer of the image.
    pub group: ImageGroup,
    /// Pixels.
    pub image: RasterImage,
}

/// One entry of `manifest.json`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ManifestEntry {
    /// File name relative to the output directory.
    pub file: String,
    /// Caption of the image.
    pub caption: String,
    /// Producer of the image.
    pub group: ImageGroup,
}

/// Contents of `manifest.json`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Manifest {
    /// Batch title.
    pub title: String,
    /// Images in output order.
    pub images: Vec<ManifestEntry>,
}

/// Caption of comment page `index` (0-based) holding `comment_count` comments.
pub fn comment_card_caption(index: usize, comment_count: usize) -> String {
    format!("Comment card {} ({comment_count} comments)", index + 1)
}

/// Caption of video frame `index` (0-based).
pub fn video_frame_caption(index: usize) -> String {
    format!("Video frame {}", index + 1)
}

/// Title of a batch of `count` comment cards.
pub fn comment_batch_title(count: usize) -> String {
    format!("Comment cards ({count} images)")
}

/// File name of the `index`-th (0-based) image in an output directory.
pub fn image_file_name(index: usize) -> String {
    format!("image_{}.png", index + 1)
}

/// Write `images` as `image_1.png`, `image_2.png`, ... plus `manifest.json` into `dir`.
///
/// Returns the written image paths in order.
#[tracing::instrument(level = "debug", skip(images), fields(count = images.len()))]
pub fn write_batch(dir: &Path, title: &str, images: &[NamedImage]) -> CardResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;

    let mut paths = Vec::with_capacity(images.len());
    let mut entries = Vec::with_capacity(images.len());
    for (i, named) in images.iter().enumerate() {
        let file = image_file_name(i);
        let path = dir.join(&file);
        write_png(&named.image, &path)?;
        entries.push(ManifestEntry {
            file,
            caption: named.caption.clone(),
            group: named.group,
        });
        paths.push(path);
    }

    let manifest = Manifest {
        title: title.to_owned(),
        images: entries,
    };
    let json = serde_json::to_string_pretty(&manifest).context("serialize manifest")?;
    let manifest_path = dir.join("manifest.json");
    std::fs::write(&manifest_path, json)
        .with_context(|| format!("write manifest '{}'", manifest_path.display()))?;

    tracing::info!(dir = %dir.display(), images = paths.len(), "wrote image batch");
    Ok(paths)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/archive.rs"]
mod tests;
