use std::borrow::Cow;
use std::path::Path;

use anyhow::Context as _;
use image::ImageEncoder as _;

use crate::foundation::core::RasterImage;
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

/// Encode as an RGBA PNG with straight alpha.
pub fn encode_png(img: &RasterImage) -> CardResult<Vec<u8>> {
    let data: Cow<'_, [u8]> = if img.premultiplied {
        let mut straight = img.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        Cow::Owned(straight)
    } else {
        Cow::Borrowed(&img.data)
    };

    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(&data, img.width, img.height, image::ExtendedColorType::Rgba8)
        .map_err(|e| CardError::encode(format!("png encode failed: {e}")))?;
    Ok(out)
}

/// Encode and write to `path`, creating parent directories.
pub fn write_png(img: &RasterImage, path: &Path) -> CardResult<()> {
    let bytes = encode_png(img)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
