use anyhow::Context;

use crate::assets::fonts::FontLibrary;
use crate::foundation::core::RasterImage;
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decode PNG/JPEG/... bytes into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> CardResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| CardError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);
    RasterImage::from_rgba8(width, height, data, true)
}

/// Parse SVG text with fonts from `fonts`.
pub fn parse_svg(text: &str, fonts: &FontLibrary) -> CardResult<usvg::Tree> {
    let opts = fonts.usvg_options();
    usvg::Tree::from_str(text, &opts)
        .context("parse svg tree")
        .map_err(|e| CardError::decode(format!("{e:#}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
