use std::sync::Arc;

use resvg::tiny_skia;

use crate::assets::backgrounds::Background;
use crate::assets::decode::{decode_image, parse_svg};
use crate::assets::fonts::{FontLibrary, shared_fonts};
use crate::foundation::core::{Canvas, RasterImage};
use crate::foundation::error::{CardError, CardResult};
use crate::raster::Rasterizer;
use crate::scene::model::Scene;

/// CPU rasterizer built on `resvg`/`tiny-skia`.
#[derive(Clone, Debug)]
pub struct ResvgRasterizer {
    fonts: Arc<FontLibrary>,
}

impl ResvgRasterizer {
    /// Rasterizer using `fonts` for all text.
    pub fn new(fonts: Arc<FontLibrary>) -> Self {
        Self { fonts }
    }

    /// Font library in use.
    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    #[tracing::instrument(level = "trace", skip_all)]
    fn paint_background(
        &self,
        pixmap: &mut tiny_skia::Pixmap,
        background: &Background,
    ) -> CardResult<()> {
        let canvas = Canvas {
            width: pixmap.width(),
            height: pixmap.height(),
        };
        match background {
            Background::Solid([r, g, b, a]) => {
                pixmap.fill(tiny_skia::Color::from_rgba8(*r, *g, *b, *a));
            }
            Background::Svg(text) => {
                let tree = parse_svg(text, &self.fonts)?;
                let size = tree.size();
                let xform = tiny_skia::Transform::from_scale(
                    canvas.width as f32 / size.width(),
                    canvas.height as f32 / size.height(),
                );
                resvg::render(&tree, xform, &mut pixmap.as_mut());
            }
            Background::Encoded(bytes) => {
                let img = decode_image(bytes)?;
                let size = tiny_skia::IntSize::from_wh(img.width, img.height)
                    .ok_or_else(|| CardError::decode("background image has zero size"))?;
                let src = tiny_skia::Pixmap::from_vec(img.data, size)
                    .ok_or_else(|| CardError::decode("background image buffer mismatch"))?;
                let xform = tiny_skia::Transform::from_scale(
                    canvas.width as f32 / size.width() as f32,
                    canvas.height as f32 / size.height() as f32,
                );
                let paint = tiny_skia::PixmapPaint {
                    quality: tiny_skia::FilterQuality::Bicubic,
                    ..Default::default()
                };
                pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, xform, None);
            }
        }
        Ok(())
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new(shared_fonts())
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, scene: &Scene, background: &Background) -> CardResult<RasterImage> {
        let Canvas { width, height } = scene.canvas;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| CardError::contract(format!("cannot allocate {width}x{height} pixmap")))?;

        self.paint_background(&mut pixmap, background)
            .map_err(|e| CardError::resource_load(format!("background: {e}")))?;

        let tree = parse_svg(&scene.to_svg(), &self.fonts)
            .map_err(|e| CardError::decode(format!("scene: {e}")))?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        RasterImage::from_rgba8(width, height, pixmap.take(), true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/cpu.rs"]
mod tests;
