use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::Rng64;

/// A built-in page backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backdrop {
    /// Top-left to bottom-right linear gradient.
    Gradient {
        /// Start color (RGB).
        from: [u8; 3],
        /// End color (RGB).
        to: [u8; 3],
    },
    /// Flat color (RGB).
    Solid([u8; 3]),
}

/// The built-in palette: rose, sky and mint gradients, then amber and lavender solids.
pub const PALETTE: [Backdrop; 5] = [
    Backdrop::Gradient {
        from: [0xff, 0xf1, 0xf2],
        to: [0xff, 0xe4, 0xe6],
    },
    Backdrop::Gradient {
        from: [0xef, 0xf6, 0xff],
        to: [0xf0, 0xfd, 0xff],
    },
    Backdrop::Gradient {
        from: [0xf0, 0xff, 0xf4],
        to: [0xf0, 0xfd, 0xfa],
    },
    Backdrop::Solid([0xff, 0xfb, 0xeb]),
    Backdrop::Solid([0xfb, 0xf5, 0xff]),
];

impl Backdrop {
    /// Render as a standalone SVG document covering `canvas`.
    pub fn to_svg(self, canvas: Canvas) -> String {
        let (w, h) = (canvas.width, canvas.height);
        match self {
            Backdrop::Gradient { from, to } => format!(
                r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs><linearGradient id="g" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" stop-color="{}"/><stop offset="100%" stop-color="{}"/></linearGradient></defs><rect width="{w}" height="{h}" fill="url(#g)"/></svg>"##,
                hex(from),
                hex(to)
            ),
            Backdrop::Solid(rgb) => format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="{w}" height="{h}" fill="{}"/></svg>"#,
                hex(rgb)
            ),
        }
    }
}

fn hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Background resource handed to a rasterizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Background {
    /// SVG document text, scaled to cover the canvas.
    Svg(Arc<str>),
    /// Encoded raster bytes (PNG, JPEG, ...), scaled to cover the canvas.
    Encoded(Arc<[u8]>),
    /// Flat RGBA8 color (straight alpha).
    Solid([u8; 4]),
}

/// How page backgrounds are chosen.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BackgroundChoice {
    /// A palette entry per page, picked from `(seed, page index)`.
    #[default]
    Random,
    /// The same palette entry for every page.
    Fixed {
        /// Palette index.
        index: usize,
    },
    /// A flat color for every page.
    Solid {
        /// RGBA8, straight alpha.
        rgba: [u8; 4],
    },
    /// An image or SVG file for every page.
    File {
        /// Path to the file; `.svg` files are parsed as SVG.
        path: PathBuf,
    },
}

/// A [`BackgroundChoice`] with any file already loaded, ready to hand out per-page backgrounds.
#[derive(Clone, Debug)]
pub struct BackgroundPlan {
    kind: PlanKind,
    canvas: Canvas,
    seed: u64,
}

#[derive(Clone, Debug)]
enum PlanKind {
    Palette(Vec<Arc<str>>),
    Fixed(Background),
}

impl BackgroundPlan {
    /// Resolve `choice` for `canvas`, reading files up front.
    pub fn resolve(choice: &BackgroundChoice, canvas: Canvas, seed: u64) -> CardResult<Self> {
        let palette_svg = |b: Backdrop| -> Arc<str> { Arc::from(b.to_svg(canvas)) };
        let kind = match choice {
            BackgroundChoice::Random => {
                PlanKind::Palette(PALETTE.iter().map(|b| palette_svg(*b)).collect())
            }
            BackgroundChoice::Fixed { index } => {
                let backdrop = PALETTE.get(*index).ok_or_else(|| {
                    CardError::invalid_argument(format!(
                        "background index {index} out of range (palette has {} entries)",
                        PALETTE.len()
                    ))
                })?;
                PlanKind::Fixed(Background::Svg(palette_svg(*backdrop)))
            }
            BackgroundChoice::Solid { rgba } => PlanKind::Fixed(Background::Solid(*rgba)),
            BackgroundChoice::File { path } => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read background '{}'", path.display()))
                    .map_err(|e| CardError::resource_load(format!("{e:#}")))?;
                let is_svg = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
                let bg = if is_svg {
                    let text = String::from_utf8(bytes).map_err(|_| {
                        CardError::resource_load(format!(
                            "background '{}' is not valid UTF-8 SVG",
                            path.display()
                        ))
                    })?;
                    Background::Svg(Arc::from(text))
                } else {
                    Background::Encoded(Arc::from(bytes))
                };
                PlanKind::Fixed(bg)
            }
        };
        Ok(Self { kind, canvas, seed })
    }

    /// Canvas the palette backgrounds were generated for.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Background of page `page_index`. Depends only on the seed and the index.
    pub fn for_page(&self, page_index: usize) -> Background {
        match &self.kind {
            PlanKind::Palette(svgs) => {
                let mut rng = Rng64::for_stream(self.seed, page_index as u64);
                Background::Svg(svgs[rng.next_index(svgs.len())].clone())
            }
            PlanKind::Fixed(bg) => bg.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/backgrounds.rs"]
mod tests;
