use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::backgrounds::{BackgroundChoice, PALETTE};
use crate::assets::fonts::FontLibrary;
use crate::encode::slideshow::SlideshowOpts;
use crate::foundation::error::{CardError, CardResult};
use crate::media::timestamps::TimestampMode;
use crate::pipeline::{CardOpts, ScreenshotOpts, Threading};
use crate::scene::build::SceneOpts;
use crate::scene::escape::EscapeMode;

/// Default seed for background picks and random capture times.
pub const DEFAULT_SEED: u64 = 0x5EED;

/// Screenshot settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenshotConfig {
    /// How capture times are spread.
    pub mode: TimestampMode,
    /// Frames per video.
    pub count: usize,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            mode: TimestampMode::Uniform,
            count: 5,
        }
    }
}

/// File-level configuration, loaded from JSON. Every field is optional.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThreadcardsConfig {
    /// Markup escaping for user text.
    pub escape: EscapeMode,
    /// Page background selection.
    pub background: BackgroundChoice,
    /// Seed for background picks and random capture times.
    pub seed: u64,
    /// Rasterize pages and capture frames on a worker pool.
    pub parallel: bool,
    /// Worker pool size; must be at least 1 when set.
    pub threads: Option<usize>,
    /// Extra directories scanned for `.ttf`, `.otf` and `.ttc` files.
    pub font_dirs: Vec<PathBuf>,
    /// Screenshot settings.
    pub screenshots: ScreenshotConfig,
    /// Slideshow timing.
    pub slideshow: SlideshowOpts,
}

impl Default for ThreadcardsConfig {
    fn default() -> Self {
        Self {
            escape: EscapeMode::default(),
            background: BackgroundChoice::default(),
            seed: DEFAULT_SEED,
            parallel: true,
            threads: None,
            font_dirs: Vec::new(),
            screenshots: ScreenshotConfig::default(),
            slideshow: SlideshowOpts::default(),
        }
    }
}

impl ThreadcardsConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> CardResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))
            .map_err(|e| CardError::resource_load(format!("{e:#}")))?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| {
            CardError::invalid_argument(format!("invalid config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate JSON config text.
    pub fn from_json_str(text: &str) -> CardResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| CardError::invalid_argument(format!("invalid config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> CardResult<()> {
        if self.threads == Some(0) {
            return Err(CardError::invalid_argument("threads must be >= 1 when set"));
        }
        if let BackgroundChoice::Fixed { index } = self.background
            && index >= PALETTE.len()
        {
            return Err(CardError::invalid_argument(format!(
                "background index {index} out of range (palette has {} entries)",
                PALETTE.len()
            )));
        }
        self.slideshow.validate()
    }

    /// Worker pool settings.
    pub fn threading(&self) -> Threading {
        Threading {
            parallel: self.parallel,
            threads: self.threads,
        }
    }

    /// Options for card generation.
    pub fn card_opts(&self) -> CardOpts {
        CardOpts {
            scene: SceneOpts {
                escape: self.escape,
                ..SceneOpts::default()
            },
            background: self.background.clone(),
            seed: self.seed,
            threading: self.threading(),
        }
    }

    /// Options for screenshot capture.
    pub fn screenshot_opts(&self) -> ScreenshotOpts {
        ScreenshotOpts {
            mode: self.screenshots.mode,
            count: self.screenshots.count,
            seed: self.seed,
            threading: self.threading(),
        }
    }

    /// Font library with system fonts plus `font_dirs`.
    pub fn font_library(&self) -> FontLibrary {
        FontLibrary::new(self.font_dirs.clone())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
