use crate::foundation::error::{CardError, CardResult};

pub use kurbo::{Point, Rect, Vec2};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The fixed square canvas every card and video frame is produced at.
    pub const SQUARE_1080: Canvas = Canvas {
        width: 1080,
        height: 1080,
    };

    /// Create a validated canvas.
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardError::invalid_argument(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    /// Number of bytes needed for a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Width / height.
    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::SQUARE_1080
    }
}

/// A raster image as RGBA8 pixels.
///
/// Rasterizers produce **premultiplied** pixels; frames decoded from video are opaque, where
/// premultiplied and straight alpha coincide. The flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl RasterImage {
    /// Wrap an RGBA8 buffer, checking that its length matches the dimensions.
    pub fn from_rgba8(
        width: u32,
        height: u32,
        data: Vec<u8>,
        premultiplied: bool,
    ) -> CardResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CardError::decode(format!(
                "rgba8 buffer size mismatch: got {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied,
        })
    }

    /// Canvas matching this image's dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Read one pixel (as stored) at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(off..off + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
