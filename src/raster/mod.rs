use crate::assets::backgrounds::Background;
use crate::foundation::core::RasterImage;
use crate::foundation::error::CardResult;
use crate::scene::model::Scene;

pub(crate) mod cpu;

/// Turns a scene plus its background into pixels.
///
/// Implementations are called from worker threads, one page per call. A failure to load or decode
/// `background` must be reported as [`CardError::ResourceLoad`](crate::CardError::ResourceLoad);
/// a scene that cannot be parsed as [`CardError::Decode`](crate::CardError::Decode).
pub trait Rasterizer: Send + Sync {
    /// Draw `background` scaled to the full canvas, then `scene` on top of it.
    fn rasterize(&self, scene: &Scene, background: &Background) -> CardResult<RasterImage>;
}
