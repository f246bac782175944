//! Pan/zoom viewport transform.
//!
//! Maintains scale and translation such that `screen = world * scale + (tx, ty)`,
//! with the screen-to-world and world-to-screen conversions exact affine
//! inverses of each other. The zoom math is extracted here for testability.

use crate::constants::zoom;
use crate::geometry::Point;

/// Pan/zoom transform state.
///
/// Invariant: `min_scale <= scale <= max_scale` after every mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Viewport {
    /// Create a viewport with the given zoom limits, at identity.
    pub fn new(min_scale: f64, max_scale: f64) -> Self {
        Self {
            scale: 1.0f64.clamp(min_scale, max_scale),
            tx: 0.0,
            ty: 0.0,
            min_scale,
            max_scale,
        }
    }

    /// Convert a world (image-pixel) point to screen coordinates.
    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.tx, p.y * self.scale + self.ty)
    }

    /// Convert a screen point to world (image-pixel) coordinates.
    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.tx) / self.scale, (p.y - self.ty) / self.scale)
    }

    /// Zoom by `factor`, keeping the world point under `anchor` (screen
    /// space) fixed.
    ///
    /// The scale is clamped to `[min_scale, max_scale]` first and the
    /// anchoring is computed with the post-clamp scale, so the pointer
    /// stays anchored even when the requested factor runs past a limit.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let new_scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        let world = self.screen_to_world(anchor);
        self.scale = new_scale;
        self.tx = anchor.x - world.x * new_scale;
        self.ty = anchor.y - world.y * new_scale;
        log::debug!(
            "🔍 Zoom-to-cursor: {:.3}x at ({:.1}, {:.1})",
            self.scale,
            anchor.x,
            anchor.y
        );
    }

    /// Fit the image inside the viewport with a margin and center it.
    ///
    /// Deterministic given the two sizes.
    pub fn fit_to_viewport(&mut self, viewport_w: f64, viewport_h: f64, image_w: u32, image_h: u32) {
        if image_w == 0 || image_h == 0 || viewport_w <= 0.0 || viewport_h <= 0.0 {
            return;
        }
        let iw = f64::from(image_w);
        let ih = f64::from(image_h);
        let fit = (viewport_w * zoom::FIT_MARGIN / iw).min(viewport_h * zoom::FIT_MARGIN / ih);
        self.scale = fit.clamp(self.min_scale, self.max_scale);
        self.tx = (viewport_w - iw * self.scale) / 2.0;
        self.ty = (viewport_h - ih * self.scale) / 2.0;
        log::debug!("🔄 Fit {}x{} image at {:.3}x", image_w, image_h, self.scale);
    }

    /// Apply a screen-space pan delta. Intentionally unclamped; the image
    /// may be panned fully off-screen.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.tx += dx;
        self.ty += dy;
    }

    /// Reset the translation, keeping the current scale.
    pub fn reset_pan(&mut self) {
        self.tx = 0.0;
        self.ty = 0.0;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(zoom::MIN, zoom::MAX)
    }
}
