use bytemuck::{Pod, Zeroable};
use glam::DVec2;

/// 2D view state: a logical focus point plus a zoom factor.
///
/// `zoom` controls the visible world extent: the half-height of the view in
/// world units is `range_y = 2 / zoom`, and the half-width is
/// `range_x = range_y * aspect`. A world point maps to NDC as
/// `(world - center) / range`.
///
/// There is no clamping anywhere in this type. `zoom` near 0 produces an
/// unbounded range; keeping `zoom > 0` and bounded away from 0 is the
/// caller's responsibility.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct View2d {
    pub center: DVec2,
    pub zoom: f64,
}

impl Default for View2d {
    fn default() -> Self {
        Self { center: DVec2::ZERO, zoom: 1.0 }
    }
}

impl View2d {
    #[inline]
    pub const fn new(center: DVec2, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Half-extent of the visible world region, per axis.
    #[inline]
    pub fn range(self, aspect: f64) -> DVec2 {
        let range_y = 2.0 / self.zoom;
        DVec2::new(range_y * aspect, range_y)
    }

    /// Maps a world-space point to NDC (`-1..1` covers the viewport).
    #[inline]
    pub fn world_to_ndc(self, world: DVec2, aspect: f64) -> DVec2 {
        (world - self.center) / self.range(aspect)
    }

    /// Maps an NDC point back to world space.
    ///
    /// Exact algebraic inverse of [`world_to_ndc`](Self::world_to_ndc);
    /// the grid vertex stage relies on this to hand each fragment its
    /// world coordinate.
    #[inline]
    pub fn ndc_to_world(self, ndc: DVec2, aspect: f64) -> DVec2 {
        self.center + ndc * self.range(aspect)
    }

    /// Builds the per-frame uniform block for a viewport of
    /// `resolution` physical pixels.
    pub fn uniforms(self, resolution: (u32, u32)) -> ViewUniforms {
        let (w, h) = resolution;
        ViewUniforms {
            center: [self.center.x as f32, self.center.y as f32],
            zoom: self.zoom as f32,
            aspect: w as f32 / h as f32,
            resolution: [w as f32, h as f32],
            _pad: [0.0; 2],
        }
    }
}

/// Per-frame 2D view uniform block.
///
/// Layout is fixed: center (8B), zoom (4B), aspect (4B), resolution (8B),
/// pad (8B) — 32 bytes total. Shared by the grid, point and 2D mesh
/// shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ViewUniforms {
    pub center: [f32; 2],
    pub zoom: f32,
    pub aspect: f32,
    pub resolution: [f32; 2],
    pub _pad: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn assert_close(a: DVec2, b: DVec2) {
        // Relative tolerance: large centers magnify round-trip rounding.
        let scale = 1.0 + a.length().max(b.length());
        assert!((a - b).length() < EPS * scale, "{a:?} != {b:?}");
    }

    // ── world_to_ndc ──────────────────────────────────────────────────────

    #[test]
    fn unit_view_maps_origin_to_origin() {
        let view = View2d::default();
        assert_eq!(view.world_to_ndc(DVec2::ZERO, 1.0), DVec2::ZERO);
    }

    #[test]
    fn unit_view_maps_unit_x_to_half_ndc() {
        // zoom = 1, aspect = 1 → range = (2, 2), so world (1, 0) lands at
        // NDC (0.5, 0).
        let view = View2d::default();
        assert_eq!(view.world_to_ndc(DVec2::new(1.0, 0.0), 1.0), DVec2::new(0.5, 0.0));
    }

    #[test]
    fn aspect_scales_x_only() {
        let view = View2d::default();
        let ndc = view.world_to_ndc(DVec2::new(1.0, 1.0), 2.0);
        assert_eq!(ndc, DVec2::new(0.25, 0.5));
    }

    #[test]
    fn center_offsets_world() {
        let view = View2d::new(DVec2::new(3.0, -2.0), 1.0);
        assert_eq!(view.world_to_ndc(DVec2::new(3.0, -2.0), 1.0), DVec2::ZERO);
    }

    // ── round trip ────────────────────────────────────────────────────────

    #[test]
    fn ndc_to_world_is_exact_inverse() {
        let views = [
            View2d::new(DVec2::new(0.0, 0.0), 1.0),
            View2d::new(DVec2::new(12.5, -7.25), 0.001),
            View2d::new(DVec2::new(-1e6, 3.0), 250.0),
        ];
        let points = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, -1.0),
            DVec2::new(-41.7, 12.3),
        ];
        for view in views {
            for world in points {
                for aspect in [0.5, 1.0, 1.7778] {
                    let ndc = view.world_to_ndc(world, aspect);
                    assert_close(view.ndc_to_world(ndc, aspect), world);
                }
            }
        }
    }

    // ── uniform block ─────────────────────────────────────────────────────

    #[test]
    fn uniform_block_is_32_bytes() {
        assert_eq!(std::mem::size_of::<ViewUniforms>(), 32);
    }

    #[test]
    fn uniforms_derive_aspect_from_resolution() {
        let view = View2d::new(DVec2::new(1.0, 2.0), 4.0);
        let u = view.uniforms((1920, 1080));
        assert_eq!(u.center, [1.0, 2.0]);
        assert_eq!(u.zoom, 4.0);
        assert_eq!(u.aspect, 1920.0 / 1080.0);
        assert_eq!(u.resolution, [1920.0, 1080.0]);
    }
}
