use glam::{Vec2, Vec4};

use super::smoothstep;

/// Vertex stage: quad corner for vertex `index` of an instanced point
/// sprite (triangle strip, indices 0..4).
///
/// Low two bits pick the corner, branchless: bit 0 is the X sign, bit 1
/// the Y sign, giving `(±1, ±1)`. The corner doubles as the fragment's
/// implicit-function coordinate.
///
/// GPU counterpart: `vs_main` in `render/shaders/points.wgsl`
/// (together with [`sprite_vertex`]).
#[inline]
pub fn quad_corner(index: u32) -> Vec2 {
    Vec2::new(
        (index & 1) as f32 * 2.0 - 1.0,
        ((index >> 1) & 1) as f32 * 2.0 - 1.0,
    )
}

/// Vertex stage: clip-space position of one sprite corner.
///
/// `anchor_ndc` is the instance's world center already projected to NDC.
/// The corner offset is added in pixel space — half the style width,
/// converted through `2 / resolution` — so the sprite's on-screen size
/// depends only on `width_px` and the resolution, never on zoom.
#[inline]
pub fn sprite_vertex(anchor_ndc: Vec2, corner: Vec2, width_px: f32, resolution: Vec2) -> Vec2 {
    let half_size = width_px * 0.5 * (2.0 / resolution);
    anchor_ndc + corner * half_size
}

/// Coverage of a sprite fragment at local quad coordinate `local`
/// (`(u, v)` in -1..1).
///
/// `d = u² + v²` is the implicit disc function; coverage ramps from 1
/// inside `d = 0.8` down to 0 at the unit circle. `None` means the
/// fragment is discarded — no output at all, not a transparent write.
///
/// GPU counterpart: `fs_main` in `render/shaders/points.wgsl`, where
/// `None` is the `discard` path.
#[inline]
pub fn sprite_coverage(local: Vec2) -> Option<f32> {
    let d = local.length_squared();
    let alpha = 1.0 - smoothstep(0.8, 1.0, d);
    if alpha <= 0.0 { None } else { Some(alpha) }
}

/// Fragment stage: style color with alpha scaled by disc coverage.
#[inline]
pub fn sprite_fragment(local: Vec2, color: Vec4) -> Option<Vec4> {
    let coverage = sprite_coverage(local)?;
    Some(Vec4::new(color.x, color.y, color.z, color.w * coverage))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── corner derivation ─────────────────────────────────────────────────

    #[test]
    fn corners_form_a_strip_quad() {
        assert_eq!(quad_corner(0), Vec2::new(-1.0, -1.0));
        assert_eq!(quad_corner(1), Vec2::new(1.0, -1.0));
        assert_eq!(quad_corner(2), Vec2::new(-1.0, 1.0));
        assert_eq!(quad_corner(3), Vec2::new(1.0, 1.0));
    }

    // ── pixel sizing ──────────────────────────────────────────────────────

    #[test]
    fn sprite_size_is_zoom_independent() {
        // Zoom moves the anchor, never the corner offset: with a fixed
        // resolution and width the offset from the anchor is constant.
        let resolution = Vec2::new(800.0, 600.0);
        let corner = quad_corner(3);
        let a = sprite_vertex(Vec2::ZERO, corner, 10.0, resolution);
        let b = sprite_vertex(Vec2::new(0.4, -0.2), corner, 10.0, resolution);
        assert_eq!(a - Vec2::ZERO, b - Vec2::new(0.4, -0.2));
    }

    #[test]
    fn pixel_radius_survives_view_zoom_changes() {
        use crate::view::View2d;
        use glam::DVec2;

        // Project the same world sample at two zoom levels; the NDC
        // offset between quad corners (the on-screen radius) must match.
        let resolution = Vec2::new(1024.0, 768.0);
        let world = DVec2::new(2.0, -1.5);
        let radius_at = |zoom: f64| {
            let view = View2d::new(DVec2::ZERO, zoom);
            let anchor = view.world_to_ndc(world, 1024.0 / 768.0).as_vec2();
            let a = sprite_vertex(anchor, quad_corner(0), 8.0, resolution);
            let b = sprite_vertex(anchor, quad_corner(3), 8.0, resolution);
            b - a
        };
        assert_eq!(radius_at(0.25), radius_at(40.0));
    }

    #[test]
    fn sprite_spans_width_pixels() {
        // 10px width on an 800px-wide viewport: the full quad spans
        // 10 * 2/800 NDC units in X.
        let resolution = Vec2::new(800.0, 600.0);
        let left = sprite_vertex(Vec2::ZERO, quad_corner(0), 10.0, resolution);
        let right = sprite_vertex(Vec2::ZERO, quad_corner(1), 10.0, resolution);
        assert!((right.x - left.x - 10.0 * 2.0 / 800.0).abs() < 1e-7);
    }

    // ── coverage ──────────────────────────────────────────────────────────

    #[test]
    fn center_is_fully_covered() {
        assert_eq!(sprite_coverage(Vec2::ZERO), Some(1.0));
    }

    #[test]
    fn unit_circle_and_beyond_discard() {
        assert_eq!(sprite_coverage(Vec2::new(1.0, 0.0)), None);
        assert_eq!(sprite_coverage(Vec2::new(1.0, 1.0)), None);
    }

    #[test]
    fn rim_is_partially_covered() {
        // d = 0.9 sits mid-ramp.
        let local = Vec2::new(0.9f32.sqrt(), 0.0);
        let alpha = sprite_coverage(local).unwrap();
        assert!(alpha > 0.0 && alpha < 1.0);
    }

    #[test]
    fn fragment_scales_alpha_only() {
        let color = Vec4::new(0.2, 0.4, 0.6, 0.8);
        let out = sprite_fragment(Vec2::ZERO, color).unwrap();
        assert_eq!(out, color);

        let rim = Vec2::new(0.95, 0.0);
        if let Some(out) = sprite_fragment(rim, color) {
            assert_eq!(out.truncate(), color.truncate());
            assert!(out.w < color.w);
        }
    }
}
