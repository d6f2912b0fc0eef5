use glam::{Vec2, Vec4};

use super::smoothstep;

/// Grid pass background, also the clear color of the 2D scene.
pub const GRID_BACKGROUND: Vec4 = Vec4::new(0.05, 0.05, 0.05, 1.0);
/// Axis line color at full intensity.
pub const GRID_LINE: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);

/// Vertex stage: NDC position of vertex `index` of the single
/// full-viewport triangle (indices 0..3, no vertex buffer).
///
/// Branchless bit derivation; the triangle overshoots the clip square to
/// (-1,-1), (3,-1), (-1,3) so the rasterized area covers it exactly.
///
/// GPU counterpart: `vs_main` in `render/shaders/grid.wgsl`.
#[inline]
pub fn fullscreen_triangle(index: u32) -> Vec2 {
    Vec2::new(
        ((index << 1) & 2) as f32 * 2.0 - 1.0,
        (index & 2) as f32 * 2.0 - 1.0,
    )
}

/// On-axis factor for one world coordinate.
///
/// `derivative` is the screen-space rate of change of that coordinate
/// (`fwidth`), which makes the anti-aliasing band ≈2 pixels wide at every
/// zoom level. Returns 1 exactly on the axis, falling to 0 two pixels out.
#[inline]
pub fn axis_factor(world_coord: f32, derivative: f32) -> f32 {
    1.0 - smoothstep(0.0, 2.0 * derivative, world_coord.abs())
}

/// Fragment stage: grid color for a fragment at `world`, given the
/// per-axis screen-space derivatives of the world coordinate.
///
/// The stronger of the two axis factors selects the line intensity;
/// output blends background toward line color.
///
/// GPU counterpart: `fs_main` in `render/shaders/grid.wgsl`, with
/// `derivative` supplied by `fwidth`.
#[inline]
pub fn grid_fragment(world: Vec2, derivative: Vec2) -> Vec4 {
    let factor = axis_factor(world.x, derivative.x).max(axis_factor(world.y, derivative.y));
    GRID_BACKGROUND.lerp(GRID_LINE, factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── fullscreen triangle ───────────────────────────────────────────────

    #[test]
    fn triangle_covers_clip_square() {
        assert_eq!(fullscreen_triangle(0), Vec2::new(-1.0, -1.0));
        assert_eq!(fullscreen_triangle(1), Vec2::new(3.0, -1.0));
        assert_eq!(fullscreen_triangle(2), Vec2::new(-1.0, 3.0));
    }

    // ── axis factor ───────────────────────────────────────────────────────

    #[test]
    fn on_axis_factor_is_one_for_any_derivative() {
        // The zoom level only changes the derivative; exactly on the axis
        // the line must be at full intensity regardless.
        for derivative in [1e-6, 0.01, 1.0, 1e6] {
            assert_eq!(axis_factor(0.0, derivative), 1.0);
        }
    }

    #[test]
    fn factor_vanishes_two_pixels_out() {
        let d = 0.25;
        assert_eq!(axis_factor(2.0 * d, d), 0.0);
        assert_eq!(axis_factor(-2.0 * d, d), 0.0);
    }

    #[test]
    fn factor_falls_monotonically_off_axis() {
        let d = 0.5;
        let f0 = axis_factor(0.0, d);
        let f1 = axis_factor(0.3 * d, d);
        let f2 = axis_factor(1.2 * d, d);
        assert!(f0 > f1 && f1 > f2);
    }

    // ── fragment blend ────────────────────────────────────────────────────

    #[test]
    fn fragment_on_y_axis_is_full_line_color() {
        let color = grid_fragment(Vec2::new(0.0, 5.3), Vec2::splat(0.01));
        assert!((color - GRID_LINE).abs().max_element() < 1e-6);
    }

    #[test]
    fn fragment_far_from_axes_is_background() {
        let color = grid_fragment(Vec2::new(7.0, -3.0), Vec2::splat(0.01));
        assert_eq!(color, GRID_BACKGROUND);
    }

    #[test]
    fn stronger_axis_wins() {
        let d = Vec2::splat(0.5);
        let near_x_axis = grid_fragment(Vec2::new(9.0, 0.2), d);
        let far = grid_fragment(Vec2::new(9.0, 9.0), d);
        assert!(near_x_axis.x > far.x);
    }
}
