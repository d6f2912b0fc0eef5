//! Pure vertex/fragment stage functions.
//!
//! Every GPU stage under `render/shaders/` has a CPU mirror here: a total
//! function of its inputs with no retained state, evaluated the same way
//! the WGSL evaluates it. These functions are the reference for the
//! rendering math and carry the unit tests; the shaders are line-for-line
//! the same expressions.
//!
//! A fragment that produces no output (discard) is expressed as `None`.

mod grid;
mod phong;
mod sprite;

pub use grid::{GRID_BACKGROUND, GRID_LINE, axis_factor, fullscreen_triangle, grid_fragment};
pub use phong::{AMBIENT, LIGHT_COLOR, LIGHT_POS, SHININESS, SPECULAR_STRENGTH, shade};
pub use sprite::{quad_corner, sprite_coverage, sprite_fragment, sprite_vertex};

/// `smoothstep` as WGSL defines it for ascending edges.
///
/// Descending edges are left indeterminate by the WGSL spec, so callers
/// here always pass `edge0 < edge1` and invert the result when a falling
/// ramp is wanted.
#[inline]
pub(crate) fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::smoothstep;

    #[test]
    fn smoothstep_clamps_outside_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    }

    #[test]
    fn smoothstep_midpoint_is_half() {
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    }
}
