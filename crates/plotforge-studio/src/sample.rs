//! CPU-side geometry producers for the demo scenes.
//!
//! The engine takes finished vertex lists only; turning functions into
//! point samples or curve ribbons is the host's job, done here.

use glam::DVec2;
use rayon::prelude::*;

use plotforge_engine::geometry::{MeshVertex2, PointInstance};
use plotforge_engine::view::View2d;

/// Samples per horizontal pixel for explicit curves.
const SAMPLING_DENSITY: f64 = 1.0;
/// An explicit curve breaks where one sample step jumps more than this
/// many view heights in Y. Filters asymptotes (tan, 1/x) without cutting
/// merely steep functions.
const ASYMPTOTE_THRESHOLD_FACTOR: f64 = 10.0;

/// Samples an implicit function `f(x, y) = 0` over a cell grid and emits
/// a point instance at the center of every cell whose corners disagree in
/// sign (the zero set crosses the cell).
pub fn implicit_samples<F>(
    f: F,
    x_range: (f64, f64),
    y_range: (f64, f64),
    nx: u32,
    ny: u32,
) -> Vec<PointInstance>
where
    F: Fn(f64, f64) -> f64,
{
    let mut out = Vec::new();
    let dx = (x_range.1 - x_range.0) / nx as f64;
    let dy = (y_range.1 - y_range.0) / ny as f64;

    for i in 0..nx {
        for j in 0..ny {
            let x0 = x_range.0 + i as f64 * dx;
            let y0 = y_range.0 + j as f64 * dy;
            let corners = [
                f(x0, y0),
                f(x0 + dx, y0),
                f(x0, y0 + dy),
                f(x0 + dx, y0 + dy),
            ];
            let has_pos = corners.iter().any(|&v| v > 0.0);
            let has_neg = corners.iter().any(|&v| v < 0.0);
            if has_pos && has_neg || corners.iter().any(|&v| v == 0.0) {
                out.push(PointInstance {
                    center: [(x0 + dx * 0.5) as f32, (y0 + dy * 0.5) as f32],
                });
            }
        }
    }
    out
}

/// Tessellates an explicit curve `y = f(x)` into a constant pixel-width
/// triangle ribbon, broken at asymptotes.
///
/// Sampling runs in parallel at roughly one sample per horizontal pixel.
/// A segment is dropped when either endpoint is non-finite, or when the
/// Y jump across one step exceeds [`ASYMPTOTE_THRESHOLD_FACTOR`] view
/// heights (a one-pixel step cannot legitimately cross the screen that
/// many times).
pub fn explicit_ribbon<F>(
    f: F,
    x_range: (f64, f64),
    width_px: f64,
    view: View2d,
    resolution: (u32, u32),
) -> Vec<MeshVertex2>
where
    F: Fn(f64) -> f64 + Sync,
{
    let (x_min, x_max) = x_range;
    let (width, height) = resolution;
    if x_max <= x_min || width == 0 || height == 0 {
        return Vec::new();
    }

    let samples = ((width as f64 * SAMPLING_DENSITY).ceil() as usize).max(100);
    let step = (x_max - x_min) / samples as f64;

    let path: Vec<DVec2> = (0..=samples)
        .into_par_iter()
        .map(|i| {
            let x = x_min + i as f64 * step;
            DVec2::new(x, f(x))
        })
        .collect();

    let view_height = 4.0 / view.zoom;
    let jump_threshold = view_height * ASYMPTOTE_THRESHOLD_FACTOR;
    let world_per_pixel = view_height / height as f64;
    let half_width = width_px * 0.5 * world_per_pixel;

    let mut vertices = Vec::with_capacity(samples * 6);
    for pair in path.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        if !p0.y.is_finite() || !p1.y.is_finite() {
            continue;
        }
        if (p1.y - p0.y).abs() > jump_threshold {
            continue;
        }

        let tangent = p1 - p0;
        if tangent.length_squared() < 1e-18 {
            continue;
        }
        let normal = DVec2::new(-tangent.y, tangent.x).normalize();

        let a0 = p0 - normal * half_width;
        let b0 = p0 + normal * half_width;
        let a1 = p1 - normal * half_width;
        let b1 = p1 + normal * half_width;
        for p in [a0, b0, a1, a1, b0, b1] {
            vertices.push(MeshVertex2 { pos: [p.x as f32, p.y as f32] });
        }
    }
    vertices
}

/// Tessellates a parametric curve `t -> (x, y)` into a constant
/// pixel-width triangle ribbon in world space.
///
/// The world-units-per-pixel factor comes from the view: the visible
/// world height is `4 / zoom` spread over `height_px` pixels (square
/// pixels — X works out to the same factor through the aspect ratio).
pub fn curve_ribbon<F>(
    f: F,
    t_range: (f64, f64),
    segments: u32,
    width_px: f64,
    view: View2d,
    height_px: u32,
) -> Vec<MeshVertex2>
where
    F: Fn(f64) -> DVec2,
{
    let world_per_pixel = (4.0 / view.zoom) / height_px as f64;
    let half_width = width_px * 0.5 * world_per_pixel;

    let step = (t_range.1 - t_range.0) / segments as f64;
    let mut edges: Vec<(DVec2, DVec2)> = Vec::with_capacity(segments as usize + 1);

    for i in 0..=segments {
        let t = t_range.0 + i as f64 * step;
        let pos = f(t);
        // Central difference where possible, one-sided at the ends.
        let ta = if i == 0 { t } else { t - step };
        let tb = if i == segments { t } else { t + step };
        let tangent = f(tb) - f(ta);
        let normal = DVec2::new(-tangent.y, tangent.x).normalize_or_zero();
        edges.push((pos - normal * half_width, pos + normal * half_width));
    }

    let mut vertices = Vec::with_capacity(segments as usize * 6);
    for pair in edges.windows(2) {
        let (a0, b0) = pair[0];
        let (a1, b1) = pair[1];
        for p in [a0, b0, a1, a1, b0, b1] {
            vertices.push(MeshVertex2 { pos: [p.x as f32, p.y as f32] });
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    // ── implicit sampling ─────────────────────────────────────────────────

    #[test]
    fn circle_samples_lie_near_the_circle() {
        let samples = implicit_samples(
            |x, y| x * x + y * y - 1.0,
            (-2.0, 2.0),
            (-2.0, 2.0),
            100,
            100,
        );
        assert!(!samples.is_empty());
        for s in &samples {
            let r = ((s.center[0] as f64).powi(2) + (s.center[1] as f64).powi(2)).sqrt();
            // Cell diagonal bounds the error.
            assert!((r - 1.0).abs() < 0.06, "sample at radius {r}");
        }
    }

    #[test]
    fn sign_constant_field_produces_no_samples() {
        let samples = implicit_samples(|_, _| 1.0, (-1.0, 1.0), (-1.0, 1.0), 32, 32);
        assert!(samples.is_empty());
    }

    // ── explicit curves ───────────────────────────────────────────────────

    #[test]
    fn smooth_explicit_curve_keeps_every_segment() {
        let verts = explicit_ribbon(
            |x| x.sin(),
            (-3.0, 3.0),
            3.0,
            View2d::default(),
            (200, 150),
        );
        // 200 samples => 200 segments, 6 vertices each, none dropped.
        assert_eq!(verts.len(), 200 * 6);
    }

    #[test]
    fn asymptotes_break_the_ribbon() {
        // 1/x blows up at 0; the segments straddling the pole must be
        // dropped, so no triangle connects the two branches.
        let view = View2d::default();
        let verts = explicit_ribbon(|x| 1.0 / x, (-2.0, 2.0), 3.0, view, (400, 300));
        assert!(!verts.is_empty());

        let jump_threshold = 4.0 / view.zoom * ASYMPTOTE_THRESHOLD_FACTOR;
        for tri in verts.chunks(3) {
            let ys: Vec<f64> = tri.iter().map(|v| v.pos[1] as f64).collect();
            let spread = ys.iter().cloned().fold(f64::MIN, f64::max)
                - ys.iter().cloned().fold(f64::MAX, f64::min);
            assert!(spread < jump_threshold, "triangle spans the pole: {ys:?}");
        }
    }

    #[test]
    fn non_finite_samples_are_skipped() {
        // sqrt is NaN left of 0; only the right half emits geometry.
        let verts = explicit_ribbon(
            |x| x.sqrt(),
            (-1.0, 1.0),
            2.0,
            View2d::default(),
            (100, 100),
        );
        assert!(!verts.is_empty());
        assert!(verts.iter().all(|v| v.pos[0] >= -0.05));
    }

    // ── ribbon tessellation ───────────────────────────────────────────────

    #[test]
    fn ribbon_emits_six_vertices_per_segment() {
        let verts = curve_ribbon(
            |t| DVec2::new(t, t.sin()),
            (0.0, 6.0),
            24,
            3.0,
            View2d::default(),
            600,
        );
        assert_eq!(verts.len(), 24 * 6);
    }

    #[test]
    fn straight_ribbon_has_constant_width() {
        let view = View2d::default();
        let verts = curve_ribbon(|t| DVec2::new(t, 0.0), (0.0, 1.0), 4, 6.0, view, 600);
        let expected = 6.0 * (4.0 / view.zoom) / 600.0;
        // First segment: vertices 0 and 1 are the two edges at t = 0.
        let w = (verts[1].pos[1] - verts[0].pos[1]).abs() as f64;
        assert!((w - expected).abs() < 1e-6, "width {w}, expected {expected}");
    }
}
