use glam::{Vec3, Vec4};

/// World-space position of the single point light.
pub const LIGHT_POS: Vec3 = Vec3::new(10.0, 10.0, 20.0);
/// Light color (white).
pub const LIGHT_COLOR: Vec3 = Vec3::ONE;
/// Ambient intensity.
pub const AMBIENT: f32 = 0.2;
/// Specular intensity.
pub const SPECULAR_STRENGTH: f32 = 0.5;
/// Phong specular exponent.
pub const SHININESS: f32 = 32.0;

/// Fragment stage: single-light double-sided Phong shading.
///
/// `use_lighting` is the f32 flag from the uniform block, truthy at
/// ≥ 0.5; below that the fragment is an unlit overlay and `base_color`
/// passes through untouched.
///
/// In the lit path the interpolated normal is normalized here (vertex
/// normals need not be unit length) and flipped toward the viewer when it
/// faces away, so back faces of open or inverted-winding surfaces light
/// like front faces instead of going black.
///
/// GPU counterpart: `fs_main` in `render/shaders/mesh3d.wgsl`.
pub fn shade(
    normal: Vec3,
    world_pos: Vec3,
    camera_pos: Vec3,
    base_color: Vec4,
    use_lighting: f32,
) -> Vec4 {
    if use_lighting < 0.5 {
        return base_color;
    }

    let mut n = normal.normalize();
    let v = (camera_pos - world_pos).normalize();
    if n.dot(v) < 0.0 {
        n = -n;
    }

    let l = (LIGHT_POS - world_pos).normalize();
    let diffuse = n.dot(l).max(0.0) * LIGHT_COLOR;

    let r = reflect(-l, n);
    let specular = SPECULAR_STRENGTH * v.dot(r).max(0.0).powf(SHININESS) * LIGHT_COLOR;

    let ambient = AMBIENT * LIGHT_COLOR;

    let rgb = (ambient + diffuse + specular) * base_color.truncate();
    rgb.extend(base_color.w)
}

/// Reflection of incident vector `e` about unit normal `n`, as WGSL
/// `reflect` computes it.
#[inline]
fn reflect(e: Vec3, n: Vec3) -> Vec3 {
    e - 2.0 * e.dot(n) * n
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Vec4 = Vec4::new(0.8, 0.4, 0.2, 0.9);

    fn assert_close(a: Vec4, b: Vec4) {
        assert!((a - b).abs().max_element() < 1e-5, "{a:?} != {b:?}");
    }

    // ── unlit bypass ──────────────────────────────────────────────────────

    #[test]
    fn unlit_flag_passes_base_color_through_exactly() {
        // Garbage normal and camera must not matter.
        let out = shade(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1e9, -1e9, 3.0),
            Vec3::ZERO,
            BASE,
            0.0,
        );
        assert_eq!(out, BASE);
    }

    #[test]
    fn flag_threshold_is_half() {
        let n = Vec3::Z;
        let p = Vec3::ZERO;
        let cam = Vec3::new(0.0, 0.0, 5.0);
        assert_eq!(shade(n, p, cam, BASE, 0.49), BASE);
        assert_ne!(shade(n, p, cam, BASE, 0.51), BASE);
    }

    // ── double-sided correction ───────────────────────────────────────────

    #[test]
    fn flipped_normal_shades_identically() {
        let n = Vec3::new(0.3, -0.2, 0.9);
        let p = Vec3::new(1.0, 2.0, 0.5);
        let cam = Vec3::new(4.0, -3.0, 6.0);
        assert_close(shade(n, p, cam, BASE, 1.0), shade(-n, p, cam, BASE, 1.0));
    }

    // ── term behavior ─────────────────────────────────────────────────────

    #[test]
    fn output_never_falls_below_ambient() {
        let out = shade(Vec3::X, Vec3::new(-50.0, -50.0, -50.0), Vec3::new(-49.0, -50.0, -50.0), BASE, 1.0);
        let floor = AMBIENT * BASE.truncate();
        assert!(out.x >= floor.x - 1e-6);
        assert!(out.y >= floor.y - 1e-6);
        assert!(out.z >= floor.z - 1e-6);
    }

    #[test]
    fn alpha_passes_through_when_lit() {
        let out = shade(Vec3::Z, Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), BASE, 1.0);
        assert_eq!(out.w, BASE.w);
    }

    #[test]
    fn unnormalized_normals_shade_like_unit_normals() {
        let p = Vec3::new(0.5, 0.5, 0.0);
        let cam = Vec3::new(2.0, 2.0, 4.0);
        assert_close(
            shade(Vec3::Z * 17.0, p, cam, BASE, 1.0),
            shade(Vec3::Z, p, cam, BASE, 1.0),
        );
    }

    #[test]
    fn facing_the_light_is_brighter_than_edge_on() {
        // Put the surface at the origin; the light sits at (10, 10, 20).
        let toward_light = (LIGHT_POS - Vec3::ZERO).normalize();
        let cam = LIGHT_POS; // view from the light: maximal diffuse + specular
        let lit = shade(toward_light, Vec3::ZERO, cam, BASE, 1.0);
        let edge = shade(toward_light.cross(Vec3::Z).normalize(), Vec3::ZERO, cam, BASE, 1.0);
        assert!(lit.x > edge.x);
    }
}
