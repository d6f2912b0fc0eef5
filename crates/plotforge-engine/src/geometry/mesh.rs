use glam::DVec3;

use super::MeshVertex3;

/// Indexed 3D mesh, ready for upload.
pub struct MeshData {
    pub vertices: Vec<MeshVertex3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Samples `f(u, v)` over a grid and builds a triangle-list surface.
    ///
    /// Normals come from the cross product of finite-difference partials,
    /// scaled back by `1/eps` before normalizing so the tangents keep
    /// geometric magnitude.
    pub fn parametric_surface<F>(
        f: F,
        u_range: (f64, f64),
        v_range: (f64, f64),
        u_segments: u32,
        v_segments: u32,
    ) -> Self
    where
        F: Fn(f64, f64) -> DVec3,
    {
        let mut vertices = Vec::with_capacity(((u_segments + 1) * (v_segments + 1)) as usize);
        let mut indices = Vec::with_capacity((u_segments * v_segments * 6) as usize);

        let (u_min, u_max) = u_range;
        let (v_min, v_max) = v_range;
        let u_step = (u_max - u_min) / u_segments as f64;
        let v_step = (v_max - v_min) / v_segments as f64;

        const EPS: f64 = 1e-9;

        for i in 0..=u_segments {
            for j in 0..=v_segments {
                let u = u_min + i as f64 * u_step;
                let v = v_min + j as f64 * v_step;

                let pos = f(u, v);
                let du = (f(u + EPS, v) - pos) / EPS;
                let dv = (f(u, v + EPS) - pos) / EPS;
                let normal = du.cross(dv).normalize_or_zero();

                vertices.push(MeshVertex3 {
                    position: pos.as_vec3().to_array(),
                    normal: normal.as_vec3().to_array(),
                });
            }
        }

        for i in 0..u_segments {
            for j in 0..v_segments {
                let row0 = i * (v_segments + 1);
                let row1 = (i + 1) * (v_segments + 1);
                let a = row0 + j;
                let b = row0 + j + 1;
                let c = row1 + j + 1;
                let d = row1 + j;
                indices.extend_from_slice(&[a, d, b, b, d, c]);
            }
        }

        Self { vertices, indices }
    }

    /// Sweeps a circle of `radius` along the parametric curve `f(t)`,
    /// producing a closed tube wall.
    ///
    /// The cross-section frame comes from the finite-difference tangent
    /// crossed with a fixed helper axis (Y, or Z when the tangent runs
    /// along Y). The frame is not parallel-transported, so it can flip
    /// across inflection points of the curve.
    pub fn tube<F>(
        f: F,
        t_range: (f64, f64),
        radius: f64,
        path_segments: u32,
        tube_segments: u32,
    ) -> Self
    where
        F: Fn(f64) -> DVec3,
    {
        struct Frame {
            pos: DVec3,
            normal: DVec3,
            binormal: DVec3,
        }

        let (t_min, t_max) = t_range;
        let t_step = (t_max - t_min) / path_segments as f64;

        const EPS: f64 = 1e-9;

        let mut frames = Vec::with_capacity(path_segments as usize + 1);
        for i in 0..=path_segments {
            let t = t_min + i as f64 * t_step;
            let pos = f(t);
            let tangent = (f(t + EPS) - pos).normalize_or_zero();

            let mut helper = DVec3::Y;
            if tangent.dot(helper).abs() > 0.99 {
                helper = DVec3::Z;
            }
            let normal = tangent.cross(helper).normalize_or_zero();
            let binormal = tangent.cross(normal).normalize_or_zero();

            frames.push(Frame { pos, normal, binormal });
        }

        // Ring vertices; theta 0 and TAU coincide to close the ring.
        let verts_per_ring = tube_segments + 1;
        let mut vertices = Vec::with_capacity(frames.len() * verts_per_ring as usize);
        for frame in &frames {
            for j in 0..=tube_segments {
                let theta = j as f64 / tube_segments as f64 * std::f64::consts::TAU;
                let (sin_t, cos_t) = theta.sin_cos();
                let offset = frame.normal * cos_t + frame.binormal * sin_t;
                let position = frame.pos + offset * radius;

                vertices.push(MeshVertex3 {
                    position: position.as_vec3().to_array(),
                    normal: offset.as_vec3().to_array(),
                });
            }
        }

        let mut indices = Vec::with_capacity((path_segments * tube_segments * 6) as usize);
        for i in 0..path_segments {
            for j in 0..tube_segments {
                let row0 = i * verts_per_ring;
                let row1 = (i + 1) * verts_per_ring;
                let a = row0 + j;
                let b = row0 + j + 1;
                let c = row1 + j + 1;
                let d = row1 + j;
                indices.extend_from_slice(&[a, d, b, b, d, c]);
            }
        }

        Self { vertices, indices }
    }

    /// Three axis segments from the origin, as a line list
    /// (vertex 0 = origin, 1/2/3 = +X/+Y/+Z endpoints).
    pub fn axes(length: f32) -> Self {
        let zero = [0.0; 3];
        let vertices = vec![
            MeshVertex3 { position: zero, normal: zero },
            MeshVertex3 { position: [length, 0.0, 0.0], normal: zero },
            MeshVertex3 { position: [0.0, length, 0.0], normal: zero },
            MeshVertex3 { position: [0.0, 0.0, length], normal: zero },
        ];
        let indices = vec![0, 1, 0, 2, 0, 3];
        Self { vertices, indices }
    }

    /// Single-axis line list: keeps only the segment toward `axis`
    /// (0 = X, 1 = Y, 2 = Z). Used to color the axes individually.
    pub fn axis(length: f32, axis: u32) -> Self {
        let mut mesh = Self::axes(length);
        mesh.indices = vec![0, 1 + axis.min(2)];
        mesh
    }

    /// Square ground plane of side `size` centered at the origin, facing +Z.
    pub fn plane(size: f32) -> Self {
        let h = size / 2.0;
        let n = [0.0, 0.0, 1.0];
        let vertices = vec![
            MeshVertex3 { position: [-h, -h, 0.0], normal: n },
            MeshVertex3 { position: [h, -h, 0.0], normal: n },
            MeshVertex3 { position: [h, h, 0.0], normal: n },
            MeshVertex3 { position: [-h, h, 0.0], normal: n },
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_grid_has_expected_counts() {
        let mesh = MeshData::parametric_surface(
            |u, v| DVec3::new(u, v, 0.0),
            (0.0, 1.0),
            (0.0, 1.0),
            4,
            3,
        );
        assert_eq!(mesh.vertices.len(), 5 * 4);
        assert_eq!(mesh.indices.len(), 4 * 3 * 6);
    }

    #[test]
    fn flat_surface_normals_point_up() {
        let mesh = MeshData::parametric_surface(
            |u, v| DVec3::new(u, v, 0.0),
            (-1.0, 1.0),
            (-1.0, 1.0),
            2,
            2,
        );
        for v in &mesh.vertices {
            assert!((v.normal[2] - 1.0).abs() < 1e-3, "normal {:?}", v.normal);
            assert!(v.normal[0].abs() < 1e-3);
            assert!(v.normal[1].abs() < 1e-3);
        }
    }

    #[test]
    fn surface_indices_stay_in_bounds() {
        let mesh = MeshData::parametric_surface(
            |u, v| DVec3::new(u.cos(), u.sin(), v),
            (0.0, std::f64::consts::TAU),
            (0.0, 1.0),
            16,
            2,
        );
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    // ── tube sweep ────────────────────────────────────────────────────────

    #[test]
    fn tube_ring_counts_match_segments() {
        let mesh = MeshData::tube(|t| DVec3::new(t, 0.0, 0.0), (0.0, 4.0), 0.5, 8, 12);
        assert_eq!(mesh.vertices.len(), 9 * 13);
        assert_eq!(mesh.indices.len(), (8 * 12 * 6) as usize);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn straight_tube_wall_sits_at_radius() {
        // Sweep along X: every vertex lies on a circle of the tube radius
        // in the YZ plane, and its normal points radially outward.
        let radius = 0.5;
        let mesh = MeshData::tube(|t| DVec3::new(t, 0.0, 0.0), (0.0, 4.0), radius, 8, 12);
        for v in &mesh.vertices {
            let r = (v.position[1].powi(2) + v.position[2].powi(2)).sqrt();
            assert!((r as f64 - radius).abs() < 1e-4, "wall at radius {r}");

            let n = glam::Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.x.abs() < 1e-4, "normal leans along the path: {n:?}");
        }
    }

    #[test]
    fn tube_ring_closes_on_itself() {
        let mesh = MeshData::tube(|t| DVec3::new(t, 0.0, 0.0), (0.0, 1.0), 0.3, 1, 6);
        // First and last vertex of a ring coincide (theta 0 vs TAU, up to
        // sin/cos rounding).
        let a = glam::Vec3::from_array(mesh.vertices[0].position);
        let b = glam::Vec3::from_array(mesh.vertices[6].position);
        assert!((a - b).length() < 1e-6, "{a:?} != {b:?}");
    }

    #[test]
    fn axes_are_three_segments_from_origin() {
        let mesh = MeshData::axes(100.0);
        assert_eq!(mesh.indices, vec![0, 1, 0, 2, 0, 3]);
        assert_eq!(mesh.vertices[1].position, [100.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[3].position, [0.0, 0.0, 100.0]);
    }

    #[test]
    fn single_axis_picks_one_endpoint() {
        assert_eq!(MeshData::axis(10.0, 2).indices, vec![0, 3]);
    }

    #[test]
    fn plane_is_one_quad() {
        let mesh = MeshData::plane(20.0);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }
}
