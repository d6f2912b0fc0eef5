use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use crate::paint::Color;

/// 3D transform state for one draw: combined view-projection plus a
/// per-object model matrix, with the camera position retained for
/// specular lighting.
///
/// Matrices are taken as supplied; a non-invertible `view_proj` is not
/// detected here and shows up as degenerate output, not an error.
///
/// Normals are deliberately NOT run through an inverse-transpose normal
/// matrix: the shading assumes `model` has uniform scale. Non-uniform
/// scale produces skewed shading.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform3d {
    pub view_proj: Mat4,
    pub model: Mat4,
    pub camera_pos: Vec3,
}

impl Default for Transform3d {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            camera_pos: Vec3::ZERO,
        }
    }
}

impl Transform3d {
    /// Object space → world space (the lighting space).
    #[inline]
    pub fn world_position(&self, position: Vec3) -> Vec3 {
        self.model.transform_point3(position)
    }

    /// Object space → clip space.
    ///
    /// GPU counterpart: `vs_main` in `render/shaders/mesh3d.wgsl`.
    #[inline]
    pub fn clip_position(&self, position: Vec3) -> Vec4 {
        self.view_proj * self.world_position(position).extend(1.0)
    }

    /// Builds the per-draw uniform block.
    pub fn uniforms(&self, base_color: Color, use_lighting: bool) -> Uniforms3d {
        Uniforms3d {
            view_proj: self.view_proj.to_cols_array(),
            model: self.model.to_cols_array(),
            camera_pos: self.camera_pos.to_array(),
            _pad0: 0.0,
            base_color: base_color.to_array(),
            use_lighting: if use_lighting { 1.0 } else { 0.0 },
            _pad1: [0.0; 3],
        }
    }
}

/// Per-draw 3D uniform block.
///
/// Layout is fixed: view_proj (64B), model (64B), camera_pos (12B) + pad,
/// base_color (16B), use_lighting flag (4B) + pad — 176 bytes total.
/// `use_lighting` is an f32 flag, truthy at ≥ 0.5.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Uniforms3d {
    pub view_proj: [f32; 16],
    pub model: [f32; 16],
    pub camera_pos: [f32; 3],
    pub _pad0: f32,
    pub base_color: [f32; 4],
    pub use_lighting: f32,
    pub _pad1: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_is_176_bytes() {
        assert_eq!(std::mem::size_of::<Uniforms3d>(), 176);
    }

    #[test]
    fn identity_transform_passes_positions_through() {
        let t = Transform3d::default();
        let p = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(t.world_position(p), p);
        assert_eq!(t.clip_position(p), p.extend(1.0));
    }

    #[test]
    fn model_translation_moves_world_position() {
        let t = Transform3d {
            model: Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)),
            ..Default::default()
        };
        assert_eq!(t.world_position(Vec3::ZERO), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn lighting_flag_encodes_as_f32() {
        let t = Transform3d::default();
        assert_eq!(t.uniforms(Color::WHITE, true).use_lighting, 1.0);
        assert_eq!(t.uniforms(Color::WHITE, false).use_lighting, 0.0);
    }

    #[test]
    fn uniforms_carry_matrices_column_major() {
        let t = Transform3d {
            model: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            ..Default::default()
        };
        let u = t.uniforms(Color::WHITE, true);
        // Translation lives in the fourth column.
        assert_eq!(&u.model[12..15], &[1.0, 2.0, 3.0]);
    }
}
