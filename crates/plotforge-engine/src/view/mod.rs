//! View state and coordinate transforms.
//!
//! Convention:
//! - 2D "world" space is the continuous plotting plane; the view maps it to
//!   NDC through a center + zoom, with X scaled by the viewport aspect.
//! - 3D uses plain view-projection and model matrices; object space goes to
//!   clip space, world position and normal survive for lighting.
//!
//! Both views also produce their fixed-layout uniform blocks. Field order
//! and padding are part of the GPU contract and must not be reordered.

mod view2d;
mod view3d;

pub use view2d::{View2d, ViewUniforms};
pub use view3d::{Transform3d, Uniforms3d};
