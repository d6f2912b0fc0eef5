//! GPU rendering subsystem.
//!
//! Each renderer owns its pipeline and buffers and exposes a single
//! `render` entry point; the host owns the frame (encoder, views) and the
//! draw order. Stage semantics live in `crate::stage`; the WGSL under
//! `shaders/` evaluates the same math on the GPU.
//!
//! Draw order for the 2D scene: grid first (clears), then meshes and
//! point layers. The 3D pass is independent and depth-tested.

mod ctx;
mod grid;
mod mesh2d;
mod mesh3d;
mod points;

pub use ctx::{RenderCtx, RenderTarget};
pub use grid::GridRenderer;
pub use mesh2d::{Mesh2dDraw, Mesh2dRenderer};
pub use mesh3d::{Mesh3dRenderer, Object3d, Topology3d};
pub use points::{PointDraw, PointRenderer};
