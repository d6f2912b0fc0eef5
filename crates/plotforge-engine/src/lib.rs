//! Plotforge engine crate.
//!
//! Rendering core for 2D function plots (grid, point clouds, curve meshes)
//! and a 3D shaded-mesh viewer. The host owns windows, cameras and geometry
//! production; this crate owns the coordinate transforms, the shading model
//! and the GPU pipelines that evaluate them.

pub mod device;
pub mod geometry;
pub mod view;
pub mod stage;

pub mod logging;
pub mod paint;
pub mod render;
