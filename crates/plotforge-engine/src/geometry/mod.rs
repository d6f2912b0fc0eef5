//! GPU vertex formats and mesh construction.
//!
//! Vertex types are plain POD blocks with their `wgpu` buffer layouts
//! attached. Mesh tessellation for 2D curves happens on the producing
//! side (hosts upload finished vertex lists); 3D surfaces get their
//! constructors here: parametric grids and tubes in `mesh`, implicit
//! zero-set polygonization in `implicit`.

mod implicit;
mod mesh;
mod vertex;

pub use mesh::MeshData;
pub use vertex::{MeshVertex2, MeshVertex3, PointInstance};
