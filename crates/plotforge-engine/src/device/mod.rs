//! GPU device + surface management.
//!
//! Responsibilities:
//! - wgpu Instance/Adapter/Device/Queue creation
//! - surface (swapchain) configuration and resize
//! - frame acquisition, command encoding and submission
//! - the depth buffer used by the 3D pass

mod depth;
mod gpu;

pub use depth::DepthBuffer;
pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
