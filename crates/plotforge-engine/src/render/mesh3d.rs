use std::num::NonZeroU64;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::device::DepthBuffer;
use crate::geometry::{MeshData, MeshVertex3};
use crate::paint::Color;
use crate::view::{Transform3d, Uniforms3d};

use super::{RenderCtx, RenderTarget};

/// Primitive topology of a 3D object.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Topology3d {
    Triangles,
    Lines,
}

/// Host-side description of one 3D object.
pub struct Object3d {
    pub mesh: MeshData,
    pub color: Color,
    pub topology: Topology3d,
    /// false = unlit overlay (axes, wireframes): `color` passes through
    /// the fragment stage untouched.
    pub lit: bool,
    pub transparent: bool,
    pub model: Mat4,
}

impl Object3d {
    /// A lit, opaque triangle surface.
    pub fn surface(mesh: MeshData, color: Color) -> Self {
        Self {
            mesh,
            color,
            topology: Topology3d::Triangles,
            lit: true,
            transparent: false,
            model: Mat4::IDENTITY,
        }
    }

    /// An unlit line overlay.
    pub fn lines(mesh: MeshData, color: Color) -> Self {
        Self {
            mesh,
            color,
            topology: Topology3d::Lines,
            lit: false,
            transparent: false,
            model: Mat4::IDENTITY,
        }
    }
}

struct GpuObject {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    color: Color,
    topology: Topology3d,
    lit: bool,
    model: Mat4,
}

/// Depth-tested 3D mesh pass: Phong-shaded surfaces plus unlit overlays.
///
/// Objects are uploaded once via [`add`](Self::add) and redrawn every
/// frame; per-frame state (view-projection, camera position) flows in
/// through [`render`](Self::render), which rewrites each object's uniform
/// block. Opaque objects draw first with depth writes; transparent
/// objects follow with blending and depth test only.
#[derive(Default)]
pub struct Mesh3dRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    mesh_pipeline: Option<wgpu::RenderPipeline>,
    line_pipeline: Option<wgpu::RenderPipeline>,
    transparent_pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    opaque: Vec<GpuObject>,
    transparent: Vec<GpuObject>,
}

/// Clear color of the 3D scene.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.95, g: 0.95, b: 0.95, a: 1.0 };

impl Mesh3dRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads an object's geometry and registers it for drawing.
    pub fn add(&mut self, ctx: &RenderCtx<'_>, object: Object3d) {
        self.ensure_pipelines(ctx);
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plotforge mesh3d vbo"),
            contents: bytemuck::cast_slice(&object.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plotforge mesh3d ibo"),
            contents: bytemuck::cast_slice(&object.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("plotforge mesh3d ubo"),
            size: std::mem::size_of::<Uniforms3d>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plotforge mesh3d bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        let gpu = GpuObject {
            vbo,
            ibo,
            index_count: object.mesh.indices.len() as u32,
            ubo,
            bind_group,
            color: object.color,
            topology: object.topology,
            lit: object.lit,
            model: object.model,
        };

        if object.transparent {
            self.transparent.push(gpu);
        } else {
            self.opaque.push(gpu);
        }
    }

    /// Drops all registered objects.
    pub fn clear(&mut self) {
        self.opaque.clear();
        self.transparent.clear();
    }

    /// Draws the scene with the given per-frame camera state.
    ///
    /// Requires a depth view on the target; without one the pass is
    /// skipped with a warning.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: Mat4,
        camera_pos: Vec3,
    ) {
        self.ensure_pipelines(ctx);

        let Some(depth_view) = target.depth_view else {
            log::warn!("mesh3d pass skipped: target has no depth view");
            return;
        };

        for obj in self.opaque.iter().chain(self.transparent.iter()) {
            let transform = Transform3d { view_proj, model: obj.model, camera_pos };
            let uniforms = transform.uniforms(obj.color, obj.lit);
            ctx.queue.write_buffer(&obj.ubo, 0, bytemuck::cast_slice(&[uniforms]));
        }

        let Some(mesh_pipeline) = self.mesh_pipeline.as_ref() else { return };
        let Some(line_pipeline) = self.line_pipeline.as_ref() else { return };
        let Some(transparent_pipeline) = self.transparent_pipeline.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("plotforge mesh3d pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for obj in &self.opaque {
            let pipeline = match obj.topology {
                Topology3d::Triangles => mesh_pipeline,
                Topology3d::Lines => line_pipeline,
            };
            rpass.set_pipeline(pipeline);
            draw_object(&mut rpass, obj);
        }

        // Transparent objects last, depth-tested but not depth-written.
        rpass.set_pipeline(transparent_pipeline);
        for obj in &self.transparent {
            draw_object(&mut rpass, obj);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.mesh_pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("plotforge mesh3d shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh3d.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("plotforge mesh3d bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<Uniforms3d>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("plotforge mesh3d pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let mesh_pipeline = create_pipeline(
            ctx,
            &pipeline_layout,
            &shader,
            "plotforge mesh3d opaque pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            true,
            false,
        );
        let line_pipeline = create_pipeline(
            ctx,
            &pipeline_layout,
            &shader,
            "plotforge mesh3d line pipeline",
            wgpu::PrimitiveTopology::LineList,
            true,
            false,
        );
        let transparent_pipeline = create_pipeline(
            ctx,
            &pipeline_layout,
            &shader,
            "plotforge mesh3d transparent pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            false,
            true,
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.mesh_pipeline = Some(mesh_pipeline);
        self.line_pipeline = Some(line_pipeline);
        self.transparent_pipeline = Some(transparent_pipeline);
        self.bind_group_layout = Some(bind_group_layout);
    }
}

fn draw_object<'a>(rpass: &mut wgpu::RenderPass<'a>, obj: &'a GpuObject) {
    rpass.set_bind_group(0, &obj.bind_group, &[]);
    rpass.set_vertex_buffer(0, obj.vbo.slice(..));
    rpass.set_index_buffer(obj.ibo.slice(..), wgpu::IndexFormat::Uint32);
    rpass.draw_indexed(0..obj.index_count, 0, 0..1);
}

fn create_pipeline(
    ctx: &RenderCtx<'_>,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    topology: wgpu::PrimitiveTopology,
    depth_write: bool,
    blend: bool,
) -> wgpu::RenderPipeline {
    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[MeshVertex3::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: if blend {
                    Some(wgpu::BlendState::ALPHA_BLENDING)
                } else {
                    Some(wgpu::BlendState::REPLACE)
                },
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            // Double-sided shading wants both faces rasterized.
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
