use std::num::NonZeroU64;

use crate::geometry::PointInstance;
use crate::paint::{Style, StyleUniform};
use crate::view::ViewUniforms;

use super::{RenderCtx, RenderTarget};

/// One point layer: a style plus its implicit-function samples.
pub struct PointDraw<'a> {
    pub style: Style,
    pub instances: &'a [PointInstance],
}

/// Instanced point-sprite pass.
///
/// Each instance is a world-space sample; the quad is derived from the
/// vertex index (triangle strip, 4 vertices) and sized in screen pixels,
/// so samples keep their on-screen radius across zoom levels. The
/// fragment stage shapes the quad into an anti-aliased disc and discards
/// fully transparent fragments.
///
/// Style is a per-draw uniform block, so every layer gets its own slot
/// (buffer + bind group); slots are pooled across frames.
#[derive(Default)]
pub struct PointRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    view_bgl: Option<wgpu::BindGroupLayout>,
    style_bgl: Option<wgpu::BindGroupLayout>,
    view_ubo: Option<wgpu::Buffer>,
    view_bind_group: Option<wgpu::BindGroup>,

    slots: Vec<DrawSlot>,
}

struct DrawSlot {
    style_ubo: wgpu::Buffer,
    style_bind_group: wgpu::BindGroup,
    instance_vbo: wgpu::Buffer,
    instance_capacity: usize,
}

impl PointRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view: &ViewUniforms,
        draws: &[PointDraw<'_>],
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_view_bindings(ctx);

        let live: Vec<&PointDraw<'_>> = draws.iter().filter(|d| !d.instances.is_empty()).collect();
        if live.is_empty() {
            return;
        }

        let Some(view_ubo) = self.view_ubo.as_ref() else { return };
        ctx.queue.write_buffer(view_ubo, 0, bytemuck::cast_slice(&[*view]));

        for (i, draw) in live.iter().enumerate() {
            self.ensure_slot(ctx, i, draw.instances.len());
            let slot = &self.slots[i];
            ctx.queue.write_buffer(
                &slot.style_ubo,
                0,
                bytemuck::cast_slice(&[draw.style.uniform()]),
            );
            ctx.queue.write_buffer(
                &slot.instance_vbo,
                0,
                bytemuck::cast_slice(draw.instances),
            );
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(view_bind_group) = self.view_bind_group.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("plotforge point pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, view_bind_group, &[]);

        let stride = std::mem::size_of::<PointInstance>() as u64;
        for (i, draw) in live.iter().enumerate() {
            let slot = &self.slots[i];
            let count = draw.instances.len() as u32;
            rpass.set_bind_group(1, &slot.style_bind_group, &[]);
            rpass.set_vertex_buffer(0, slot.instance_vbo.slice(0..count as u64 * stride));
            rpass.draw(0..4, 0..count);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("plotforge point shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/points.wgsl").into()),
        });

        let view_bgl = view_bind_group_layout(ctx.device, "plotforge point view bgl");
        let style_bgl = style_bind_group_layout(ctx.device, "plotforge point style bgl");

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("plotforge point pipeline layout"),
                bind_group_layouts: &[&view_bgl, &style_bgl],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("plotforge point pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[PointInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.view_bgl = Some(view_bgl);
        self.style_bgl = Some(style_bgl);
        self.view_bind_group = None;
        self.view_ubo = None;
        self.slots.clear();
    }

    fn ensure_view_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.view_bind_group.is_some() && self.view_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.view_bgl.as_ref() else { return };

        let view_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("plotforge point view ubo"),
            size: std::mem::size_of::<ViewUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plotforge point view bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_ubo.as_entire_binding(),
            }],
        });

        self.view_ubo = Some(view_ubo);
        self.view_bind_group = Some(bind_group);
    }

    fn ensure_slot(&mut self, ctx: &RenderCtx<'_>, index: usize, instances: usize) {
        let stride = std::mem::size_of::<PointInstance>();

        if index >= self.slots.len() {
            let Some(style_bgl) = self.style_bgl.as_ref() else { return };

            let style_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("plotforge point style ubo"),
                size: std::mem::size_of::<StyleUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let style_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("plotforge point style bind group"),
                layout: style_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: style_ubo.as_entire_binding(),
                }],
            });

            let capacity = instances.next_power_of_two().max(64);
            let instance_vbo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("plotforge point instance vbo"),
                size: (capacity * stride) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            self.slots.push(DrawSlot {
                style_ubo,
                style_bind_group,
                instance_vbo,
                instance_capacity: capacity,
            });
            return;
        }

        let slot = &mut self.slots[index];
        if slot.instance_capacity < instances {
            let capacity = instances.next_power_of_two();
            slot.instance_vbo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("plotforge point instance vbo"),
                size: (capacity * stride) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            slot.instance_capacity = capacity;
        }
    }
}

pub(super) fn view_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<ViewUniforms>() as u64),
            },
            count: None,
        }],
    })
}

pub(super) fn style_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<StyleUniform>() as u64),
            },
            count: None,
        }],
    })
}
