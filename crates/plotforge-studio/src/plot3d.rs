use std::sync::Arc;

use glam::{DVec3, Mat4, Vec3};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use plotforge_engine::device::{DepthBuffer, Gpu, GpuInit, SurfaceErrorAction};
use plotforge_engine::geometry::MeshData;
use plotforge_engine::paint::Color;
use plotforge_engine::render::{Mesh3dRenderer, Object3d, RenderCtx, RenderTarget};

/// 3D demo scene: colored axes, a transparent ground plane and a lit
/// parametric surface, viewed from a fixed orbit position.
pub struct Plot3dApp {
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    depth: Option<DepthBuffer>,
    renderer: Mesh3dRenderer,
    populated: bool,
}

impl Plot3dApp {
    pub fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            depth: None,
            renderer: Mesh3dRenderer::new(),
            populated: false,
        }
    }

    fn eye() -> Vec3 {
        // Fixed orbit: yaw 45°, pitch 30°, radius 10, Z up.
        let (yaw, pitch, radius) = (45f32.to_radians(), 30f32.to_radians(), 10.0);
        Vec3::new(
            radius * pitch.cos() * yaw.cos(),
            radius * pitch.cos() * yaw.sin(),
            radius * pitch.sin(),
        )
    }

    fn populate(renderer: &mut Mesh3dRenderer, ctx: &RenderCtx<'_>) {
        // Axes, colored individually (X red, Y green, Z blue).
        let axis_colors = [
            Color::opaque(1.0, 0.0, 0.0),
            Color::opaque(0.0, 0.7, 0.0),
            Color::opaque(0.0, 0.0, 1.0),
        ];
        for (axis, color) in axis_colors.into_iter().enumerate() {
            renderer.add(ctx, Object3d::lines(MeshData::axis(100.0, axis as u32), color));
        }

        // Lit ripple surface: z = sin(r) / r.
        let surface = MeshData::parametric_surface(
            |u, v| {
                let r = (u * u + v * v).sqrt().max(1e-6);
                DVec3::new(u, v, 2.0 * r.sin() / r)
            },
            (-8.0, 8.0),
            (-8.0, 8.0),
            128,
            128,
        );
        renderer.add(ctx, Object3d::surface(surface, Color::opaque(0.3, 0.5, 0.9)));

        // Implicit torus above the ripple, polygonized with marching
        // cubes, with a (2, 3) torus-knot tube threaded through it.
        let torus = MeshData::implicit_surface(
            &|x: f64, y: f64, z: f64| {
                let q = (x * x + y * y).sqrt() - 2.0;
                q * q + z * z - 0.36
            },
            (-3.0, 3.0),
            (-3.0, 3.0),
            (-1.0, 1.0),
            48,
        );
        let lift = Mat4::from_translation(Vec3::new(0.0, 0.0, 4.0));
        renderer.add(ctx, Object3d {
            model: lift,
            ..Object3d::surface(torus, Color::opaque(0.9, 0.4, 0.3))
        });

        let trefoil = MeshData::tube(
            |t| {
                let r = 2.0 + (3.0 * t).cos();
                DVec3::new(r * (2.0 * t).cos(), r * (2.0 * t).sin(), (3.0 * t).sin())
            },
            (0.0, std::f64::consts::TAU),
            0.15,
            256,
            16,
        );
        renderer.add(ctx, Object3d {
            model: lift,
            ..Object3d::surface(trefoil, Color::opaque(0.95, 0.8, 0.2))
        });

        // Transparent ground plane, drawn last.
        let plane = Object3d {
            transparent: true,
            lit: false,
            ..Object3d::surface(MeshData::plane(20.0), Color::new(0.8, 0.8, 0.8, 0.3))
        };
        renderer.add(ctx, plane);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else { return };
        let Some(depth) = self.depth.as_ref() else { return };

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => match gpu.handle_surface_error(err) {
                SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => return,
                SurfaceErrorAction::Fatal => {
                    event_loop.exit();
                    return;
                }
            },
        };

        let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
        if !self.populated {
            Self::populate(&mut self.renderer, &ctx);
            self.populated = true;
        }

        let size = gpu.size();
        let aspect = size.width as f32 / size.height.max(1) as f32;
        let eye = Self::eye();
        let view_proj = Mat4::perspective_rh(45f32.to_radians(), aspect, 0.1, 1000.0)
            * Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Z);

        {
            let mut target = RenderTarget::with_depth(&mut frame.encoder, &frame.view, &depth.view);
            self.renderer.render(&ctx, &mut target, view_proj, eye);
        }

        gpu.submit(frame);
    }
}

impl ApplicationHandler for Plot3dApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attrs = Window::default_attributes().with_title("plotforge — 3D surface");
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(Gpu::new(window.clone(), GpuInit::default())) {
            Ok(gpu) => {
                let size = gpu.size();
                self.depth = Some(DepthBuffer::new(gpu.device(), size.width, size.height));
                self.gpu = Some(gpu);
                self.window = Some(window);
            }
            Err(err) => {
                log::error!("GPU init failed: {err:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size);
                    if let Some(depth) = self.depth.as_mut() {
                        depth.resize(gpu.device(), new_size.width, new_size.height);
                    }
                }
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
