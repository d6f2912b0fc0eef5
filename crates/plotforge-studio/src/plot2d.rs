use std::sync::Arc;

use glam::DVec2;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use plotforge_engine::device::{Gpu, GpuInit, SurfaceErrorAction};
use plotforge_engine::geometry::{MeshVertex2, PointInstance};
use plotforge_engine::paint::{Color, Style};
use plotforge_engine::render::{
    GridRenderer, Mesh2dDraw, Mesh2dRenderer, PointDraw, PointRenderer, RenderCtx, RenderTarget,
};
use plotforge_engine::view::View2d;

use crate::sample;

/// 2D demo scene: axis grid, an implicit-curve point cloud and a
/// parametric ribbon, at a fixed view.
pub struct Plot2dApp {
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,

    view: View2d,
    grid: GridRenderer,
    points: PointRenderer,
    meshes: Mesh2dRenderer,

    samples: Vec<PointInstance>,
    ribbon: Vec<MeshVertex2>,
    explicit: Vec<MeshVertex2>,
    dirty: bool,
}

impl Plot2dApp {
    pub fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            view: View2d::new(DVec2::ZERO, 0.6),
            grid: GridRenderer::new(),
            points: PointRenderer::new(),
            meshes: Mesh2dRenderer::new(),
            samples: Vec::new(),
            ribbon: Vec::new(),
            explicit: Vec::new(),
            dirty: true,
        }
    }

    /// Rebuilds the sample geometry for the current view and window size.
    fn update_scene(&mut self) {
        let Some(gpu) = self.gpu.as_ref() else { return };
        let size = gpu.size();
        let aspect = size.width as f64 / size.height as f64;

        let range = self.view.range(aspect);
        let x_range = (self.view.center.x - range.x, self.view.center.x + range.x);
        let y_range = (self.view.center.y - range.y, self.view.center.y + range.y);

        // Lemniscate of Bernoulli: (x² + y²)² = 4 (x² - y²).
        self.samples = sample::implicit_samples(
            |x, y| {
                let r2 = x * x + y * y;
                r2 * r2 - 4.0 * (x * x - y * y)
            },
            x_range,
            y_range,
            size.width / 4,
            size.height / 4,
        );

        // Archimedean spiral.
        self.ribbon = sample::curve_ribbon(
            |t| DVec2::new(t.cos() * t * 0.25, t.sin() * t * 0.25),
            (0.0, 6.0 * std::f64::consts::TAU),
            1200,
            3.0,
            self.view,
            size.height,
        );

        // tan(x): exercises the asymptote breaks.
        self.explicit = sample::explicit_ribbon(
            |x| x.tan(),
            x_range,
            2.0,
            self.view,
            (size.width, size.height),
        );

        self.dirty = false;
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.dirty {
            self.update_scene();
        }
        let Some(gpu) = self.gpu.as_mut() else { return };

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
        let size = gpu.size();
        let view_uniforms = self.view.uniforms((size.width, size.height));

        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);

            self.grid.render(&ctx, &mut target, &view_uniforms);

            self.meshes.render(
                &ctx,
                &mut target,
                &view_uniforms,
                &[
                    Mesh2dDraw {
                        style: Style::fill(Color::new(0.95, 0.6, 0.1, 1.0)),
                        vertices: &self.ribbon,
                    },
                    Mesh2dDraw {
                        style: Style::fill(Color::new(0.4, 0.9, 0.4, 1.0)),
                        vertices: &self.explicit,
                    },
                ],
            );

            self.points.render(
                &ctx,
                &mut target,
                &view_uniforms,
                &[PointDraw {
                    style: Style::new(Color::new(0.2, 0.7, 1.0, 1.0), 5.0),
                    instances: &self.samples,
                }],
            );
        }

        gpu.submit(frame);
    }
}

impl ApplicationHandler for Plot2dApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attrs = Window::default_attributes().with_title("plotforge — 2D plot");
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
                self.gpu = Some(gpu);
                self.window = Some(window);
                self.dirty = true;
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
                }
                self.dirty = true;
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
