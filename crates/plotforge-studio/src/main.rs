mod plot2d;
mod plot3d;
mod sample;

use anyhow::Result;
use winit::event_loop::EventLoop;

use plotforge_engine::logging::{LoggingConfig, init_logging};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let scene = std::env::args().nth(1).unwrap_or_else(|| "2d".to_string());
    let event_loop = EventLoop::new()?;

    match scene.as_str() {
        "2d" => {
            let mut app = plot2d::Plot2dApp::new();
            event_loop.run_app(&mut app)?;
        }
        "3d" => {
            let mut app = plot3d::Plot3dApp::new();
            event_loop.run_app(&mut app)?;
        }
        other => anyhow::bail!("unknown scene {other:?} (expected \"2d\" or \"3d\")"),
    }

    Ok(())
}
