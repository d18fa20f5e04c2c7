use anyhow::Result;
use winit::dpi::LogicalSize;

use orrery_engine::device::GpuInit;
use orrery_engine::logging::{init_logging, LoggingConfig};
use orrery_engine::window::{Runtime, RuntimeConfig};

mod app;
mod scene;

use app::OrreryApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "orrery".to_string(),
        initial_size: LogicalSize::new(640.0, 480.0),
    };

    // Wireframe bodies need line rasterization.
    let gpu_init = GpuInit {
        required_features: wgpu::Features::POLYGON_MODE_LINE,
        ..GpuInit::default()
    };

    Runtime::run(config, gpu_init, OrreryApp::new())
}
