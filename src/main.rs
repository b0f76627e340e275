//! Helix Viewer: software-rendered parametric surface
//!
//! A helical tube rendered without a GPU rasterizer:
//! - Tessellated once at startup
//! - Homogeneous transforms and perspective projection on the CPU
//! - Painter's algorithm ordering, solid polygon fill
//! - Arrow keys rotate, F12 saves a screenshot

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod config;
mod error;
mod frontend;
mod rasterizer;
mod surface;

use std::path::PathBuf;

use macroquad::input::prevent_quit;
use macroquad::window::next_frame;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{FramePacer, LoopState, Viewer};
use config::ViewerConfig;
use error::ViewerError;
use frontend::{window_conf, MacroquadInput, Screen};

fn main() -> Result<(), ViewerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--print-config") {
        println!("{}", ViewerConfig::default().to_ron_string()?);
        return Ok(());
    }

    let (config, source) = ViewerConfig::resolve(arg.map(PathBuf::from))?;
    match &source {
        Some(path) => info!(path = %path.display(), "loaded config"),
        None => info!("no config file, using defaults"),
    }

    let viewer = Viewer::new(config)?;
    info!("=== Helix Viewer v{} ===", VERSION);

    macroquad::Window::from_config(window_conf(viewer.config()), run(viewer));
    Ok(())
}

async fn run(mut viewer: Viewer) {
    prevent_quit();

    let mut screen = Screen::new(viewer.config().viewport());
    let mut input = MacroquadInput;
    let mut pacer = FramePacer::new();

    while viewer.tick(&mut screen, &mut pacer, &mut input) == LoopState::Running {
        if input.screenshot_requested() {
            screen.save_screenshot(viewer.frame());
        }
        next_frame().await;
    }

    info!(frames = viewer.frame(), "viewer stopped");
}
