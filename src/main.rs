//! Mug Studio: customize a 3D mug
//!
//! Load the mug model, paint an uploaded photo and decorative stickers onto
//! its body texture while watching a live 3D preview, then send the finished
//! design to the print server.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod assets;
mod compositor;
mod config;
mod model;
mod net;
mod preview;
mod session;
mod ui;

use macroquad::prelude::*;

use app::StudioApp;
use config::StudioConfig;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Mug Studio v{}", VERSION),
        window_width: 1280,
        window_height: 800,
        window_resizable: true,
        // Preview viewport math works in window pixels
        high_dpi: false,
        sample_count: 4,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Mug Studio v{}", VERSION);

    let config = StudioConfig::discover();
    let mut app = StudioApp::new(config);

    loop {
        app.update();
        app.draw();
        next_frame().await;
    }
}
