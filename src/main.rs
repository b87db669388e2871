mod app;
mod canvas;
mod feed;
mod landmark;
mod sketch;
mod state;
mod status_bar;
mod theme;
mod toolbar;
mod tracker;
mod ui_controls;

use eframe::egui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("posemark=info")))
        .init();

    let viewport = egui::ViewportBuilder::default()
        .with_title("PoseMark")
        .with_inner_size([
            app::FRAME_WIDTH as f32 + 24.0,
            app::FRAME_HEIGHT as f32 + 116.0,
        ])
        .with_min_inner_size([720.0, 560.0]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "PoseMark",
        options,
        Box::new(|cc| Box::new(app::PoseMarkApp::new(cc))),
    )
}
