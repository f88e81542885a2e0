mod app;
mod camera;
mod canvas;
mod clipboard;
mod export;
mod geometry;
mod markers;
mod output_panel;
mod state;
mod theme;
mod ui_controls;

use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let viewport = egui::ViewportBuilder::default()
        .with_title("QuadMark")
        .with_inner_size([1080.0, 760.0])
        .with_min_inner_size([640.0, 480.0]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "QuadMark",
        options,
        Box::new(|cc| Box::new(app::QuadMarkApp::new(cc))),
    )
}
