use egui::ViewportBuilder;

use plateforge_core::PlateForgeApp;
use plateforge_core::platform::parameters::gui;

fn main() -> eframe::Result<()> {
    // Quiet reqwest's connection-pool chatter unless explicitly requested
    env_logger::Builder::from_default_env()
        .filter_module("reqwest::connect", log::LevelFilter::Off)
        .init();

    eframe::run_native(
        gui::APPLICATION_NAME,
        eframe::NativeOptions {
            viewport: ViewportBuilder::default().with_inner_size([1280.0, 768.0]),
            ..Default::default()
        },
        Box::new(|_cc| Ok(Box::new(PlateForgeApp::new()))),
    )
}
