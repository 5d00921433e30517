mod app;
mod color;
mod state;
mod ui;

use app::EnviroInsightsApp;
use clap::Parser;
use eframe::egui;
use enviro_insights::config::DashboardArgs;

fn main() -> eframe::Result {
    env_logger::init();
    let args = DashboardArgs::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Environmental Insights Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(EnviroInsightsApp::new(&args.data)))),
    )
}
