//! Cohort Chart - Grouped Cohort Risk Bar Chart Editor
//!
//! Type outcome rows into an editable table, group them with "##" headings,
//! style the chart and download it as a PNG.

mod charts;
mod data;
mod gui;
mod logging;
mod settings;

use eframe::egui;
use gui::CohortChartApp;

fn main() -> eframe::Result<()> {
    logging::init_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting cohort chart");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 860.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Cohort Chart"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Cohort Chart",
        options,
        Box::new(|cc| Ok(Box::new(CohortChartApp::new(cc)))),
    )
}
