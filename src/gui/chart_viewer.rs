//! Chart Viewer Widget
//! Central panel area showing the live chart preview.

use crate::charts::{ChartPlotter, ChartScene};
use crate::data::ChartLayout;
use crate::settings::ChartSettings;
use egui::{Color32, RichText};

/// Minimum height of the preview plot.
const MIN_CHART_HEIGHT: f32 = 260.0;

/// Preview of the chart built from the current table.
#[derive(Default)]
pub struct ChartViewer {
    /// Bar and group counts of the last drawn layout.
    last_counts: Option<(usize, usize)>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the preview for this frame's layout.
    pub fn show(&mut self, ui: &mut egui::Ui, layout: &ChartLayout, settings: &ChartSettings) {
        let counts = (layout.bars.len(), layout.markers.len());
        if self.last_counts != Some(counts) {
            tracing::debug!(bars = counts.0, groups = counts.1, "chart layout changed");
            self.last_counts = Some(counts);
        }

        ui.horizontal(|ui| {
            ui.label(RichText::new("Chart Preview").size(16.0).strong());
            ui.label(
                RichText::new(format!("{} bars, {} groups", counts.0, counts.1))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(6.0);

        let scene = ChartScene::build(layout, &settings.sanitized());
        let height = ui.available_height().max(MIN_CHART_HEIGHT);
        ChartPlotter::draw_bar_chart(ui, &scene, settings, height);
    }
}
