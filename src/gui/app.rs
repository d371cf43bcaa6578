//! Cohort Chart Main Application
//! Main window with control panel, table editor and chart preview.

use crate::charts::StaticChartRenderer;
use crate::data::{build_layout, ChartLayout, DataLoader, EditableTable};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, TableEditor};
use anyhow::Context;
use egui::SidePanel;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name offered by the save dialog.
const DEFAULT_PNG_NAME: &str = "Grouped_2Cohort_Bargraph.png";

/// Main application window.
pub struct CohortChartApp {
    table: EditableTable,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl Default for CohortChartApp {
    fn default() -> Self {
        Self {
            table: EditableTable::default(),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        }
    }
}

impl CohortChartApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    /// Layout for the current table snapshot and settings.
    fn current_layout(&self) -> ChartLayout {
        let settings = self.control_panel.settings.sanitized();
        let rows = self.table.to_rows(settings.mode);
        build_layout(&rows, settings.group_gap)
    }

    /// Handle CSV import via file dialog
    fn handle_import_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        match DataLoader::load_csv(&path) {
            Ok(table) => {
                let rows = table.len();
                self.table = table;
                self.control_panel.set_status(format!("Imported {} rows", rows));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "CSV import failed");
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Handle PNG download - render in memory, then write where the user picks
    fn handle_download_png(&mut self) {
        let layout = self.current_layout();
        let settings = self.control_panel.settings.clone();

        let png = match StaticChartRenderer::render_png(&layout, &settings) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "chart rendering failed");
                self.control_panel.set_status(format!("Error: {}", e));
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(DEFAULT_PNG_NAME)
            .save_file()
        else {
            return; // User cancelled
        };

        match save_png(&path, &png) {
            Ok(()) => {
                let note = if self.table.is_empty() {
                    " (empty table)"
                } else {
                    ""
                };
                self.control_panel
                    .set_status(format!("Saved {}{}", display_name(&path), note));
                if settings.open_after_export {
                    if let Err(e) = open::that(&path) {
                        tracing::warn!(error = %e, "could not open exported chart");
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = ?e, "saving chart failed");
                self.control_panel.set_status(format!("Error: {:#}", e));
            }
        }
    }
}

/// Write PNG bytes to disk.
fn save_png(path: &Path, png: &[u8]) -> anyhow::Result<()> {
    fs::write(path, png).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = png.len(), "chart exported");
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| PathBuf::from(path).display().to_string())
}

impl eframe::App for CohortChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::ImportCsv => self.handle_import_csv(),
                        ControlPanelAction::ResetTable => {
                            self.table.reset();
                            self.control_panel.set_status("Table reset");
                        }
                        ControlPanelAction::ClearTable => {
                            self.table.clear();
                            self.control_panel.set_status("Table cleared");
                        }
                        ControlPanelAction::DownloadPng => self.handle_download_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - table on top, chart below
        egui::CentralPanel::default().show(ctx, |ui| {
            let table_height = (ui.available_height() * 0.4).max(150.0);
            let settings = self.control_panel.settings.clone();
            if TableEditor::show(ui, &mut self.table, &settings, table_height) {
                let headers = self.table.rows().iter().filter(|r| r.is_header()).count();
                tracing::trace!(rows = self.table.len(), headers, "table edited");
            }

            ui.add_space(8.0);
            ui.separator();

            let layout = self.current_layout();
            self.chart_viewer.show(ui, &layout, &settings);
        });
    }
}
