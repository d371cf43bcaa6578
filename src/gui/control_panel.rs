//! Control Panel Widget
//! Left side panel with chart settings and the import/download actions.

use crate::charts::{Rgb, PALETTES};
use crate::settings::{
    ChartMode, ChartSettings, Orientation, ValueKind, ValuePlacement, BAR_WIDTH_RANGE, DPI_RANGE,
    FONT_FAMILIES, FONT_SIZE_RANGE, GROUP_GAP_RANGE, PAIR_GAP_RANGE, TICK_FONT_SIZE_RANGE,
    TICK_LENGTH_RANGE,
};
use egui::{Color32, ComboBox, RichText};

/// Left side control panel with chart settings.
pub struct ControlPanel {
    pub settings: ChartSettings,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: ChartSettings::default(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Cohort Chart")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Grouped outcome bar charts")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Section =====
        ui.label(RichText::new("📁 Data").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.radio_value(&mut self.settings.mode, ChartMode::TwoCohort, "Two Cohorts");
            ui.radio_value(&mut self.settings.mode, ChartMode::SingleValue, "Single Value");
        });

        let mut value_kind = self.settings.value_kind;
        ui.horizontal(|ui| {
            ui.radio_value(&mut value_kind, ValueKind::RiskPercent, "Risk (%)");
            ui.radio_value(&mut value_kind, ValueKind::RelativeRisk, "Relative Risk");
        });
        if value_kind != self.settings.value_kind {
            self.settings.set_value_kind(value_kind);
        }

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.button("📂 Import CSV").clicked() {
                action = ControlPanelAction::ImportCsv;
            }
            if ui.button("↺ Reset Table").clicked() {
                action = ControlPanelAction::ResetTable;
            }
            if ui.button("🗑 Clear").clicked() {
                action = ControlPanelAction::ClearTable;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Cohort Section =====
        ui.label(RichText::new("🎨 Cohorts & Colors").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 170.0;

        if self.settings.mode == ChartMode::TwoCohort {
            for cohort in 0..2 {
                ui.horizontal(|ui| {
                    ui.add_sized(
                        [label_width, 20.0],
                        egui::Label::new(format!("Cohort {} Name:", cohort + 1)),
                    );
                    ui.text_edit_singleline(&mut self.settings.cohort_names[cohort]);
                });
            }
            ui.add_space(5.0);
        }

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Color Palette:"));
            let mut selected = self.settings.palette_index;
            ComboBox::from_id_salt("palette")
                .width(combo_width)
                .selected_text(PALETTES.get(selected).map(|p| p.0).unwrap_or_default())
                .show_ui(ui, |ui| {
                    for (i, (name, _)) in PALETTES.iter().enumerate() {
                        ui.selectable_value(&mut selected, i, *name);
                    }
                });
            if selected != self.settings.palette_index {
                self.settings.select_palette(selected);
            }
        });

        if self.settings.mode == ChartMode::TwoCohort {
            for cohort in 0..2 {
                ui.horizontal(|ui| {
                    let caption = format!("Color for {}:", self.settings.cohort_name(cohort));
                    ui.add_sized([label_width, 20.0], egui::Label::new(caption));
                    let mut color = self.settings.cohort_colors[cohort].to_color32();
                    if ui.color_edit_button_srgba(&mut color).changed() {
                        self.settings.cohort_colors[cohort] = Rgb::from_color32(color);
                    }
                });
            }
        }
        ui.checkbox(&mut self.settings.grayscale, "Grayscale");

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Appearance Section =====
        ui.label(RichText::new("⚙️ Chart Appearance").size(14.0).strong());
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.radio_value(&mut self.settings.orientation, Orientation::Vertical, "Vertical");
            ui.radio_value(&mut self.settings.orientation, Orientation::Horizontal, "Horizontal");
        });

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Font Family:"));
            ComboBox::from_id_salt("font_family")
                .width(combo_width)
                .selected_text(&self.settings.font_family)
                .show_ui(ui, |ui| {
                    for family in FONT_FAMILIES {
                        if ui
                            .selectable_label(self.settings.font_family == family, family)
                            .clicked()
                        {
                            self.settings.font_family = family.to_string();
                        }
                    }
                });
        });

        ui.add(egui::Slider::new(&mut self.settings.font_size, FONT_SIZE_RANGE).text("Font Size"));
        ui.add(
            egui::Slider::new(&mut self.settings.tick_font_size, TICK_FONT_SIZE_RANGE)
                .text("Tick Font Size"),
        );
        ui.add(
            egui::Slider::new(&mut self.settings.major_tick_length, TICK_LENGTH_RANGE)
                .text("Major Tick Length"),
        );
        ui.checkbox(&mut self.settings.minor_ticks, "Show Minor Ticks");
        ui.add(egui::Slider::new(&mut self.settings.bar_width, BAR_WIDTH_RANGE).text("Bar Width"));
        ui.add(
            egui::Slider::new(&mut self.settings.group_gap, GROUP_GAP_RANGE)
                .step_by(0.05)
                .text("Distance Between Bar Groups"),
        );
        if self.settings.mode == ChartMode::TwoCohort {
            ui.add(
                egui::Slider::new(&mut self.settings.pair_gap, PAIR_GAP_RANGE)
                    .step_by(0.01)
                    .text("Spacing Between Cohort Bars"),
            );
        }

        ui.checkbox(&mut self.settings.gridlines, "Show gridlines");
        ui.checkbox(&mut self.settings.show_legend, "Show legend");
        ui.checkbox(&mut self.settings.show_values, "Show values on bars");
        if self.settings.show_values {
            ui.horizontal(|ui| {
                ui.radio_value(
                    &mut self.settings.value_placement,
                    ValuePlacement::Outside,
                    "Outside bar",
                );
                ui.radio_value(
                    &mut self.settings.value_placement,
                    ValuePlacement::Inside,
                    "Inside bar",
                );
            });
        }

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Category Title:"));
            ui.text_edit_singleline(&mut self.settings.category_axis_title);
        });
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Value Title:"));
            ui.text_edit_singleline(&mut self.settings.value_axis_title);
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.label(RichText::new("📥 Export").size(14.0).strong());
        ui.add_space(5.0);
        ui.add(egui::Slider::new(&mut self.settings.dpi, DPI_RANGE).text("DPI"));
        ui.checkbox(&mut self.settings.open_after_export, "Open after saving");

        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("📥 Download Chart as PNG").size(15.0))
                .min_size(egui::vec2(220.0, 32.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::DownloadPng;
            }
        });

        ui.add_space(10.0);
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Saved") || self.status.starts_with("Imported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    ImportCsv,
    ResetTable,
    ClearTable,
    DownloadPng,
}
