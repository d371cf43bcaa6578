//! Table Editor Widget
//! Editable grid of outcome rows. Rows starting with "##" are group headings.

use crate::data::{EditableTable, TableRow};
use crate::settings::{ChartMode, ChartSettings};
use egui::{Color32, RichText, ScrollArea, TextEdit};

/// Row operation requested from a row's buttons; applied after the grid is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RowEdit {
    Insert(usize),
    Remove(usize),
    MoveUp(usize),
    MoveDown(usize),
}

pub struct TableEditor;

impl TableEditor {
    /// Draw the grid. Returns true when any cell or row changed.
    pub fn show(
        ui: &mut egui::Ui,
        table: &mut EditableTable,
        settings: &ChartSettings,
        max_height: f32,
    ) -> bool {
        let mut changed = false;
        let mut edit: Option<RowEdit> = None;
        let two_cohort = settings.mode == ChartMode::TwoCohort;
        let value_suffix = match settings.value_kind {
            crate::settings::ValueKind::RiskPercent => " Risk (%)",
            crate::settings::ValueKind::RelativeRisk => " RR",
        };

        let hint = "Use rows beginning with \"##\" to define group headings (e.g. \"##Cardiac\").";
        ui.label(RichText::new(hint).size(11.0).color(Color32::GRAY));
        ui.add_space(4.0);

        ScrollArea::vertical()
            .id_salt("table_editor")
            .max_height(max_height)
            .show(ui, |ui| {
                egui::Grid::new("table_editor_grid")
                    .striped(true)
                    .spacing([6.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Outcome Name").strong());
                        if two_cohort {
                            for cohort in 0..2 {
                                let name = settings.cohort_name(cohort);
                                let title = format!("{}{}", name, value_suffix);
                                ui.label(RichText::new(title).strong());
                            }
                        } else {
                            ui.label(RichText::new(settings.value_axis_title.as_str()).strong());
                            ui.label(RichText::new("Series").strong());
                            ui.label(RichText::new("Color").strong());
                        }
                        ui.label("");
                        ui.end_row();

                        let row_count = table.len();
                        for (i, row) in table.rows_mut().iter_mut().enumerate() {
                            changed |= Self::row_cells(ui, row, two_cohort);
                            if let Some(e) = Self::row_buttons(ui, i, row_count) {
                                edit = Some(e);
                            }
                            ui.end_row();
                        }
                    });
            });

        ui.horizontal(|ui| {
            if ui.button("➕ Add Row").clicked() {
                table.push_data_row();
                changed = true;
            }
            if ui.button("➕ Add Group Heading").clicked() {
                table.push_header_row();
                changed = true;
            }
        });

        if let Some(edit) = edit {
            match edit {
                RowEdit::Insert(i) => table.insert_row(i),
                RowEdit::Remove(i) => {
                    table.remove_row(i);
                }
                RowEdit::MoveUp(i) => table.move_up(i),
                RowEdit::MoveDown(i) => table.move_down(i),
            }
            tracing::debug!(?edit, "table row edited");
            changed = true;
        }

        changed
    }

    /// Editable cells of one row. Value cells are disabled on heading rows.
    fn row_cells(ui: &mut egui::Ui, row: &mut TableRow, two_cohort: bool) -> bool {
        let header = row.is_header();
        let mut changed = false;

        let label_edit = TextEdit::singleline(&mut row.label).desired_width(200.0);
        let label_edit = if header {
            label_edit.text_color(Color32::from_rgb(100, 149, 237))
        } else {
            label_edit
        };
        changed |= ui.add(label_edit).changed();

        if two_cohort {
            for cell in row.values.iter_mut() {
                let cell_edit = TextEdit::singleline(cell).desired_width(90.0);
                changed |= ui.add_enabled(!header, cell_edit).changed();
            }
        } else {
            let value_edit = TextEdit::singleline(&mut row.values[0]).desired_width(90.0);
            changed |= ui.add_enabled(!header, value_edit).changed();
            let series_edit = TextEdit::singleline(&mut row.series).desired_width(90.0);
            changed |= ui.add_enabled(!header, series_edit).changed();
            let color_edit = TextEdit::singleline(&mut row.color)
                .hint_text("#RRGGBB")
                .desired_width(70.0);
            changed |= ui.add_enabled(!header, color_edit).changed();
        }
        changed
    }

    fn row_buttons(ui: &mut egui::Ui, i: usize, row_count: usize) -> Option<RowEdit> {
        let mut edit = None;
        ui.horizontal(|ui| {
            if ui.small_button("⬆").on_hover_text("Move up").clicked() && i > 0 {
                edit = Some(RowEdit::MoveUp(i));
            }
            if ui.small_button("⬇").on_hover_text("Move down").clicked() && i + 1 < row_count {
                edit = Some(RowEdit::MoveDown(i));
            }
            if ui.small_button("➕").on_hover_text("Insert row above").clicked() {
                edit = Some(RowEdit::Insert(i));
            }
            if ui.small_button("✕").on_hover_text("Delete row").clicked() {
                edit = Some(RowEdit::Remove(i));
            }
        });
        edit
    }
}
