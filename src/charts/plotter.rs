//! Chart Plotter Module
//! Interactive preview of the chart scene using egui_plot.

use crate::charts::{ChartScene, Rgb};
use crate::settings::{ChartSettings, Orientation, ValuePlacement};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, HLine, Legend, Plot, PlotPoint, Text, VLine};

/// Draws the preview chart inside the central panel.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw the scene, or the placeholder when there is nothing to plot.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        scene: &ChartScene,
        settings: &ChartSettings,
        height: f32,
    ) {
        if scene.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No data to plot.").size(20.0));
            });
            return;
        }

        let vertical = settings.orientation == Orientation::Vertical;
        let category_ticks = scene.category_ticks.clone();
        let tick_scene = scene.clone();
        let category_formatter = move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            tick_scene.category_label(mark.value)
        };
        let category_spacer = move |_input: egui_plot::GridInput| {
            category_ticks
                .iter()
                .map(|(pos, _)| GridMark {
                    value: *pos,
                    step_size: 1.0,
                })
                .collect::<Vec<_>>()
        };
        let (cat_lo, cat_hi) = scene.category_range;

        let mut plot = Plot::new("cohort_bar_chart")
            .height(height)
            .allow_scroll(false)
            .show_grid(settings.gridlines)
            .include_x(0.0)
            .include_y(0.0);

        if vertical {
            plot = plot
                .x_axis_label(settings.category_axis_title.clone())
                .y_axis_label(settings.value_axis_title.clone())
                .x_axis_formatter(category_formatter)
                .x_grid_spacer(category_spacer)
                .include_x(cat_lo)
                .include_x(cat_hi)
                .include_y(scene.value_max);
        } else {
            plot = plot
                .x_axis_label(settings.value_axis_title.clone())
                .y_axis_label(settings.category_axis_title.clone())
                .y_axis_formatter(category_formatter)
                .y_grid_spacer(category_spacer)
                .include_y(cat_lo)
                .include_y(cat_hi)
                .include_x(scene.value_max);
        }

        if settings.show_legend {
            plot = plot.legend(Legend::default());
        }

        plot.show(ui, |plot_ui| {
            // One chart per legend entry so the legend lists cohorts or labels.
            for (index, (name, color)) in scene.legend.iter().enumerate() {
                let bars: Vec<Bar> = scene
                    .bars
                    .iter()
                    .filter(|b| b.legend == Some(index))
                    .map(|b| {
                        Bar::new(b.center, b.value)
                            .width(settings.bar_width)
                            .fill(b.color.to_color32())
                    })
                    .collect();
                if bars.is_empty() {
                    continue;
                }
                let mut chart = BarChart::new(bars).color(color.to_color32()).name(name);
                if !vertical {
                    chart = chart.horizontal();
                }
                plot_ui.bar_chart(chart);
            }

            // Bars with explicit colors that no legend entry covers.
            let stray: Vec<Bar> = scene
                .bars
                .iter()
                .filter(|b| b.legend.is_none())
                .map(|b| {
                    Bar::new(b.center, b.value)
                        .width(settings.bar_width)
                        .fill(b.color.to_color32())
                })
                .collect();
            if !stray.is_empty() {
                let mut chart = BarChart::new(stray);
                if !vertical {
                    chart = chart.horizontal();
                }
                plot_ui.bar_chart(chart);
            }

            if let Some(reference) = settings.reference_line() {
                if vertical {
                    plot_ui.hline(HLine::new(reference).color(Color32::BLACK).width(1.0));
                } else {
                    plot_ui.vline(VLine::new(reference).color(Color32::BLACK).width(1.0));
                }
            }

            let separator = Rgb(0x99, 0x99, 0x99).to_color32();
            for group in &scene.groups {
                if let Some(at) = group.separator {
                    if vertical {
                        plot_ui.vline(VLine::new(at).color(separator).width(1.0));
                    } else {
                        plot_ui.hline(HLine::new(at).color(separator).width(1.0));
                    }
                }
                let (x, y) = scene.point(group.anchor, scene.value_max * 0.97);
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    RichText::new(&group.label)
                        .size(settings.font_size)
                        .strong()
                        .color(Color32::BLACK),
                ));
            }

            if settings.show_values {
                let pad = scene.value_max * 0.03;
                for bar in scene.bars.iter().filter(|b| b.value > 0.0) {
                    let at = match settings.value_placement {
                        ValuePlacement::Outside => bar.value + pad,
                        ValuePlacement::Inside => bar.value / 2.0,
                    };
                    let (x, y) = scene.point(bar.center, at);
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(settings.format_value(bar.value))
                            .size(settings.tick_font_size)
                            .color(Color32::BLACK),
                    ));
                }
            }
        });
    }
}
