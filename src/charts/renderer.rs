//! Static Chart Renderer
//! Draws the chart scene with plotters into an in-memory PNG for download.
//!
//! Layout:
//! 1. Plot area with bars, value labels, group headings and separators
//! 2. Category and value axes with titles
//! 3. Legend to the right of the plot when enabled

use crate::charts::{ChartScene, Rgb};
use crate::data::ChartLayout;
use crate::settings::{ChartSettings, Orientation, ValuePlacement};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use thiserror::Error;

type ChartCoord = Cartesian2d<RangedCoordf64, RangedCoordf64>;

/// Largest edge of an exported image, in pixels.
const MAX_EDGE_PX: u32 = 8000;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Image buffer has the wrong size")]
    Buffer,
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Figure size in pixels.
    ///
    /// The category axis grows with the bar count: `max(7, 1.2 * n * gap)`
    /// inches vertically, `max(5.2, 0.6 * n * gap)` inches horizontally.
    pub fn figure_size(layout: &ChartLayout, settings: &ChartSettings) -> (u32, u32) {
        let n = layout.bars.len() as f64;
        let dpi = settings.dpi as f64;
        let (w_in, h_in) = match settings.orientation {
            Orientation::Vertical => ((1.2 * n * layout.spacing).max(7.0), 5.2),
            Orientation::Horizontal => (9.0, (0.6 * n * layout.spacing).max(5.2)),
        };
        let px = |inches: f64| ((inches * dpi).round() as u32).clamp(1, MAX_EDGE_PX);
        (px(w_in), px(h_in))
    }

    /// Render the chart to PNG bytes.
    pub fn render_png(
        layout: &ChartLayout,
        settings: &ChartSettings,
    ) -> Result<Vec<u8>, RenderError> {
        let settings = settings.sanitized();
        let (width, height) = Self::figure_size(layout, &settings);
        let scene = ChartScene::build(layout, &settings);

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&Rgb::BACKGROUND.to_plotters()).map_err(draw_err)?;

            if scene.is_empty() {
                Self::draw_placeholder(&root, &settings, width, height)?;
            } else {
                Self::draw_chart(&root, &scene, &settings, width)?;
            }
            root.present().map_err(draw_err)?;
        }

        let image = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

        tracing::debug!(width, height, bytes = bytes.len(), "rendered chart PNG");
        Ok(bytes)
    }

    /// Points to pixels at the export DPI.
    fn pt(settings: &ChartSettings, points: f32) -> f64 {
        points as f64 * settings.dpi as f64 / 72.0
    }

    fn draw_placeholder<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        settings: &ChartSettings,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let font_px = Self::pt(settings, settings.font_size);
        let style = TextStyle::from((settings.font_family.as_str(), font_px).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center))
            .color(&BLACK);
        root.draw(&Text::new(
            "No data to plot.",
            (width as i32 / 2, height as i32 / 2),
            style,
        ))
        .map_err(draw_err)
    }

    fn draw_chart<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        scene: &ChartScene,
        settings: &ChartSettings,
        width: u32,
    ) -> Result<(), RenderError> {
        let font = settings.font_family.as_str();
        let text_px = Self::pt(settings, settings.font_size);
        let tick_px = Self::pt(settings, settings.tick_font_size);
        let black = Rgb::BLACK.to_plotters();

        let (plot_area, legend_area) = if settings.show_legend {
            let split = (width as f64 * 0.82) as i32;
            let (plot, legend) = root.split_horizontally(split);
            (plot, Some(legend))
        } else {
            (root.clone(), None)
        };

        let (cat_lo, cat_hi) = scene.category_range;
        let value_max = scene.value_max;
        let value_keys = scene.value_ticks(8);

        let value_fmt = |v: &f64| {
            let text = format!("{:.2}", v);
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        };

        let label_area = Self::pt(settings, settings.tick_font_size * 1.4) as u32;
        let category_label_area = match settings.orientation {
            Orientation::Vertical => label_area * 3,
            Orientation::Horizontal => {
                let longest = scene
                    .category_ticks
                    .iter()
                    .map(|(_, l)| l.chars().count())
                    .max()
                    .unwrap_or(0) as f64;
                (longest * tick_px * 0.6) as u32 + label_area
            }
        };

        // Category ticks sit on bar centers, so the mesh only labels the value axis.
        let value_labels = value_keys.len().max(2);
        let (x_axis, y_axis, x_title, y_title, x_area, y_area, x_count, y_count) =
            match settings.orientation {
                Orientation::Vertical => (
                    cat_lo..cat_hi,
                    0f64..value_max,
                    settings.category_axis_title.as_str(),
                    settings.value_axis_title.as_str(),
                    category_label_area,
                    label_area * 2,
                    0,
                    value_labels,
                ),
                Orientation::Horizontal => (
                    0f64..value_max,
                    cat_lo..cat_hi,
                    settings.value_axis_title.as_str(),
                    settings.category_axis_title.as_str(),
                    label_area * 2,
                    category_label_area,
                    value_labels,
                    0,
                ),
            };

        let title_area = Self::pt(settings, settings.font_size + 4.0) as u32;
        let mut chart = ChartBuilder::on(&plot_area)
            .margin(Self::pt(settings, 10.0) as u32)
            .x_label_area_size(x_area + title_area)
            .y_label_area_size(y_area + title_area)
            .build_cartesian_2d(x_axis, y_axis)
            .map_err(draw_err)?;

        let tick_len = Self::pt(settings, settings.major_tick_length as f32) as i32;
        let grid_color = Rgb::GRID.to_plotters();
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(x_count)
            .y_labels(y_count)
            .x_label_formatter(&value_fmt)
            .y_label_formatter(&value_fmt)
            .x_desc(x_title)
            .y_desc(y_title)
            .label_style((font, tick_px))
            .axis_desc_style((font, text_px + Self::pt(settings, 2.0)))
            .set_tick_mark_size(LabelAreaPosition::Left, tick_len)
            .set_tick_mark_size(LabelAreaPosition::Bottom, tick_len)
            .bold_line_style(grid_color)
            .max_light_lines(0)
            .axis_style(black);
        match (settings.gridlines, settings.orientation) {
            (false, _) => {
                mesh.disable_mesh();
            }
            (true, Orientation::Vertical) => {
                mesh.disable_x_mesh();
            }
            (true, Orientation::Horizontal) => {
                mesh.disable_y_mesh();
            }
        }
        mesh.draw().map_err(draw_err)?;

        if settings.minor_ticks && settings.gridlines {
            for minor in minor_ticks(&value_keys) {
                chart
                    .draw_series(LineSeries::new(
                        vec![scene.point(cat_lo, minor), scene.point(cat_hi, minor)],
                        grid_color.mix(0.4).stroke_width(1),
                    ))
                    .map_err(draw_err)?;
            }
        }

        Self::draw_category_ticks(root, &chart, scene, settings, tick_len)?;

        let half = settings.bar_width / 2.0;
        chart
            .draw_series(scene.bars.iter().map(|bar| {
                Rectangle::new(
                    [
                        scene.point(bar.center - half, 0.0),
                        scene.point(bar.center + half, bar.value),
                    ],
                    bar.color.to_plotters().filled(),
                )
            }))
            .map_err(draw_err)?;

        if let Some(reference) = settings.reference_line() {
            chart
                .draw_series(LineSeries::new(
                    vec![scene.point(cat_lo, reference), scene.point(cat_hi, reference)],
                    black.stroke_width(1),
                ))
                .map_err(draw_err)?;
        }

        if settings.show_values {
            let label_px = Self::pt(settings, settings.font_size - 1.0);
            let pad = value_max * 0.01;
            let labels: Vec<_> = scene
                .bars
                .iter()
                .filter(|bar| bar.value > 0.0)
                .map(|bar| {
                    let (value_at, pos) = match (settings.value_placement, settings.orientation) {
                        (ValuePlacement::Outside, Orientation::Vertical) => {
                            (bar.value + pad, Pos::new(HPos::Center, VPos::Bottom))
                        }
                        (ValuePlacement::Outside, Orientation::Horizontal) => {
                            (bar.value + pad, Pos::new(HPos::Left, VPos::Center))
                        }
                        (ValuePlacement::Inside, _) => {
                            (bar.value / 2.0, Pos::new(HPos::Center, VPos::Center))
                        }
                    };
                    let style = TextStyle::from((font, label_px).into_font())
                        .pos(pos)
                        .color(&black);
                    Text::new(
                        settings.format_value(bar.value),
                        scene.point(bar.center, value_at),
                        style,
                    )
                })
                .collect();
            chart.draw_series(labels).map_err(draw_err)?;
        }

        Self::draw_groups(&mut chart, scene, settings)?;

        if let Some(legend_area) = legend_area {
            Self::draw_legend(&legend_area, scene, settings)?;
        }

        Ok(())
    }

    /// Tick marks and bar labels along the category axis, drawn in pixel space.
    fn draw_category_ticks<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        chart: &ChartContext<'_, DB, ChartCoord>,
        scene: &ChartScene,
        settings: &ChartSettings,
        tick_len: i32,
    ) -> Result<(), RenderError> {
        let font = settings.font_family.as_str();
        let tick_px = Self::pt(settings, settings.tick_font_size);
        let gap = (tick_px * 0.3) as i32;
        let black = Rgb::BLACK.to_plotters();

        for (category, label) in &scene.category_ticks {
            let (x, y) = chart.backend_coord(&scene.point(*category, 0.0));
            let (tick_end, text_at, pos) = match settings.orientation {
                Orientation::Vertical => (
                    (x, y + tick_len),
                    (x, y + tick_len + gap),
                    Pos::new(HPos::Center, VPos::Top),
                ),
                Orientation::Horizontal => (
                    (x - tick_len, y),
                    (x - tick_len - gap, y),
                    Pos::new(HPos::Right, VPos::Center),
                ),
            };
            root.draw(&PathElement::new(vec![(x, y), tick_end], black))
                .map_err(draw_err)?;
            let style = TextStyle::from((font, tick_px).into_font())
                .pos(pos)
                .color(&black);
            root.draw(&Text::new(label.clone(), text_at, style))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_groups<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, ChartCoord>,
        scene: &ChartScene,
        settings: &ChartSettings,
    ) -> Result<(), RenderError> {
        let font = settings.font_family.as_str();
        let heading_px = Self::pt(settings, settings.font_size + 1.0);
        let black = Rgb::BLACK.to_plotters();
        let separator_color = Rgb(0x99, 0x99, 0x99).to_plotters();
        let value_max = scene.value_max;

        for group in &scene.groups {
            if let Some(at) = group.separator {
                chart
                    .draw_series(LineSeries::new(
                        vec![scene.point(at, 0.0), scene.point(at, value_max)],
                        separator_color.stroke_width(1),
                    ))
                    .map_err(draw_err)?;
            }

            let (anchor, pos) = match settings.orientation {
                Orientation::Vertical => (
                    scene.point(group.anchor, value_max * 0.99),
                    Pos::new(HPos::Center, VPos::Top),
                ),
                Orientation::Horizontal => (
                    scene.point(group.anchor + scene_half_slot(scene), value_max * 0.01),
                    Pos::new(HPos::Left, VPos::Top),
                ),
            };
            let style = TextStyle::from((font, heading_px, FontStyle::Bold).into_font())
                .pos(pos)
                .color(&black);
            chart
                .draw_series(std::iter::once(Text::new(group.label.clone(), anchor, style)))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_legend<DB: DrawingBackend>(
        area: &DrawingArea<DB, plotters::coord::Shift>,
        scene: &ChartScene,
        settings: &ChartSettings,
    ) -> Result<(), RenderError> {
        let text_px = Self::pt(settings, settings.font_size + 1.0);
        let box_px = text_px as i32;
        let row_px = (text_px * 1.5) as i32;
        let x = (text_px * 0.5) as i32;
        let mut y = (text_px * 1.5) as i32;

        for (name, color) in &scene.legend {
            area.draw(&Rectangle::new(
                [(x, y), (x + box_px, y + box_px)],
                color.to_plotters().filled(),
            ))
            .map_err(draw_err)?;
            let style = TextStyle::from((settings.font_family.as_str(), text_px).into_font())
                .pos(Pos::new(HPos::Left, VPos::Top))
                .color(&BLACK);
            area.draw(&Text::new(name.clone(), (x + box_px + box_px / 2, y), style))
                .map_err(draw_err)?;
            y += row_px;
        }
        Ok(())
    }
}

/// Midpoints between neighbouring value ticks.
fn minor_ticks(major: &[f64]) -> Vec<f64> {
    major.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
}

/// Half of the distance between neighbouring bars.
fn scene_half_slot(scene: &ChartScene) -> f64 {
    match scene.category_ticks.as_slice() {
        [first, second, ..] => (second.0 - first.0).abs() / 2.0,
        _ => (scene.category_range.1 - scene.category_range.0) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{build_layout, EditableTable, Row};
    use crate::settings::ChartMode;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row::classify(&format!("r{i}"), vec![Some(i as f64 + 1.0)], None, None))
            .collect()
    }

    #[test]
    fn test_figure_size_grows_with_bars() {
        let settings = ChartSettings {
            orientation: Orientation::Vertical,
            dpi: 100,
            ..Default::default()
        };
        let small = StaticChartRenderer::figure_size(&build_layout(&rows(2), 2.3), &settings);
        assert_eq!(small, (700, 520));
        let large = StaticChartRenderer::figure_size(&build_layout(&rows(10), 2.3), &settings);
        assert_eq!(large, (2760, 520));
    }

    #[test]
    fn test_figure_size_horizontal() {
        let settings = ChartSettings {
            dpi: 100,
            ..Default::default()
        };
        let size = StaticChartRenderer::figure_size(&build_layout(&rows(10), 2.0), &settings);
        assert_eq!(size, (900, 1200));
    }

    #[test]
    fn test_figure_size_is_capped() {
        let settings = ChartSettings {
            orientation: Orientation::Vertical,
            dpi: 300,
            ..Default::default()
        };
        let (w, _) = StaticChartRenderer::figure_size(&build_layout(&rows(500), 5.0), &settings);
        assert_eq!(w, MAX_EDGE_PX);
    }

    #[test]
    fn test_half_slot() {
        let layout = build_layout(&rows(3), 2.0);
        let scene = ChartScene::build(&layout, &ChartSettings::default());
        assert_eq!(scene_half_slot(&scene), 1.0);
    }

    #[test]
    fn test_minor_ticks_are_midpoints() {
        assert_eq!(minor_ticks(&[0.0, 2.0, 4.0]), vec![1.0, 3.0]);
        assert!(minor_ticks(&[0.0]).is_empty());
    }

    #[test]
    fn test_render_default_table_to_png() {
        let settings = ChartSettings::default();
        let layout = build_layout(&EditableTable::default().to_rows(settings.mode), 2.3);
        let png = StaticChartRenderer::render_png(&layout, &settings).unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_render_vertical_single_value_to_png() {
        let settings = ChartSettings {
            mode: ChartMode::SingleValue,
            orientation: Orientation::Vertical,
            minor_ticks: false,
            show_legend: false,
            dpi: 100,
            ..Default::default()
        };
        let layout = build_layout(&rows(4), settings.group_gap);
        let png = StaticChartRenderer::render_png(&layout, &settings).unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_render_empty_layout_draws_placeholder() {
        let settings = ChartSettings::default();
        let layout = build_layout(&[], 2.3);
        let png = StaticChartRenderer::render_png(&layout, &settings).unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));

        let decoded = image::load_from_memory(&png).unwrap();
        let (w, h) = StaticChartRenderer::figure_size(&layout, &settings);
        assert_eq!((decoded.width(), decoded.height()), (w, h));
    }
}
