//! Chart Scene
//! Resolves a layout plus settings into colored rectangles, labels and axis
//! extents. Both the interactive preview and the PNG renderer draw from this.

use crate::charts::{LabelColors, Rgb, LABEL_PALETTE};
use crate::data::ChartLayout;
use crate::settings::{ChartMode, ChartSettings, Orientation};

/// One rectangle to draw, in chart coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBar {
    /// Index into `ChartScene::legend`; `None` for bars with an explicit color.
    pub legend: Option<usize>,
    /// Category-axis center after orientation is applied.
    pub center: f64,
    pub value: f64,
    pub color: Rgb,
}

/// Group heading placed on the category axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGroup {
    pub label: String,
    /// Category coordinate of the first bar in the group.
    pub anchor: f64,
    /// Category coordinate of the separator before the group, if it has one.
    pub separator: Option<f64>,
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub bars: Vec<SceneBar>,
    pub groups: Vec<SceneGroup>,
    /// Tick positions and texts along the category axis.
    pub category_ticks: Vec<(f64, String)>,
    pub category_range: (f64, f64),
    pub value_max: f64,
    pub legend: Vec<(String, Rgb)>,
    pub orientation: Orientation,
}

impl ChartScene {
    pub fn build(layout: &ChartLayout, settings: &ChartSettings) -> Self {
        let spacing = layout.spacing.max(f64::EPSILON);
        let last = layout.bars.last().map(|b| b.position).unwrap_or(0.0);
        let orientation = settings.orientation;
        // Horizontal charts list the first row at the top.
        let to_category = |position: f64| match orientation {
            Orientation::Vertical => position,
            Orientation::Horizontal => last - position,
        };

        let mut label_colors = LabelColors::new(&LABEL_PALETTE);
        let mut bars = Vec::new();
        for bar in &layout.bars {
            match settings.mode {
                ChartMode::TwoCohort => {
                    for sub in bar.sub_bars(settings.pair_gap) {
                        let offset = sub.center - bar.position;
                        let center = match orientation {
                            Orientation::Vertical => to_category(bar.position) + offset,
                            // Keep cohort 1 above cohort 2 after flipping.
                            Orientation::Horizontal => to_category(bar.position) - offset,
                        };
                        bars.push(SceneBar {
                            legend: Some(sub.cohort),
                            center,
                            value: sub.value,
                            color: settings.cohort_color(sub.cohort),
                        });
                    }
                }
                ChartMode::SingleValue => {
                    let (color, legend) = match bar.color {
                        Some(c) => (c, None),
                        None => (
                            label_colors.color_for(&bar.color_key),
                            label_colors.position(&bar.color_key),
                        ),
                    };
                    bars.push(SceneBar {
                        legend,
                        center: to_category(bar.position),
                        value: bar.value(),
                        color: settings.finish_color(color),
                    });
                }
            }
        }

        let legend = match settings.mode {
            ChartMode::TwoCohort => (0..layout.cohort_count().max(1))
                .map(|c| (settings.cohort_name(c), settings.cohort_color(c)))
                .collect(),
            ChartMode::SingleValue => label_colors
                .entries()
                .iter()
                .map(|(key, color)| (key.clone(), settings.finish_color(*color)))
                .collect(),
        };

        let end = layout.end_position();
        let groups = layout
            .markers
            .iter()
            .filter(|m| m.boundary < end && !m.label.is_empty())
            .map(|m| {
                let separator = (m.boundary > 0.0).then(|| match orientation {
                    Orientation::Vertical => m.boundary - spacing / 2.0,
                    Orientation::Horizontal => to_category(m.boundary) + spacing / 2.0,
                });
                SceneGroup {
                    label: m.label.clone(),
                    anchor: to_category(m.boundary),
                    separator,
                }
            })
            .collect();

        let mut category_ticks: Vec<(f64, String)> = layout
            .bars
            .iter()
            .map(|b| (to_category(b.position), b.label.clone()))
            .collect();
        category_ticks.sort_by(|a, b| a.0.total_cmp(&b.0));

        ChartScene {
            bars,
            groups,
            category_ticks,
            category_range: (-spacing / 2.0, last + spacing / 2.0),
            value_max: settings.value_axis_max(layout.max_value()),
            legend,
            orientation,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Map (category, value) to (x, y) for the current orientation.
    pub fn point(&self, category: f64, value: f64) -> (f64, f64) {
        match self.orientation {
            Orientation::Vertical => (category, value),
            Orientation::Horizontal => (value, category),
        }
    }

    /// Tick text for a category coordinate.
    pub fn category_label(&self, category: f64) -> String {
        self.category_ticks
            .iter()
            .find(|(pos, _)| (pos - category).abs() < 1e-6)
            .map(|(_, label)| label.clone())
            .unwrap_or_default()
    }

    /// Evenly spaced value-axis ticks between zero and the axis maximum.
    pub fn value_ticks(&self, target_steps: usize) -> Vec<f64> {
        let step = nice_step(self.value_max, target_steps);
        let count = (self.value_max / step + 1e-9).floor() as usize;
        (0..=count).map(|i| i as f64 * step).collect()
    }
}

/// Round a raw step to 1, 2 or 5 times a power of ten.
pub fn nice_step(range: f64, target_steps: usize) -> f64 {
    if !(range.is_finite() && range > 0.0) {
        return 1.0;
    }
    let raw_step = range / target_steps.max(1) as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{build_layout, Row};

    fn single(label: &str, v: f64) -> Row {
        Row::classify(label, vec![Some(v)], None, None)
    }

    #[test]
    fn test_repeated_labels_get_same_color() {
        let settings = ChartSettings {
            mode: ChartMode::SingleValue,
            ..Default::default()
        };
        let layout = build_layout(
            &[
                single("Cohort 1", 1.0),
                single("Cohort 2", 2.0),
                single("Cohort 1", 3.0),
            ],
            1.0,
        );
        let scene = ChartScene::build(&layout, &settings);
        assert_eq!(scene.bars[0].color, scene.bars[2].color);
        assert_ne!(scene.bars[0].color, scene.bars[1].color);
        assert_eq!(scene.legend.len(), 2);
        assert_eq!(scene.bars[2].legend, Some(0));
    }

    #[test]
    fn test_explicit_color_wins() {
        let settings = ChartSettings {
            mode: ChartMode::SingleValue,
            ..Default::default()
        };
        let rows = vec![Row::classify("A", vec![Some(1.0)], None, Rgb::from_hex("#010203"))];
        let scene = ChartScene::build(&build_layout(&rows, 1.0), &settings);
        assert_eq!(scene.bars[0].color, Rgb(1, 2, 3));
        assert_eq!(scene.bars[0].legend, None);
        assert!(scene.legend.is_empty());
    }

    #[test]
    fn test_two_cohort_colors_and_legend() {
        let settings = ChartSettings {
            orientation: Orientation::Vertical,
            ..Default::default()
        };
        let rows = vec![Row::classify("MI", vec![Some(11.2), Some(10.5)], None, None)];
        let scene = ChartScene::build(&build_layout(&rows, 2.3), &settings);
        assert_eq!(scene.bars.len(), 2);
        assert_eq!(scene.bars[0].color, settings.cohort_color(0));
        assert_eq!(scene.bars[1].color, settings.cohort_color(1));
        assert!(scene.bars[0].center < scene.bars[1].center);
        assert_eq!(scene.legend[1].0, "Cohort 2");
        assert_eq!(scene.bars[1].legend, Some(1));
    }

    #[test]
    fn test_same_colored_cohorts_keep_separate_legend_entries() {
        let mut settings = ChartSettings::default();
        settings.cohort_colors = [Rgb(9, 9, 9), Rgb(9, 9, 9)];
        let rows = vec![Row::classify("MI", vec![Some(11.2), Some(10.5)], None, None)];
        let scene = ChartScene::build(&build_layout(&rows, 2.3), &settings);
        assert_eq!(scene.legend[0].1, scene.legend[1].1);
        let legends: Vec<_> = scene.bars.iter().map(|b| b.legend).collect();
        assert_eq!(legends, vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_horizontal_puts_first_row_on_top() {
        let settings = ChartSettings {
            mode: ChartMode::SingleValue,
            orientation: Orientation::Horizontal,
            ..Default::default()
        };
        let layout = build_layout(&[single("A", 1.0), single("B", 2.0)], 1.0);
        let scene = ChartScene::build(&layout, &settings);
        assert_eq!(scene.bars[0].center, 1.0);
        assert_eq!(scene.category_label(1.0), "A");
        assert_eq!(scene.category_label(0.0), "B");
        assert_eq!(scene.point(1.0, 5.0), (5.0, 1.0));
    }

    #[test]
    fn test_groups_skip_trailing_headers() {
        let settings = ChartSettings {
            mode: ChartMode::SingleValue,
            orientation: Orientation::Vertical,
            ..Default::default()
        };
        let rows = vec![
            Row::classify("##First", vec![], None, None),
            single("A", 1.0),
            Row::classify("##Second", vec![], None, None),
            single("B", 2.0),
            Row::classify("##Empty tail", vec![], None, None),
        ];
        let scene = ChartScene::build(&build_layout(&rows, 2.0), &settings);
        assert_eq!(scene.groups.len(), 2);
        assert_eq!(scene.groups[0].separator, None);
        assert_eq!(scene.groups[1].anchor, 2.0);
        assert_eq!(scene.groups[1].separator, Some(1.0));
    }

    #[test]
    fn test_value_ticks() {
        assert_eq!(nice_step(12.2, 5), 5.0);
        assert_eq!(nice_step(0.0, 5), 1.0);
        let scene = ChartScene::build(&ChartLayout::default(), &ChartSettings::default());
        assert!(scene.is_empty());
        let ticks = scene.value_ticks(5);
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0], 0.0);
        assert!((ticks[5] - 1.0).abs() < 1e-9);
    }
}
