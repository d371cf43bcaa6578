//! Chart Layout Module
//! Turns the classified table rows into positioned bars and group markers.

use crate::charts::Rgb;

/// Prefix that marks a table row as a group heading.
pub const HEADER_PREFIX: &str = "##";

/// One classified table row.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Group heading, label already stripped of the marker.
    Header { label: String },
    /// Outcome row with one value per cohort.
    Data {
        label: String,
        values: Vec<Option<f64>>,
        series: Option<String>,
        color: Option<Rgb>,
    },
}

impl Row {
    /// Classify a raw label into a header or data row.
    pub fn classify(
        label: &str,
        values: Vec<Option<f64>>,
        series: Option<String>,
        color: Option<Rgb>,
    ) -> Self {
        if label.starts_with(HEADER_PREFIX) {
            Row::Header {
                label: label.trim_start_matches('#').trim().to_string(),
            }
        } else {
            Row::Data {
                label: label.trim().to_string(),
                values,
                series,
                color,
            }
        }
    }
}

/// Parse a numeric cell. Blank, unparseable and non-finite cells are missing.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_suffix('%').unwrap_or(text).trim_end();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A plottable bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    /// One entry per cohort; the first is always present.
    pub values: Vec<Option<f64>>,
    pub position: f64,
    pub group: Option<String>,
    /// Key used for per-label color assignment.
    pub color_key: String,
    pub color: Option<Rgb>,
}

/// A single drawn rectangle of a bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubBar {
    pub cohort: usize,
    pub center: f64,
    pub value: f64,
}

impl Bar {
    /// First cohort value.
    pub fn value(&self) -> f64 {
        self.values.first().copied().flatten().unwrap_or_default()
    }

    /// Present values with symmetric offsets around the bar position.
    pub fn sub_bars(&self, pair_gap: f64) -> Vec<SubBar> {
        let n = self.values.len();
        let mid = (n as f64 - 1.0) / 2.0;
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| {
                v.map(|value| SubBar {
                    cohort: i,
                    center: self.position + (i as f64 - mid) * pair_gap,
                    value,
                })
            })
            .collect()
    }

    pub fn max_value(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Group heading annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMarker {
    pub label: String,
    /// Position of the first bar after the heading.
    pub boundary: f64,
}

/// Bars and markers for one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartLayout {
    pub bars: Vec<Bar>,
    pub markers: Vec<GroupMarker>,
    pub spacing: f64,
}

impl ChartLayout {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Largest present value across all bars, if any.
    pub fn max_value(&self) -> Option<f64> {
        self.bars
            .iter()
            .map(Bar::max_value)
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }

    /// Position one past the last bar.
    pub fn end_position(&self) -> f64 {
        self.bars.len() as f64 * self.spacing
    }

    /// Number of cohort slots the widest bar carries.
    pub fn cohort_count(&self) -> usize {
        self.bars.iter().map(|b| b.values.len()).max().unwrap_or(0)
    }
}

/// Build the chart layout from the row sequence.
///
/// Bars are placed at `index * spacing` in input order. Each header yields one
/// marker whose boundary is the position the next bar receives.
pub fn build_layout(rows: &[Row], spacing: f64) -> ChartLayout {
    let spacing = if spacing.is_finite() && spacing > 0.0 {
        spacing
    } else {
        1.0
    };

    let mut bars: Vec<Bar> = Vec::new();
    let mut markers = Vec::new();
    let mut current_group: Option<String> = None;

    for row in rows {
        match row {
            Row::Header { label } => {
                markers.push(GroupMarker {
                    label: label.clone(),
                    boundary: bars.len() as f64 * spacing,
                });
                current_group = Some(label.clone());
            }
            Row::Data {
                label,
                values,
                series,
                color,
            } => {
                if label.trim().is_empty() {
                    continue;
                }
                let first = values.first().copied().flatten();
                if !first.is_some_and(f64::is_finite) {
                    continue;
                }

                let values = values
                    .iter()
                    .map(|v| v.filter(|x| x.is_finite()))
                    .collect();
                let color_key = series
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(label.as_str())
                    .to_string();

                bars.push(Bar {
                    label: label.clone(),
                    values,
                    position: bars.len() as f64 * spacing,
                    group: current_group.clone(),
                    color_key,
                    color: *color,
                });
            }
        }
    }

    tracing::trace!(bars = bars.len(), markers = markers.len(), "layout rebuilt");

    ChartLayout {
        bars,
        markers,
        spacing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(label: &str, value: Option<f64>) -> Row {
        Row::classify(label, vec![value], None, None)
    }

    fn pair(label: &str, a: Option<f64>, b: Option<f64>) -> Row {
        Row::classify(label, vec![a, b], None, None)
    }

    fn header(label: &str) -> Row {
        Row::classify(label, Vec::new(), None, None)
    }

    #[test]
    fn test_plain_rows_get_sequential_positions() {
        let rows = vec![data("Diabetes", Some(11.2)), data("Anemia", Some(13.5))];
        let layout = build_layout(&rows, 1.0);

        assert!(layout.markers.is_empty());
        assert_eq!(layout.bars.len(), 2);
        assert_eq!(layout.bars[0].label, "Diabetes");
        assert_eq!(layout.bars[0].position, 0.0);
        assert_eq!(layout.bars[0].value(), 11.2);
        assert_eq!(layout.bars[1].label, "Anemia");
        assert_eq!(layout.bars[1].position, 1.0);
        assert_eq!(layout.bars[1].value(), 13.5);
    }

    #[test]
    fn test_missing_value_produces_no_bar() {
        let layout = build_layout(&[data("X", None)], 1.0);
        assert!(layout.bars.is_empty());
        assert!(layout.is_empty());
    }

    #[test]
    fn test_blank_label_is_dropped() {
        let layout = build_layout(&[data("   ", Some(4.0)), data("", Some(2.0))], 1.0);
        assert!(layout.bars.is_empty());
    }

    #[test]
    fn test_indented_prefix_is_data() {
        match header("  ##Cardiac") {
            Row::Data { label, .. } => assert_eq!(label, "##Cardiac"),
            other => panic!("expected data row, got {other:?}"),
        }
        let layout = build_layout(&[header("  ##Cardiac")], 1.0);
        assert!(layout.markers.is_empty());
    }

    #[test]
    fn test_header_label_is_stripped() {
        match header("##  Cardiac ") {
            Row::Header { label } => assert_eq!(label, "Cardiac"),
            other => panic!("expected header, got {other:?}"),
        }
        match header("###Cancers") {
            Row::Header { label } => assert_eq!(label, "Cancers"),
            other => panic!("expected header, got {other:?}"),
        }
        assert!(matches!(header("#Single"), Row::Data { .. }));
    }

    #[test]
    fn test_marker_count_matches_headers() {
        let rows = vec![
            header("##A"),
            header("##B"),
            data("x", Some(1.0)),
            data("y", None),
            header("##C"),
        ];
        let layout = build_layout(&rows, 1.0);
        let headers = rows
            .iter()
            .filter(|r| matches!(r, Row::Header { .. }))
            .count();
        assert_eq!(layout.markers.len(), headers);
    }

    #[test]
    fn test_marker_boundary_is_next_bar_position() {
        let rows = vec![
            header("##Cancers"),
            data("Breast", Some(12.1)),
            data("Colon", Some(9.4)),
            header("##Cardiac"),
            data("Broken", None),
            data("Heart Failure", Some(15.3)),
            header("##Trailing"),
        ];
        let layout = build_layout(&rows, 2.0);

        assert_eq!(layout.markers[0].boundary, layout.bars[0].position);
        assert_eq!(layout.markers[1].boundary, layout.bars[2].position);
        assert_eq!(layout.markers[2].boundary, layout.end_position());
        assert_eq!(layout.bars[2].group.as_deref(), Some("Cardiac"));
        assert_eq!(layout.bars[0].group.as_deref(), Some("Cancers"));
    }

    #[test]
    fn test_positions_strictly_increase() {
        let rows: Vec<Row> = (0..20)
            .map(|i| {
                if i % 5 == 0 {
                    header(&format!("##G{i}"))
                } else if i % 3 == 0 {
                    data(&format!("r{i}"), None)
                } else {
                    data(&format!("r{i}"), Some(i as f64))
                }
            })
            .collect();
        let layout = build_layout(&rows, 2.3);
        assert!(layout
            .bars
            .windows(2)
            .all(|w| w[0].position < w[1].position));
    }

    #[test]
    fn test_invalid_spacing_falls_back_to_unit() {
        let rows = vec![data("a", Some(1.0)), data("b", Some(2.0))];
        let layout = build_layout(&rows, 0.0);
        assert_eq!(layout.bars[1].position, 1.0);
        let layout = build_layout(&rows, f64::NAN);
        assert_eq!(layout.bars[1].position, 1.0);
    }

    #[test]
    fn test_build_is_idempotent() {
        let rows = vec![
            header("##Cardiac"),
            pair("MI", Some(11.2), Some(10.5)),
            pair("Stroke", Some(3.0), None),
        ];
        assert_eq!(build_layout(&rows, 2.3), build_layout(&rows, 2.3));
    }

    #[test]
    fn test_two_cohort_sub_bars_are_symmetric() {
        let layout = build_layout(&[pair("MI", Some(11.2), Some(10.5))], 1.0);
        let subs = layout.bars[0].sub_bars(0.32);
        assert_eq!(subs.len(), 2);
        assert!((subs[0].center + 0.16).abs() < 1e-12);
        assert!((subs[1].center - 0.16).abs() < 1e-12);
        assert_eq!(subs[0].cohort, 0);
        assert_eq!(subs[1].value, 10.5);
    }

    #[test]
    fn test_missing_second_cohort_keeps_bar() {
        let layout = build_layout(
            &[
                pair("A", Some(1.0), None),
                pair("B", None, Some(2.0)),
            ],
            1.0,
        );
        assert_eq!(layout.bars.len(), 1);
        assert_eq!(layout.bars[0].sub_bars(0.3).len(), 1);
        assert_eq!(layout.cohort_count(), 2);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 12.5 "), Some(12.5));
        assert_eq!(parse_value("9.4%"), Some(9.4));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("n/a"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("NaN"), None);
    }

    #[test]
    fn test_color_key_prefers_series() {
        let rows = vec![
            Row::classify("MI", vec![Some(1.0)], Some("Cohort 1".into()), None),
            Row::classify("Stroke", vec![Some(2.0)], Some("  ".into()), None),
        ];
        let layout = build_layout(&rows, 1.0);
        assert_eq!(layout.bars[0].color_key, "Cohort 1");
        assert_eq!(layout.bars[1].color_key, "Stroke");
    }

    #[test]
    fn test_max_value() {
        let layout = build_layout(
            &[pair("A", Some(1.0), Some(7.5)), pair("B", Some(3.0), None)],
            2.0,
        );
        assert_eq!(layout.max_value(), Some(7.5));
        assert_eq!(ChartLayout::default().max_value(), None);
    }
}
