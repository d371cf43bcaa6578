//! Chart Settings
//! Every styling option exposed in the side panel, with the slider ranges.

use crate::charts::{palette_by_index, Rgb, DEFAULT_PALETTE};
use std::ops::RangeInclusive;

pub const FONT_SIZE_RANGE: RangeInclusive<f32> = 8.0..=32.0;
pub const TICK_FONT_SIZE_RANGE: RangeInclusive<f32> = 6.0..=28.0;
pub const TICK_LENGTH_RANGE: RangeInclusive<u32> = 2..=15;
pub const BAR_WIDTH_RANGE: RangeInclusive<f64> = 0.1..=0.6;
pub const GROUP_GAP_RANGE: RangeInclusive<f64> = 1.0..=5.0;
pub const PAIR_GAP_RANGE: RangeInclusive<f64> = 0.05..=1.2;
pub const DPI_RANGE: RangeInclusive<u32> = 72..=300;

pub const FONT_FAMILIES: [&str; 6] = [
    "DejaVu Sans",
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Courier New",
    "Verdana",
];

/// One value per row, or one per cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    SingleValue,
    TwoCohort,
}

impl ChartMode {
    pub fn value_slots(self) -> usize {
        match self {
            ChartMode::SingleValue => 1,
            ChartMode::TwoCohort => 2,
        }
    }
}

/// What the numbers in the table mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    RiskPercent,
    RelativeRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePlacement {
    Outside,
    Inside,
}

/// User settings for the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub mode: ChartMode,
    pub value_kind: ValueKind,
    pub cohort_names: [String; 2],
    pub palette_index: usize,
    pub cohort_colors: [Rgb; 2],
    pub orientation: Orientation,
    pub font_family: String,
    pub font_size: f32,
    pub tick_font_size: f32,
    pub major_tick_length: u32,
    pub minor_ticks: bool,
    pub bar_width: f64,
    pub group_gap: f64,
    pub pair_gap: f64,
    pub gridlines: bool,
    pub show_legend: bool,
    pub show_values: bool,
    pub value_placement: ValuePlacement,
    pub value_axis_title: String,
    pub category_axis_title: String,
    pub grayscale: bool,
    pub dpi: u32,
    pub open_after_export: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        let (_, colors) = palette_by_index(DEFAULT_PALETTE);
        Self {
            mode: ChartMode::TwoCohort,
            value_kind: ValueKind::RiskPercent,
            cohort_names: ["Cohort 1".to_string(), "Cohort 2".to_string()],
            palette_index: DEFAULT_PALETTE,
            cohort_colors: colors,
            orientation: Orientation::Horizontal,
            font_family: FONT_FAMILIES[0].to_string(),
            font_size: 14.0,
            tick_font_size: 11.0,
            major_tick_length: 8,
            minor_ticks: true,
            bar_width: 0.26,
            group_gap: 2.3,
            pair_gap: 0.32,
            gridlines: true,
            show_legend: true,
            show_values: true,
            value_placement: ValuePlacement::Outside,
            value_axis_title: "Risk (%)".to_string(),
            category_axis_title: "Outcome".to_string(),
            grayscale: false,
            dpi: 300,
            open_after_export: false,
        }
    }
}

fn clamp_f64(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        *range.start()
    }
}

impl ChartSettings {
    /// Copy with every numeric option clamped into its slider range.
    pub fn sanitized(&self) -> Self {
        let mut s = self.clone();
        s.font_size = s
            .font_size
            .clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end());
        s.tick_font_size = s
            .tick_font_size
            .clamp(*TICK_FONT_SIZE_RANGE.start(), *TICK_FONT_SIZE_RANGE.end());
        s.major_tick_length = s
            .major_tick_length
            .clamp(*TICK_LENGTH_RANGE.start(), *TICK_LENGTH_RANGE.end());
        s.bar_width = clamp_f64(s.bar_width, &BAR_WIDTH_RANGE);
        s.group_gap = clamp_f64(s.group_gap, &GROUP_GAP_RANGE);
        s.pair_gap = clamp_f64(s.pair_gap, &PAIR_GAP_RANGE);
        s.dpi = s.dpi.clamp(*DPI_RANGE.start(), *DPI_RANGE.end());
        s
    }

    /// Apply a named palette to both cohort colors.
    pub fn select_palette(&mut self, index: usize) {
        let (_, colors) = palette_by_index(index);
        self.palette_index = index;
        self.cohort_colors = colors;
    }

    /// Color for a cohort slot, after the grayscale override.
    pub fn cohort_color(&self, cohort: usize) -> Rgb {
        let color = self.cohort_colors[cohort.min(1)];
        self.finish_color(color)
    }

    pub fn finish_color(&self, color: Rgb) -> Rgb {
        if self.grayscale {
            color.to_grayscale()
        } else {
            color
        }
    }

    /// Cohort name shown in legends, falling back to a numbered name.
    pub fn cohort_name(&self, cohort: usize) -> String {
        let name = self
            .cohort_names
            .get(cohort)
            .map(|n| n.trim())
            .unwrap_or_default();
        if name.is_empty() {
            format!("Cohort {}", cohort + 1)
        } else {
            name.to_string()
        }
    }

    /// Switch value meaning and retitle the axis if it still has the stock title.
    pub fn set_value_kind(&mut self, kind: ValueKind) {
        let stock = [
            Self::value_title(ValueKind::RiskPercent),
            Self::value_title(ValueKind::RelativeRisk),
        ];
        let title = self.value_axis_title.as_str();
        if title.is_empty() || stock.contains(&title) {
            self.value_axis_title = Self::value_title(kind).to_string();
        }
        self.value_kind = kind;
    }

    fn value_title(kind: ValueKind) -> &'static str {
        match kind {
            ValueKind::RiskPercent => "Risk (%)",
            ValueKind::RelativeRisk => "Relative Risk",
        }
    }

    /// Text drawn next to a bar.
    pub fn format_value(&self, value: f64) -> String {
        match self.value_kind {
            ValueKind::RiskPercent => format!("{:.2}%", value),
            ValueKind::RelativeRisk => format!("{:.2}", value),
        }
    }

    /// Reference line drawn across the value axis.
    pub fn reference_line(&self) -> Option<f64> {
        match self.value_kind {
            ValueKind::RiskPercent => None,
            ValueKind::RelativeRisk => Some(1.0),
        }
    }

    /// Upper end of the value axis.
    pub fn value_axis_max(&self, max_value: Option<f64>) -> f64 {
        let max = max_value.unwrap_or(0.0).max(0.0);
        let top = max * 1.12 + 1.0;
        match self.reference_line() {
            Some(r) => top.max(r * 1.12),
            None => top,
        }
    }
}
