//! Color palettes and per-label color assignment.

use std::collections::HashMap;
use std::fmt;

/// Plain 8-bit RGB color shared by the preview and the static renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const BACKGROUND: Rgb = Rgb(0xFA, 0xFA, 0xFA);
    pub const GRID: Rgb = Rgb(0xDD, 0xDD, 0xDD);

    /// Parse `#rrggbb`, `rrggbb` or `#rgb`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Rgb(r, g, b))
            }
            3 => {
                let mut channels = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    channels[i] = v * 17;
                }
                Some(Rgb(channels[0], channels[1], channels[2]))
            }
            _ => None,
        }
    }

    /// Rec. 601 luma as a gray color.
    pub fn to_grayscale(self) -> Self {
        let luma = 0.299 * self.0 as f64 + 0.587 * self.1 as f64 + 0.114 * self.2 as f64;
        let l = luma.round().clamp(0.0, 255.0) as u8;
        Rgb(l, l, l)
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgb(self.0, self.1, self.2)
    }

    pub fn from_color32(color: egui::Color32) -> Self {
        Rgb(color.r(), color.g(), color.b())
    }

    pub fn to_plotters(self) -> plotters::style::RGBColor {
        plotters::style::RGBColor(self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Named two-color palettes offered in the settings panel.
pub const PALETTES: [(&str, [Rgb; 2]); 8] = [
    ("Classic TriNetX", [Rgb(0x8e, 0x44, 0xad), Rgb(0x27, 0xae, 0x60)]),
    ("University of California", [Rgb(0x12, 0x95, 0xD8), Rgb(0xFF, 0xB5, 0x11)]),
    ("Colorblind-safe", [Rgb(0x00, 0x72, 0xB2), Rgb(0xD5, 0x5E, 0x00)]),
    ("Tol (bright)", [Rgb(0x44, 0x77, 0xAA), Rgb(0xEE, 0x66, 0x77)]),
    ("Blue-Green", [Rgb(0x1B, 0x9E, 0x77), Rgb(0x75, 0x70, 0xB3)]),
    ("Red-Green", [Rgb(0xD7, 0x26, 0x3D), Rgb(0x21, 0xA1, 0x79)]),
    ("High-Contrast", [Rgb(0x00, 0x00, 0x00), Rgb(0xE6, 0x9F, 0x00)]),
    ("Grayscale", [Rgb(0x88, 0x88, 0x88), Rgb(0xBB, 0xBB, 0xBB)]),
];

pub const DEFAULT_PALETTE: usize = 1;

/// Colors for single-value charts where each label gets its own color.
pub const LABEL_PALETTE: [Rgb; 10] = [
    Rgb(0x12, 0x95, 0xD8),
    Rgb(0xFF, 0xB5, 0x11),
    Rgb(0x8e, 0x44, 0xad),
    Rgb(0x27, 0xae, 0x60),
    Rgb(0xD5, 0x5E, 0x00),
    Rgb(0x44, 0x77, 0xAA),
    Rgb(0xEE, 0x66, 0x77),
    Rgb(0x75, 0x70, 0xB3),
    Rgb(0x79, 0x55, 0x48),
    Rgb(0x60, 0x7D, 0x8B),
];

/// Palette by index, falling back to the default palette.
pub fn palette_by_index(index: usize) -> (&'static str, [Rgb; 2]) {
    PALETTES
        .get(index)
        .copied()
        .unwrap_or(PALETTES[DEFAULT_PALETTE])
}

/// First-seen color assignment keyed by label.
///
/// A new key takes the next palette color, cycling; repeated keys reuse theirs.
pub struct LabelColors<'a> {
    palette: &'a [Rgb],
    assigned: HashMap<String, Rgb>,
    order: Vec<(String, Rgb)>,
}

impl<'a> LabelColors<'a> {
    pub fn new(palette: &'a [Rgb]) -> Self {
        Self {
            palette,
            assigned: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn color_for(&mut self, key: &str) -> Rgb {
        if let Some(color) = self.assigned.get(key) {
            return *color;
        }
        let color = if self.palette.is_empty() {
            Rgb::BLACK
        } else {
            self.palette[self.order.len() % self.palette.len()]
        };
        self.assigned.insert(key.to_string(), color);
        self.order.push((key.to_string(), color));
        color
    }

    /// First-seen rank of a key, matching its index in `entries`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|(k, _)| k == key)
    }

    /// Keys in first-seen order with their colors, for the legend.
    pub fn entries(&self) -> &[(String, Rgb)] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#1295D8"), Some(Rgb(0x12, 0x95, 0xD8)));
        assert_eq!(Rgb::from_hex("ffb511"), Some(Rgb(0xFF, 0xB5, 0x11)));
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb(255, 255, 255)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("zzzzzz"), None);
        assert_eq!(Rgb::from_hex(""), None);
        assert_eq!(Rgb(0x12, 0x95, 0xD8).to_string(), "#1295D8");
    }

    #[test]
    fn test_grayscale() {
        assert_eq!(Rgb(255, 255, 255).to_grayscale(), Rgb(255, 255, 255));
        assert_eq!(Rgb(0, 0, 0).to_grayscale(), Rgb(0, 0, 0));
        let Rgb(r, g, b) = Rgb(0x12, 0x95, 0xD8).to_grayscale();
        assert!(r == g && g == b);
    }

    #[test]
    fn test_repeated_labels_share_color() {
        let mut colors = LabelColors::new(&LABEL_PALETTE);
        let first = colors.color_for("Cohort 1");
        let second = colors.color_for("Cohort 2");
        assert_eq!(colors.color_for("Cohort 1"), first);
        assert_ne!(first, second);
        assert_eq!(colors.entries().len(), 2);
        assert_eq!(colors.position("Cohort 2"), Some(1));
        assert_eq!(colors.position("Cohort 3"), None);
    }

    #[test]
    fn test_assignment_cycles_palette() {
        let pal = [Rgb(1, 0, 0), Rgb(2, 0, 0)];
        let mut colors = LabelColors::new(&pal);
        assert_eq!(colors.color_for("a"), pal[0]);
        assert_eq!(colors.color_for("b"), pal[1]);
        assert_eq!(colors.color_for("c"), pal[0]);
        assert_eq!(colors.color_for("b"), pal[1]);
    }

    #[test]
    fn test_palette_lookup_falls_back() {
        assert_eq!(palette_by_index(0).0, "Classic TriNetX");
        assert_eq!(palette_by_index(99).0, "University of California");
    }
}
