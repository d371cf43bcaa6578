//! Charts module - Chart scene, preview and PNG rendering

mod palette;
mod plotter;
mod renderer;
mod scene;

pub use palette::{
    palette_by_index, LabelColors, Rgb, DEFAULT_PALETTE, LABEL_PALETTE, PALETTES,
};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
pub use scene::ChartScene;
