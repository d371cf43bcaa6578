//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod table_editor;

pub use app::CohortChartApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use table_editor::TableEditor;
