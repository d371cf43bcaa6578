//! Data module - table snapshot, CSV import and chart layout

mod layout;
mod loader;
mod table;

pub use layout::{build_layout, ChartLayout, Row};
pub use loader::DataLoader;
pub use table::{EditableTable, TableRow};
