//! CSV Data Loader Module
//! Reads a table snapshot from a CSV file using Polars.

use crate::data::{EditableTable, TableRow};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV file has no columns")]
    NoColumns,
}

/// Column roles found in the file header.
#[derive(Debug, Default, PartialEq)]
struct ColumnRoles {
    label: String,
    values: Vec<String>,
    series: Option<String>,
    color: Option<String>,
}

impl ColumnRoles {
    fn from_names(names: &[String]) -> Option<Self> {
        let mut roles = ColumnRoles::default();
        let mut rest = Vec::new();
        for name in names {
            match name.trim().to_ascii_lowercase().as_str() {
                "color" | "colour" => roles.color = Some(name.clone()),
                "series" | "type" | "cohort" => roles.series = Some(name.clone()),
                _ => rest.push(name.clone()),
            }
        }
        let mut rest = rest.into_iter();
        roles.label = rest.next()?;
        roles.values = rest.take(2).collect();
        Some(roles)
    }
}

/// Loads table snapshots from CSV files.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file into an editable table.
    ///
    /// The first plain column holds labels, the next one or two hold values.
    pub fn load_csv(file_path: &Path) -> Result<EditableTable, LoaderError> {
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let table = Self::table_from_dataframe(&df)?;
        tracing::info!(
            path = %file_path.display(),
            rows = table.len(),
            "imported table from CSV"
        );
        Ok(table)
    }

    fn table_from_dataframe(df: &DataFrame) -> Result<EditableTable, LoaderError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let roles = ColumnRoles::from_names(&names).ok_or(LoaderError::NoColumns)?;

        let label_cells = Self::text_cells(df, Some(&roles.label))?;
        let series_cells = Self::text_cells(df, roles.series.as_deref())?;
        let color_cells = Self::text_cells(df, roles.color.as_deref())?;
        let value_cells: Vec<Vec<String>> = roles
            .values
            .iter()
            .map(|name| Self::numeric_cells(df, name))
            .collect::<Result<_, _>>()?;

        let rows = (0..df.height())
            .map(|i| {
                let mut row = TableRow {
                    label: label_cells[i].clone(),
                    series: series_cells[i].clone(),
                    color: color_cells[i].clone(),
                    ..Default::default()
                };
                for (slot, cells) in value_cells.iter().enumerate() {
                    row.values[slot] = cells[i].clone();
                }
                row
            })
            .collect();

        Ok(EditableTable::new(rows))
    }

    /// Column as display text; nulls and absent columns become empty cells.
    fn text_cells(df: &DataFrame, column: Option<&str>) -> Result<Vec<String>, LoaderError> {
        let Some(column) = column else {
            return Ok(vec![String::new(); df.height()]);
        };
        let series = df.column(column)?;
        Ok((0..df.height())
            .map(|i| match series.get(i) {
                Ok(val) if !val.is_null() => val.to_string().trim_matches('"').to_string(),
                _ => String::new(),
            })
            .collect())
    }

    /// Numeric column formatted for editing; unparseable cells become empty.
    fn numeric_cells(df: &DataFrame, column: &str) -> Result<Vec<String>, LoaderError> {
        let values = df.column(column)?.cast(&DataType::Float64)?;
        let values = values.f64()?;
        Ok((0..df.height())
            .map(|i| match values.get(i) {
                Some(v) if v.is_finite() => v.to_string(),
                _ => String::new(),
            })
            .collect())
    }
}
