//! Editable Table Module
//! Raw cell text as typed by the user, and its classification into rows.

use crate::charts::Rgb;
use crate::data::layout::{parse_value, Row, HEADER_PREFIX};
use crate::settings::ChartMode;

/// One grid row exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub label: String,
    /// Value cells, indexed by cohort slot.
    pub values: [String; 2],
    pub series: String,
    pub color: String,
}

impl TableRow {
    pub fn data(label: &str, first: &str, second: &str) -> Self {
        Self {
            label: label.to_string(),
            values: [first.to_string(), second.to_string()],
            ..Default::default()
        }
    }

    pub fn header(label: &str) -> Self {
        Self {
            label: format!("{}{}", HEADER_PREFIX, label),
            ..Default::default()
        }
    }

    pub fn is_header(&self) -> bool {
        self.label.starts_with(HEADER_PREFIX)
    }

    /// Classify into a typed row, reading `slots` value cells.
    pub fn to_row(&self, slots: usize) -> Row {
        let values = self
            .values
            .iter()
            .take(slots.clamp(1, 2))
            .map(|cell| parse_value(cell))
            .collect();
        let series = Some(self.series.trim().to_string()).filter(|s| !s.is_empty());
        Row::classify(&self.label, values, series, Rgb::from_hex(&self.color))
    }
}

/// In-memory table snapshot edited by the grid widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableTable {
    rows: Vec<TableRow>,
}

impl Default for EditableTable {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
        }
    }
}

impl EditableTable {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    pub fn default_rows() -> Vec<TableRow> {
        vec![
            TableRow::header("Cancers"),
            TableRow::data("Breast Cancer", "12.1", "10.8"),
            TableRow::data("Colon Cancer", "9.4", "8.7"),
            TableRow::header("Cardiac"),
            TableRow::data("Heart Failure", "15.3", "14.9"),
            TableRow::data("MI", "11.2", "10.5"),
        ]
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [TableRow] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_data_row(&mut self) {
        self.rows.push(TableRow::default());
    }

    pub fn push_header_row(&mut self) {
        self.rows.push(TableRow::header(""));
    }

    /// Insert a blank data row before `index`; past the end appends.
    pub fn insert_row(&mut self, index: usize) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, TableRow::default());
    }

    pub fn remove_row(&mut self, index: usize) -> Option<TableRow> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    pub fn move_up(&mut self, index: usize) {
        if index > 0 && index < self.rows.len() {
            self.rows.swap(index - 1, index);
        }
    }

    pub fn move_down(&mut self, index: usize) {
        if index + 1 < self.rows.len() {
            self.rows.swap(index, index + 1);
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn reset(&mut self) {
        self.rows = Self::default_rows();
    }

    /// Classify every row for the given chart mode.
    pub fn to_rows(&self, mode: ChartMode) -> Vec<Row> {
        let slots = mode.value_slots();
        self.rows.iter().map(|r| r.to_row(slots)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::layout::build_layout;

    #[test]
    fn test_default_table_layout() {
        let table = EditableTable::default();
        let layout = build_layout(&table.to_rows(ChartMode::TwoCohort), 2.3);
        assert_eq!(layout.bars.len(), 4);
        assert_eq!(layout.markers.len(), 2);
        assert_eq!(layout.markers[1].label, "Cardiac");
        assert_eq!(layout.bars[3].values, vec![Some(11.2), Some(10.5)]);
    }

    #[test]
    fn test_single_value_mode_reads_first_cell() {
        let table = EditableTable::new(vec![TableRow::data("RR", "1.4", "9.9")]);
        match &table.to_rows(ChartMode::SingleValue)[0] {
            Row::Data { values, .. } => assert_eq!(values, &vec![Some(1.4)]),
            other => panic!("expected data row, got {other:?}"),
        }
    }

    #[test]
    fn test_row_fields_are_classified() {
        let row = TableRow {
            label: " Stroke ".into(),
            values: ["3".into(), "".into()],
            series: "Cohort 1".into(),
            color: "#ff0000".into(),
        };
        assert_eq!(
            row.to_row(2),
            Row::Data {
                label: "Stroke".into(),
                values: vec![Some(3.0), None],
                series: Some("Cohort 1".into()),
                color: Some(Rgb(255, 0, 0)),
            }
        );
        assert!(TableRow::header("Renal").is_header());
        assert!(!TableRow::data("  ##Renal", "", "").is_header());
    }

    #[test]
    fn test_row_editing() {
        let mut table = EditableTable::new(vec![
            TableRow::data("a", "1", ""),
            TableRow::data("b", "2", ""),
        ]);
        table.move_down(0);
        assert_eq!(table.rows()[0].label, "b");
        table.move_up(1);
        assert_eq!(table.rows()[0].label, "a");
        table.move_up(0);
        table.move_down(1);
        assert_eq!(table.rows()[1].label, "b");

        table.insert_row(1);
        table.push_header_row();
        assert_eq!(table.len(), 4);
        assert!(table.rows()[3].is_header());
        assert_eq!(table.remove_row(1), Some(TableRow::default()));
        assert_eq!(table.remove_row(10), None);

        table.clear();
        assert!(table.is_empty());
        table.reset();
        assert_eq!(table.len(), 6);
    }
}
