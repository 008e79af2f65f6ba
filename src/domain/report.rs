//! Report rows and cells as returned by `reports/getReport`.
//!
//! Rows arrive as schema-less maps. Each column id is classified once, when its
//! [`Cell`] is created, by looking for the CRM markers inside the id string:
//!
//! - `field_cf_group_<N>...` is a CRM custom-field group with clean id `<N>`,
//! - `field_<N>...` is a CRM custom field with clean id `<N>`,
//! - anything else is a plain system field (`day`, `cost`, ...).
//!
//! The markers are matched anywhere in the id, so a system column that happens
//! to contain `field_` is classified as a CRM column.

use std::collections::HashMap;

const FIELD_MARKER: &str = "field_";
const FIELD_GROUP_MARKER: &str = "field_cf_group_";

/// What a report column refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    SystemField,
    CustomField,
    CustomFieldGroup,
}

/// Scalar value of a report cell.
///
/// Columns mix numbers, strings and nulls freely; the JSON type is kept as-is.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(value) => value.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => value.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for CellValue {
    /// Non-finite floats have no JSON representation and become [`CellValue::Null`].
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// One column's value within one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    column_id: String,
    kind: CellKind,
    clean_id: String,
    value: CellValue,
    name: String,
}

impl Cell {
    /// Create a cell and classify its column id.
    pub fn new(column_id: impl Into<String>, value: CellValue) -> Self {
        let column_id = column_id.into();
        let (kind, clean_id) = classify(&column_id);
        Self {
            column_id,
            kind,
            clean_id,
            value,
            name: String::new(),
        }
    }

    /// Column id exactly as sent by the API.
    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Numeric CRM reference extracted from the column id.
    ///
    /// `None` for system fields.
    pub fn clean_id(&self) -> Option<&str> {
        match self.kind {
            CellKind::SystemField => None,
            CellKind::CustomField | CellKind::CustomFieldGroup => Some(&self.clean_id),
        }
    }

    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// Human-readable CRM title; empty until resolved.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

/// Classify a column id and extract its clean id (empty for system fields).
pub fn classify(column_id: &str) -> (CellKind, String) {
    if let Some(rest) = after_marker(column_id, FIELD_GROUP_MARKER) {
        return (CellKind::CustomFieldGroup, leading_token(rest).to_owned());
    }
    if let Some(rest) = after_marker(column_id, FIELD_MARKER) {
        return (CellKind::CustomField, leading_token(rest).to_owned());
    }
    (CellKind::SystemField, String::new())
}

fn after_marker<'a>(column_id: &'a str, marker: &str) -> Option<&'a str> {
    column_id
        .find(marker)
        .map(|start| &column_id[start + marker.len()..])
}

fn leading_token(rest: &str) -> &str {
    rest.split('_').next().unwrap_or_default()
}

/// One report row.
///
/// Cell order carries no meaning. Column lookups become O(1) once the owning
/// report has been indexed with [`Report::index_columns`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,
    columns: HashMap<String, usize>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            columns: HashMap::new(),
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Look a cell up by its raw column id.
    ///
    /// If a row holds the same column id twice, the last one wins.
    pub fn column(&self, column_id: &str) -> Option<&Cell> {
        self.position(column_id).map(|idx| &self.cells[idx])
    }

    /// Mutable variant of [`Row::column`]; edits are visible through both
    /// [`Row::cells`] and later lookups.
    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut Cell> {
        self.position(column_id).map(|idx| &mut self.cells[idx])
    }

    fn position(&self, column_id: &str) -> Option<usize> {
        if self.columns.is_empty() {
            return self.cells.iter().rposition(|c| c.column_id == column_id);
        }
        self.columns.get(column_id).copied()
    }

    fn index(&mut self) {
        let mut columns = HashMap::with_capacity(self.cells.len());
        for (idx, cell) in self.cells.iter().enumerate() {
            columns.insert(cell.column_id.clone(), idx);
        }
        self.columns = columns;
    }
}

/// Result of a report query for one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    metric: String,
    rows: Vec<Row>,
    names_resolved: bool,
    indexed: bool,
}

impl Report {
    /// Create a report from rows in arrival order.
    pub fn new(metric: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            metric: metric.into(),
            rows,
            names_resolved: false,
            indexed: false,
        }
    }

    /// Metric code this report was returned under.
    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over every cell of every row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    /// `true` once CRM column names have been resolved.
    pub fn is_names_resolved(&self) -> bool {
        self.names_resolved
    }

    /// `true` once [`Report::index_columns`] has run.
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub(crate) fn mark_names_resolved(&mut self) {
        self.names_resolved = true;
    }

    /// Build the per-row column-id index used by [`Row::column`].
    pub fn index_columns(&mut self) {
        for row in &mut self.rows {
            row.index();
        }
        self.indexed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_field_group_columns() {
        for (column_id, expected) in [
            ("field_cf_group_5678_y", "5678"),
            ("field_cf_group_42", "42"),
            ("field_cf_group_7_sum_total", "7"),
        ] {
            assert_eq!(
                classify(column_id),
                (CellKind::CustomFieldGroup, expected.to_owned()),
                "{column_id}"
            );
        }
    }

    #[test]
    fn classify_field_columns() {
        for (column_id, expected) in [
            ("field_1234_x", "1234"),
            ("field_10", "10"),
            ("field_99_count_unique", "99"),
        ] {
            assert_eq!(
                classify(column_id),
                (CellKind::CustomField, expected.to_owned()),
                "{column_id}"
            );
        }
    }

    #[test]
    fn classify_system_columns() {
        for column_id in ["day", "cost", "placement_id", "fields", ""] {
            assert_eq!(
                classify(column_id),
                (CellKind::SystemField, String::new()),
                "{column_id}"
            );
        }
    }

    #[test]
    fn classify_matches_marker_anywhere_in_the_id() {
        assert_eq!(
            classify("sum_field_12_a"),
            (CellKind::CustomField, "12".to_owned())
        );
        assert_eq!(
            classify("my_field_x"),
            (CellKind::CustomField, "x".to_owned())
        );
    }

    #[test]
    fn cell_exposes_clean_id_only_for_crm_columns() {
        let cell = Cell::new("field_10_x", CellValue::from(5));
        assert_eq!(cell.kind(), CellKind::CustomField);
        assert_eq!(cell.clean_id(), Some("10"));
        assert_eq!(cell.name(), "");

        let cell = Cell::new("day", CellValue::from("2024-01-01"));
        assert_eq!(cell.kind(), CellKind::SystemField);
        assert_eq!(cell.clean_id(), None);
    }

    #[test]
    fn cell_value_keeps_json_type() {
        assert_eq!(CellValue::from(5).as_i64(), Some(5));
        assert_eq!(CellValue::from(5).as_str(), None);
        assert_eq!(CellValue::from("5").as_str(), Some("5"));
        assert_eq!(CellValue::from("5").as_i64(), None);
        assert_eq!(CellValue::from(1.5).as_f64(), Some(1.5));
        assert!(CellValue::from(f64::NAN).is_null());
        assert_eq!(CellValue::from(true).as_bool(), Some(true));
    }

    fn sample_report() -> Report {
        Report::new(
            "cost",
            vec![
                Row::new(vec![
                    Cell::new("field_10_x", CellValue::from(5)),
                    Cell::new("day", CellValue::from("2024-01-01")),
                ]),
                Row::new(vec![
                    Cell::new("field_10_x", CellValue::Null),
                    Cell::new("day", CellValue::from("2024-01-02")),
                ]),
            ],
        )
    }

    #[test]
    fn index_columns_enables_lookup_by_column_id() {
        let mut report = sample_report();
        assert!(!report.is_indexed());

        report.index_columns();
        assert!(report.is_indexed());

        let row = &report.rows()[0];
        assert_eq!(row.column("field_10_x").unwrap().value(), &CellValue::from(5));
        assert_eq!(
            row.column("day").unwrap().value(),
            &CellValue::from("2024-01-01")
        );
        assert!(row.column("missing").is_none());
        assert!(report.rows()[1].column("field_10_x").unwrap().value().is_null());
    }

    #[test]
    fn index_columns_is_idempotent() {
        let mut report = sample_report();
        report.index_columns();
        let once = report.clone();
        report.index_columns();
        assert_eq!(report, once);
    }

    #[test]
    fn name_changes_are_visible_through_index_and_cells() {
        let mut report = sample_report();
        report.index_columns();

        let row = &mut report.rows_mut()[0];
        row.column_mut("field_10_x").unwrap().set_name("Budget");

        let row = &report.rows()[0];
        assert_eq!(row.column("field_10_x").unwrap().name(), "Budget");
        assert!(row.cells().iter().any(|c| c.name() == "Budget"));
    }

    #[test]
    fn duplicate_column_ids_resolve_to_last_cell() {
        let mut row = Row::new(vec![
            Cell::new("day", CellValue::from("first")),
            Cell::new("day", CellValue::from("second")),
        ]);
        assert_eq!(row.column("day").unwrap().value().as_str(), Some("second"));

        row.index();
        assert_eq!(row.column("day").unwrap().value().as_str(), Some("second"));
    }

    #[test]
    fn lookup_works_before_indexing() {
        let report = sample_report();
        let row = &report.rows()[1];
        assert_eq!(row.column("day").unwrap().value().as_str(), Some("2024-01-02"));
    }
}
