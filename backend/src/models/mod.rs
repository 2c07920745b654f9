//! Domain models: cells, worksheets and workbooks.
//!
//! A [`Workbook`] holds every sheet of an uploaded file in tab order; only its
//! active sheet is transformed, the others are carried through unchanged.
//! A [`Worksheet`] is a plain grid of [`Cell`] values addressed by 0-based
//! row/column positions. Spreadsheet row and column *numbers* (1-based, as a
//! user sees them in Excel) are only used at the edges: header lookup and
//! log messages.
//!
//! # Cell Predicates
//!
//! Spreadsheet values are loosely typed. Instead of relying on implicit
//! truthiness, the transformer asks two explicit questions:
//!
//! | Cell                | `is_truthy` | `is_blank` |
//! |---------------------|-------------|------------|
//! | `Empty`             | false       | true       |
//! | `Text("")`          | false       | true       |
//! | `Text("   ")`       | true        | true       |
//! | `Text("bumper")`    | true        | false      |
//! | `Number(0.0)`       | false       | true       |
//! | `Number(12.0)`      | true        | false      |
//! | `Bool(false)`       | false       | true       |
//! | `Date(45366.0)`     | true        | false      |
//! | `Formula("B2*2")`   | true        | false      |

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel date serial (days since 1899-12-30, fraction = time of day)
    Date(f64),
    /// Formula source without the leading `=`
    Formula(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn number(value: impl Into<f64>) -> Self {
        Cell::Number(value.into())
    }

    /// Whether the value counts as "present".
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !s.is_empty(),
            Cell::Number(n) => *n != 0.0,
            Cell::Bool(b) => *b,
            Cell::Date(_) => true,
            Cell::Formula(f) => !f.is_empty(),
        }
    }

    /// Not truthy, or only whitespace once rendered.
    pub fn is_blank(&self) -> bool {
        !self.is_truthy() || self.to_string().trim().is_empty()
    }

    /// Text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Formula cell from Excel source text, with or without the leading `=`.
    pub fn formula(source: &str) -> Self {
        Cell::Formula(source.trim_start_matches('=').to_string())
    }

    /// True for a text cell equal to `value`.
    pub fn is_text(&self, value: &str) -> bool {
        self.as_text() == Some(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            // Integral values print like the integers Excel shows
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
            Cell::Date(serial) => match serial_to_datetime(*serial) {
                Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
                None => write!(f, "{}", serial),
            },
            Cell::Formula(source) => write!(f, "={}", source),
        }
    }
}

/// Calendar date of an Excel serial (1900 date system).
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

/// One worksheet held in memory.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Worksheet {
    /// Sheet name, reused when writing the output workbook
    pub name: String,
    /// Rows in document order; rows may have different lengths
    pub rows: Vec<Vec<Cell>>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Build a sheet from rows of anything convertible to a cell.
    pub fn from_rows<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        Self {
            name: name.into(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Cell at a 0-based position. `None` when outside the stored grid.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Write a cell, growing the grid with empty cells as needed.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<Cell>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, Cell::Empty);
        }
        cells[col] = value.into();
    }

    /// Append a row at the bottom of the sheet.
    pub fn push_row<C: Into<Cell>>(&mut self, row: impl IntoIterator<Item = C>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }
}

/// Every sheet of a workbook, in tab order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Worksheet>,
    /// Index of the sheet the transformer works on
    pub active: usize,
}

impl Workbook {
    pub fn new(sheets: Vec<Worksheet>) -> Self {
        Self { sheets, active: 0 }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn active_sheet(&self) -> Option<&Worksheet> {
        self.sheets.get(self.active)
    }

    pub fn active_sheet_mut(&mut self) -> Option<&mut Worksheet> {
        self.sheets.get_mut(self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Cell::Empty.is_truthy());
        assert!(!Cell::text("").is_truthy());
        assert!(Cell::text(" ").is_truthy());
        assert!(!Cell::number(0.0).is_truthy());
        assert!(Cell::number(-1.5).is_truthy());
        assert!(!Cell::Bool(false).is_truthy());
        assert!(Cell::Bool(true).is_truthy());
    }

    #[test]
    fn test_blank_trims_whitespace() {
        assert!(Cell::text(" \t\n").is_blank());
        assert!(Cell::Empty.is_blank());
        assert!(Cell::number(0.0).is_blank());
        assert!(!Cell::text(" door ").is_blank());
        assert!(!Cell::number(7.0).is_blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::number(42.0).to_string(), "42");
        assert_eq!(Cell::number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Bool(true).to_string(), "True");
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(Cell::text("YZU01").to_string(), "YZU01");
        assert_eq!(Cell::Date(45366.0).to_string(), "2024-03-15 00:00:00");
        assert_eq!(Cell::Date(45366.75).to_string(), "2024-03-15 18:00:00");
        assert_eq!(Cell::formula("=B2*2").to_string(), "=B2*2");
    }

    #[test]
    fn test_dates_and_formulas_are_present() {
        assert!(Cell::Date(0.0).is_truthy());
        assert!(!Cell::Date(45366.0).is_blank());
        assert_eq!(Cell::formula("=SUM(A1:A3)"), Cell::Formula("SUM(A1:A3)".into()));
        assert!(!Cell::formula("A1").is_blank());
    }

    #[test]
    fn test_workbook_active_sheet() {
        let mut wb = Workbook::new(vec![Worksheet::new("Features"), Worksheet::new("Notes")]);
        assert_eq!(wb.sheet_names(), vec!["Features", "Notes"]);
        assert_eq!(wb.active_sheet().map(|s| s.name.as_str()), Some("Features"));

        wb.active = 1;
        if let Some(sheet) = wb.active_sheet_mut() {
            sheet.set(0, 0, "note");
        }
        assert_eq!(wb.sheets[1].get(0, 0), Some(&Cell::text("note")));

        wb.active = 5;
        assert!(wb.active_sheet().is_none());
    }

    #[test]
    fn test_set_grows_grid() {
        let mut ws = Worksheet::new("Sheet1");
        ws.set(2, 3, "x");

        assert_eq!(ws.row_count(), 3);
        assert_eq!(ws.row(0), Some(&[][..]));
        assert_eq!(ws.get(2, 3), Some(&Cell::text("x")));
        assert_eq!(ws.get(2, 0), Some(&Cell::Empty));
        assert_eq!(ws.get(2, 4), None);
        assert_eq!(ws.column_count(), 4);
    }

    #[test]
    fn test_from_rows() {
        let ws = Worksheet::from_rows("S", vec![vec!["a", "b"], vec!["c"]]);
        assert_eq!(ws.row_count(), 2);
        assert_eq!(ws.get(1, 0), Some(&Cell::text("c")));
        assert_eq!(ws.get(1, 1), None);
    }
}
