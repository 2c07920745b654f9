//! Spreadsheet reader built on calamine.
//!
//! Loads every worksheet of an `.xlsx` / `.xls` workbook into a [`Workbook`].
//! Cell positions are kept absolute: if the used range of a sheet starts at
//! `C3`, the grid gets two empty leading rows and two empty leading cells per
//! row, so row numbers in logs match Excel.
//!
//! Date cells stay dates and formula cells keep their source, so that the
//! writer can put both back the way they were.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::error::{WorkbookError, WorkbookResult};
use crate::models::{Cell, Workbook, Worksheet};

/// Convert a calamine value to a cell.
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => Cell::Number(dt.as_f64()),
        Data::DateTime(dt) => Cell::Date(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
        Data::Empty => Cell::Empty,
    }
}

/// Build a worksheet from a calamine range, keeping absolute positions.
pub fn worksheet_from_range(name: impl Into<String>, range: &Range<Data>) -> Worksheet {
    let mut ws = Worksheet::new(name);

    let Some((first_row, first_col)) = range.start() else {
        return ws;
    };

    ws.rows.resize_with(first_row as usize, Vec::new);
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; first_col as usize];
        cells.extend(row.iter().map(cell_from_data));
        ws.rows.push(cells);
    }

    ws
}

/// Replace cached values with the formulas that produced them.
pub fn apply_formulas(ws: &mut Worksheet, formulas: &Range<String>) {
    let Some((first_row, first_col)) = formulas.start() else {
        return;
    };

    for (row, col, source) in formulas.cells() {
        if source.is_empty() {
            continue;
        }
        ws.set(
            first_row as usize + row,
            first_col as usize + col,
            Cell::formula(source),
        );
    }
}

/// Read every worksheet from workbook bytes.
///
/// The format (xlsx, xls, xlsb, ods) is detected from the content. The
/// first sheet is the active one.
pub fn read_workbook_bytes(bytes: &[u8]) -> WorkbookResult<Workbook> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| WorkbookError::OpenError(e.to_string()))?;

    let names = workbook.sheet_names();
    if names.is_empty() {
        return Err(WorkbookError::NoWorksheet);
    }

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| WorkbookError::OpenError(format!("sheet \"{}\": {}", name, e)))?;
        let mut ws = worksheet_from_range(name.as_str(), &range);

        // Not every format exposes formulas; values alone are still valid
        if let Ok(formulas) = workbook.worksheet_formula(&name) {
            apply_formulas(&mut ws, &formulas);
        }
        sheets.push(ws);
    }

    Ok(Workbook::new(sheets))
}

/// Read every worksheet of a workbook file.
pub fn read_workbook_file<P: AsRef<Path>>(path: P) -> WorkbookResult<Workbook> {
    let bytes = std::fs::read(path.as_ref())?;
    read_workbook_bytes(&bytes)
}
