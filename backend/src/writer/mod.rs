//! Write a [`Workbook`] back to `.xlsx` with rust_xlsxwriter.
//!
//! Every sheet is written in its original order under its original name.
//! Dates get a date number format and formulas are written as formulas, so
//! Excel recalculates them on open.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet as XlsxWorksheet, XlsxError};

use crate::error::WorkbookResult;
use crate::models::{Cell, Workbook, Worksheet};

/// Number format for dates without a time part.
pub const DATE_FORMAT: &str = "yyyy-mm-dd";

/// Number format for dates with a time part.
pub const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Serialize a workbook into xlsx bytes.
///
/// `header_row` (0-based) of the active sheet is written in bold when given.
pub fn write_workbook_bytes(wb: &Workbook, header_row: Option<usize>) -> WorkbookResult<Vec<u8>> {
    let mut workbook = build_workbook(wb, header_row)?;
    Ok(workbook.save_to_buffer()?)
}

/// Serialize a workbook into an xlsx file.
pub fn write_workbook_file<P: AsRef<Path>>(
    wb: &Workbook,
    header_row: Option<usize>,
    path: P,
) -> WorkbookResult<()> {
    let mut workbook = build_workbook(wb, header_row)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

/// Cell formats shared by every sheet.
struct Formats {
    plain: Format,
    bold: Format,
    date: Format,
    datetime: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            plain: Format::new(),
            bold: Format::new().set_bold(),
            date: Format::new().set_num_format(DATE_FORMAT),
            datetime: Format::new().set_num_format(DATETIME_FORMAT),
        }
    }

    fn for_cell(&self, cell: &Cell, header: bool) -> &Format {
        match cell {
            Cell::Date(serial) if serial.fract() == 0.0 => &self.date,
            Cell::Date(_) => &self.datetime,
            _ if header => &self.bold,
            _ => &self.plain,
        }
    }
}

fn build_workbook(wb: &Workbook, header_row: Option<usize>) -> Result<XlsxWorkbook, XlsxError> {
    let mut workbook = XlsxWorkbook::new();
    let formats = Formats::new();

    for (idx, ws) in wb.sheets.iter().enumerate() {
        let sheet = workbook.add_worksheet();
        let bold_row = if idx == wb.active { header_row } else { None };
        write_sheet(sheet, ws, bold_row, &formats)?;
    }

    Ok(workbook)
}

fn write_sheet(
    sheet: &mut XlsxWorksheet,
    ws: &Worksheet,
    header_row: Option<usize>,
    formats: &Formats,
) -> Result<(), XlsxError> {
    if !ws.name.is_empty() {
        sheet.set_name(&ws.name)?;
    }

    for (r, cells) in ws.rows.iter().enumerate() {
        let row = u32::try_from(r).map_err(|_| XlsxError::RowColumnLimitError)?;
        let header = header_row == Some(r);
        for (c, cell) in cells.iter().enumerate() {
            let col = u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)?;
            write_cell(sheet, row, col, cell, formats.for_cell(cell, header))?;
        }
    }

    Ok(())
}

fn write_cell(
    sheet: &mut XlsxWorksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    format: &Format,
) -> Result<(), XlsxError> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) if s.is_empty() => {}
        Cell::Text(s) => {
            sheet.write_string_with_format(row, col, s, format)?;
        }
        Cell::Number(n) | Cell::Date(n) => {
            sheet.write_number_with_format(row, col, *n, format)?;
        }
        Cell::Bool(b) => {
            sheet.write_boolean_with_format(row, col, *b, format)?;
        }
        Cell::Formula(source) => {
            sheet.write_formula_with_format(row, col, source.as_str(), format)?;
        }
    }
    Ok(())
}
