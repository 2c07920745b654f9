//! High-level pipeline API: workbook bytes in, processed workbook bytes out.
//!
//! Combines reading (calamine), the row transformer and writing
//! (rust_xlsxwriter), logging every step through the broadcast logger.
//! Only the active sheet is transformed; every other sheet is written back
//! as it was read.
//!
//! # Example
//!
//! ```rust,ignore
//! use wersmap::transform::pipeline::{process_file, ProcessOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = process_file(
//!         Path::new("features.xlsx"),
//!         Path::new("processed_features.xlsx"),
//!         &ProcessOptions::default(),
//!     )?;
//!
//!     println!("Updated {} rows", result.stats.updated_rows);
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Serialize;

use super::sequencer::{transform, TransformStats};
use crate::api::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::error::{PipelineError, WorkbookError};
use crate::models::{Workbook, Worksheet};
use crate::parser::read_workbook_bytes;
use crate::writer::write_workbook_bytes;

/// Options for the processing pipeline
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Log every header column found
    pub list_columns: bool,

    /// Bold the header row in the output
    pub bold_header: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            list_columns: true,
            bold_header: true,
        }
    }
}

/// Worksheet information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetInfo {
    pub name: String,
    pub row_count: usize,
    pub column_count: usize,
    pub headers: Vec<String>,
}

/// Result of a processing run
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Processed workbook, xlsx encoded
    pub output: Vec<u8>,

    /// What the transformer changed
    pub stats: TransformStats,

    /// Transformed sheet metadata
    pub sheet: SheetInfo,

    /// Names of all sheets written, in tab order
    pub sheets: Vec<String>,
}

/// Process workbook bytes.
///
/// Nothing is returned unless the whole sheet transformed successfully.
pub fn process_bytes(bytes: &[u8], options: &ProcessOptions) -> Result<ProcessResult, PipelineError> {
    log_info("📖 Reading workbook...");
    let mut wb = read_workbook_bytes(bytes).map_err(|e| {
        log_error(format!("Cannot read workbook: {}", e));
        e
    })?;
    log_success(format!(
        "{} sheet(s): {}",
        wb.sheets.len(),
        wb.sheet_names().join(", ")
    ));

    process_workbook(&mut wb, options)
}

/// Transform the active sheet of a loaded workbook and serialize all sheets.
pub fn process_workbook(
    wb: &mut Workbook,
    options: &ProcessOptions,
) -> Result<ProcessResult, PipelineError> {
    let ws = wb.active_sheet_mut().ok_or(WorkbookError::NoWorksheet)?;
    log_success(format!(
        "Active sheet \"{}\": {} rows × {} columns",
        ws.name,
        ws.row_count(),
        ws.column_count()
    ));

    log_info("⚙️  Sequencing rows...");
    let stats = transform(ws).map_err(|e| {
        log_error(e.to_string());
        e
    })?;

    let headers = header_names(ws, stats.header_row);
    log_success(format!("Header found on row {}", stats.header_row));
    if options.list_columns {
        log_info(format!("📋 Sheet has {} columns:", headers.len()));
        for (i, col) in headers.iter().enumerate() {
            log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
        }
    }
    log_info(format!("Description column: {}", stats.description_column));
    print_stats(&stats);

    let sheet = SheetInfo {
        name: ws.name.clone(),
        row_count: ws.row_count(),
        column_count: ws.column_count(),
        headers,
    };

    log_info("💾 Writing workbook...");
    let header_row = options.bold_header.then(|| stats.header_row - 1);
    let output = write_workbook_bytes(wb, header_row)?;
    log_success(format!("Wrote {} bytes", output.len()));

    Ok(ProcessResult {
        output,
        sheets: wb.sheet_names().into_iter().map(String::from).collect(),
        sheet,
        stats,
    })
}

/// Process a workbook file into `output`.
///
/// The output file is only created when processing succeeds.
pub fn process_file(
    input: &Path,
    output: &Path,
    options: &ProcessOptions,
) -> Result<ProcessResult, PipelineError> {
    let bytes = std::fs::read(input)?;
    let result = process_bytes(&bytes, options)?;
    std::fs::write(output, &result.output)?;
    Ok(result)
}

/// Non-empty header names, left to right.
fn header_names(ws: &Worksheet, header_row: usize) -> Vec<String> {
    ws.row(header_row - 1)
        .unwrap_or_default()
        .iter()
        .filter(|cell| cell.is_truthy())
        .map(|cell| cell.to_string())
        .collect()
}

fn print_stats(stats: &TransformStats) {
    log_success(format!("{} data rows", stats.data_rows));
    log_success(format!(
        "{} rows sequenced across {} WERS codes",
        stats.updated_rows, stats.described_codes
    ));
    if stats.skipped_rows > 0 {
        log_warning(format!(
            "{} rows skipped (missing code or description)",
            stats.skipped_rows
        ));
    }
}
