//! Row sequencer: numbers described rows per WERS code and tags their group.
//!
//! # Algorithm
//!
//! Rows below the header are visited twice:
//!
//! 1. **Qualification** - collect the set of codes that have at least one
//!    described row.
//! 2. **Mutation** - for every qualifying row, write the next sequence number
//!    for its code (100, 105, 110, ...) and the code's marketing group.
//!
//! A row qualifies when its code cell is present and its description cell,
//! trimmed, is not empty. Other rows are left exactly as they were.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::classifier::classify;
use super::header::{locate_header, ColumnLayout, HeaderMap};
use crate::error::TransformResult;
use crate::models::{Cell, Worksheet};

/// First sequence number of every code.
pub const SEQUENCE_START: i64 = 100;

/// Gap between consecutive sequence numbers of a code.
pub const SEQUENCE_STEP: i64 = 5;

/// What a transform run did to a worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformStats {
    /// 1-based row number of the header, as shown in Excel
    pub header_row: usize,
    /// Rows below the header
    pub data_rows: usize,
    /// Rows that received a sequence number and group
    pub updated_rows: usize,
    /// Rows left untouched
    pub skipped_rows: usize,
    /// Distinct codes with at least one described row
    pub described_codes: usize,
    /// Description column used for qualification
    pub description_column: String,
}

/// Sequence and classify the rows of a worksheet in place.
///
/// Fails without touching the sheet when the header or a required column is
/// missing.
pub fn transform(ws: &mut Worksheet) -> TransformResult<TransformStats> {
    let header_idx = locate_header(ws)?;
    let headers = HeaderMap::from_row(ws.row(header_idx).unwrap_or_default());
    let layout = ColumnLayout::resolve(&headers)?;

    let data_start = header_idx + 1;
    let data_rows = ws.row_count().saturating_sub(data_start);

    // Pass 1: codes having a description
    let described: BTreeSet<String> = ws
        .rows
        .iter()
        .skip(data_start)
        .filter(|row| qualifies(row, &layout))
        .filter_map(|row| row.get(layout.code).map(Cell::to_string))
        .collect();

    // Pass 2: assign numbers and groups
    let mut counters: HashMap<String, i64> = HashMap::new();
    let mut updated_rows = 0;

    for row in ws.rows.iter_mut().skip(data_start) {
        if !qualifies(row, &layout) {
            continue;
        }

        let code = row.get(layout.code).map(Cell::to_string).unwrap_or_default();
        let next = counters.entry(code.clone()).or_insert(SEQUENCE_START);
        let sequence = *next;
        *next += SEQUENCE_STEP;

        set_cell(row, layout.sequence, Cell::from(sequence));
        set_cell(row, layout.group, Cell::text(classify(&code)));
        updated_rows += 1;
    }

    Ok(TransformStats {
        header_row: header_idx + 1,
        data_rows,
        updated_rows,
        skipped_rows: data_rows - updated_rows,
        described_codes: described.len(),
        description_column: layout.description_name.to_string(),
    })
}

/// Code present and description non-blank.
fn qualifies(row: &[Cell], layout: &ColumnLayout) -> bool {
    let has_code = row.get(layout.code).is_some_and(Cell::is_truthy);
    let has_description = row
        .get(layout.description)
        .is_some_and(|cell| !cell.is_blank());
    has_code && has_description
}

fn set_cell(row: &mut Vec<Cell>, col: usize, value: Cell) {
    if row.len() <= col {
        row.resize(col + 1, Cell::Empty);
    }
    row[col] = value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::transform::header::{CODE_COLUMN, GROUP_COLUMN, SEQUENCE_COLUMN};

    fn header() -> Vec<Cell> {
        vec![
            CODE_COLUMN.into(),
            SEQUENCE_COLUMN.into(),
            GROUP_COLUMN.into(),
            "Short Description".into(),
        ]
    }

    fn row(code: &str, description: &str) -> Vec<Cell> {
        vec![code.into(), Cell::Empty, Cell::Empty, description.into()]
    }

    fn sheet(rows: Vec<Vec<Cell>>) -> Worksheet {
        let mut ws = Worksheet::new("Sheet1");
        ws.rows.push(header());
        ws.rows.extend(rows);
        ws
    }

    fn sequence(ws: &Worksheet, row: usize) -> Option<&Cell> {
        ws.get(row, 1)
    }

    fn group(ws: &Worksheet, row: usize) -> Option<&Cell> {
        ws.get(row, 2)
    }

    #[test]
    fn test_end_to_end_header_on_third_row() {
        let mut ws = Worksheet::new("Sheet1");
        ws.push_row(["Vehicle Feature Export"]);
        ws.push_row(Vec::<Cell>::new());
        ws.rows.push(header());
        ws.rows.push(row("YZU01", "front bumper"));
        ws.rows.push(row("YZU02", ""));
        ws.rows.push(row("ZZZ", "rear door"));

        let stats = transform(&mut ws).unwrap();

        assert_eq!(sequence(&ws, 3), Some(&Cell::number(100.0)));
        assert_eq!(group(&ws, 3), Some(&Cell::text("fp-vehicle.bodycode")));
        assert_eq!(sequence(&ws, 4), Some(&Cell::Empty));
        assert_eq!(group(&ws, 4), Some(&Cell::Empty));
        assert_eq!(sequence(&ws, 5), Some(&Cell::number(100.0)));
        assert_eq!(group(&ws, 5), Some(&Cell::text("")));

        assert_eq!(stats.header_row, 3);
        assert_eq!(stats.data_rows, 3);
        assert_eq!(stats.updated_rows, 2);
        assert_eq!(stats.skipped_rows, 1);
        assert_eq!(stats.described_codes, 2);
        assert_eq!(stats.description_column, "Short Description");
    }

    #[test]
    fn test_sequence_per_code_with_interleaving() {
        let mut ws = sheet(vec![
            row("YZU01", "a"),
            row("PAA7", "b"),
            row("YZU01", "c"),
            row("YZU01", "   "),
            row("PAA7", "d"),
            row("YZU01", "e"),
        ]);

        transform(&mut ws).unwrap();

        assert_eq!(sequence(&ws, 1), Some(&Cell::number(100.0)));
        assert_eq!(sequence(&ws, 2), Some(&Cell::number(100.0)));
        assert_eq!(sequence(&ws, 3), Some(&Cell::number(105.0)));
        assert_eq!(sequence(&ws, 4), Some(&Cell::Empty));
        assert_eq!(sequence(&ws, 5), Some(&Cell::number(105.0)));
        assert_eq!(sequence(&ws, 6), Some(&Cell::number(110.0)));
        assert_eq!(group(&ws, 2), Some(&Cell::text("fp-exterior.paint")));
    }

    #[test]
    fn test_non_qualifying_rows_keep_existing_values() {
        let mut ws = sheet(vec![
            vec!["".into(), Cell::number(999.0), "old".into(), "described".into()],
            vec!["YZU01".into(), Cell::number(7.0), "keep".into(), Cell::Empty],
        ]);
        let before = ws.clone();

        let stats = transform(&mut ws).unwrap();

        assert_eq!(ws, before);
        assert_eq!(stats.updated_rows, 0);
        assert_eq!(stats.described_codes, 0);
    }

    #[test]
    fn test_existing_values_overwritten_on_qualifying_rows() {
        let mut ws = sheet(vec![vec![
            "EN-2".into(),
            Cell::number(5.0),
            "stale".into(),
            "engine".into(),
        ]]);

        transform(&mut ws).unwrap();

        assert_eq!(sequence(&ws, 1), Some(&Cell::number(100.0)));
        assert_eq!(group(&ws, 1), Some(&Cell::text("fp-powertrain.engine")));
    }

    #[test]
    fn test_description_preference_drives_qualification() {
        let mut ws = Worksheet::new("Sheet1");
        ws.rows.push(vec![
            CODE_COLUMN.into(),
            SEQUENCE_COLUMN.into(),
            GROUP_COLUMN.into(),
            "Short Description".into(),
            "Short Description_CA-EN".into(),
        ]);
        ws.rows.push(vec!["YZU1".into(), Cell::Empty, Cell::Empty, "fr".into(), "".into()]);
        ws.rows.push(vec!["YZU1".into(), Cell::Empty, Cell::Empty, "".into(), "en".into()]);
        ws.rows.push(vec!["YZU1".into(), Cell::Empty, Cell::Empty, "fr".into(), "en".into()]);

        let stats = transform(&mut ws).unwrap();

        assert_eq!(stats.description_column, "Short Description_CA-EN");
        assert_eq!(sequence(&ws, 1), Some(&Cell::Empty));
        assert_eq!(sequence(&ws, 2), Some(&Cell::number(100.0)));
        assert_eq!(sequence(&ws, 3), Some(&Cell::number(105.0)));
    }

    #[test]
    fn test_short_rows_are_extended() {
        let mut ws = sheet(vec![vec!["TR-1".into()], vec!["TR-1".into(), Cell::Empty]]);
        // Description column lies beyond these rows: nothing qualifies
        transform(&mut ws).unwrap();
        assert_eq!(ws.row(1).map(<[Cell]>::len), Some(1));

        let mut ws = Worksheet::new("Sheet1");
        ws.rows.push(vec![
            "Short Description".into(),
            CODE_COLUMN.into(),
            SEQUENCE_COLUMN.into(),
            "Notes".into(),
            GROUP_COLUMN.into(),
        ]);
        ws.rows.push(vec!["gearbox".into(), "TR-1".into()]);

        transform(&mut ws).unwrap();

        assert_eq!(ws.get(1, 2), Some(&Cell::number(100.0)));
        assert_eq!(ws.get(1, 3), Some(&Cell::Empty));
        assert_eq!(ws.get(1, 4), Some(&Cell::text("fp-powertrain.transmission")));
    }

    #[test]
    fn test_numeric_codes() {
        let mut ws = sheet(vec![
            vec![Cell::number(4711.0), Cell::Empty, Cell::Empty, "a".into()],
            vec![Cell::number(0.0), Cell::Empty, Cell::Empty, "zero".into()],
            vec![Cell::number(4711.0), Cell::Empty, Cell::Empty, Cell::number(3.0)],
        ]);

        transform(&mut ws).unwrap();

        assert_eq!(sequence(&ws, 1), Some(&Cell::number(100.0)));
        assert_eq!(group(&ws, 1), Some(&Cell::text("")));
        // zero is not a code
        assert_eq!(sequence(&ws, 2), Some(&Cell::Empty));
        // numeric description counts as described
        assert_eq!(sequence(&ws, 3), Some(&Cell::number(105.0)));
    }

    #[test]
    fn test_codes_classified_by_rendering() {
        let mut ws = sheet(vec![
            vec![Cell::text("000123"), Cell::Empty, Cell::Empty, "trim".into()],
            vec![Cell::number(123.0), Cell::Empty, Cell::Empty, "trim".into()],
            vec![Cell::formula("\"YZU\"&A2"), Cell::Empty, Cell::Empty, "body".into()],
        ]);

        transform(&mut ws).unwrap();

        assert_eq!(group(&ws, 1), Some(&Cell::text("fp-interior.color")));
        // "123" matches no prefix once rendered
        assert_eq!(group(&ws, 2), Some(&Cell::text("")));
        // Formula source "=\"YZU\"&A2" contains "YZU"
        assert_eq!(group(&ws, 3), Some(&Cell::text("fp-vehicle.bodycode")));
    }

    #[test]
    fn test_failure_leaves_sheet_untouched() {
        let mut ws = Worksheet::from_rows(
            "Sheet1",
            vec![vec![CODE_COLUMN, SEQUENCE_COLUMN, "Short Description"], vec!["YZU1", "", "x"]],
        );
        let before = ws.clone();

        let err = transform(&mut ws).unwrap_err();

        assert_eq!(err, TransformError::MissingColumn(GROUP_COLUMN.into()));
        assert_eq!(ws, before);
    }

    #[test]
    fn test_header_only_sheet() {
        let mut ws = sheet(vec![]);
        let stats = transform(&mut ws).unwrap();
        assert_eq!(stats.data_rows, 0);
        assert_eq!(stats.updated_rows, 0);
    }
}
