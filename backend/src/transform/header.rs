//! Header row detection and column resolution.
//!
//! The header row is not always the first row: exports often carry a title
//! or a few metadata lines above it. The row holding the exact text
//! `Top Family WERS Code` within the first [`HEADER_SCAN_ROWS`] rows is taken
//! as the header.

use std::collections::HashMap;

use crate::error::{TransformError, TransformResult};
use crate::models::{Cell, Worksheet};

/// Business code column, also the header marker.
pub const CODE_COLUMN: &str = "Top Family WERS Code";

/// Column receiving the per-code sequence number.
pub const SEQUENCE_COLUMN: &str = "Sequence Number";

/// Column receiving the marketing group tag.
pub const GROUP_COLUMN: &str = "Marketing Group";

/// Required columns, in the order they are checked.
pub const REQUIRED_COLUMNS: [&str; 3] = [CODE_COLUMN, SEQUENCE_COLUMN, GROUP_COLUMN];

/// Accepted description columns, most preferred first.
pub const DESCRIPTION_COLUMNS: [&str; 2] = ["Short Description_CA-EN", "Short Description"];

/// Number of leading rows searched for the header marker.
pub const HEADER_SCAN_ROWS: usize = 10;

/// Find the header row.
///
/// Returns the 0-based row index of the first row among the first
/// [`HEADER_SCAN_ROWS`] rows containing a text cell equal to [`CODE_COLUMN`].
pub fn locate_header(ws: &Worksheet) -> TransformResult<usize> {
    ws.rows
        .iter()
        .take(HEADER_SCAN_ROWS)
        .position(|row| row.iter().any(|cell| cell.is_text(CODE_COLUMN)))
        .ok_or(TransformError::HeaderNotFound)
}

/// Column name → 1-based column index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: HashMap<String, usize>,
}

impl HeaderMap {
    /// Build the map from a header row.
    ///
    /// Empty cells are ignored. When a name appears twice the rightmost
    /// column wins.
    pub fn from_row(row: &[Cell]) -> Self {
        let columns = row
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_truthy())
            .map(|(idx, cell)| (cell.to_string(), idx + 1))
            .collect();
        Self { columns }
    }

    /// 1-based index of a column.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names sorted by position.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<(&str, usize)> = self
            .columns
            .iter()
            .map(|(name, idx)| (name.as_str(), *idx))
            .collect();
        names.sort_by_key(|(_, idx)| *idx);
        names.into_iter().map(|(name, _)| name).collect()
    }
}

/// Resolved 0-based positions of every column the sequencer touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub code: usize,
    pub sequence: usize,
    pub group: usize,
    pub description: usize,
    /// Name of the description column that was selected
    pub description_name: &'static str,
}

impl ColumnLayout {
    /// Check the required columns and pick the description column.
    pub fn resolve(headers: &HeaderMap) -> TransformResult<Self> {
        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !headers.contains(c)) {
            return Err(TransformError::MissingColumn(missing.to_string()));
        }

        let (description_name, description) = DESCRIPTION_COLUMNS
            .iter()
            .find_map(|name| headers.get(name).map(|idx| (*name, idx)))
            .ok_or(TransformError::MissingDescriptionColumn)?;

        let position = |name: &str| headers.get(name).map(|idx| idx - 1).unwrap_or_default();

        Ok(Self {
            code: position(CODE_COLUMN),
            sequence: position(SEQUENCE_COLUMN),
            group: position(GROUP_COLUMN),
            description: description - 1,
            description_name,
        })
    }
}
