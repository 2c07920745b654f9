//! Error types for the Wersmap processing pipeline.
//!
//! This module defines one error type per layer:
//!
//! - [`WorkbookError`] - Spreadsheet reading/writing errors
//! - [`TransformError`] - Header/column errors raised by the row transformer
//! - [`UploadError`] - Rejected uploads (missing file, bad extension)
//! - [`StorageError`] - Upload folder errors
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Workbook Errors
// =============================================================================

/// Errors while reading or writing a spreadsheet.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The bytes are not a workbook calamine understands.
    #[error("Cannot open workbook: {0}")]
    OpenError(String),

    /// Workbook has no worksheet to process.
    #[error("Workbook contains no worksheet")]
    NoWorksheet,

    /// Failed to serialize the worksheet back to xlsx.
    #[error("Cannot write workbook: {0}")]
    WriteError(#[from] rust_xlsxwriter::XlsxError),
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors raised by the row transformer.
///
/// All of them are data-shape errors: the file is rejected as a whole and no
/// output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The code header is not in the first rows of the sheet.
    #[error("Could not find 'Top Family WERS Code' in the Excel file")]
    HeaderNotFound,

    /// A required column is absent from the header row.
    #[error("Required column '{0}' not found in the Excel file")]
    MissingColumn(String),

    /// Neither description column is present.
    #[error("Could not find either 'Short Description_CA-EN' or 'Short Description' column in the Excel file")]
    MissingDescriptionColumn,
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Errors for uploads rejected before processing.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No `file` part in the form.
    #[error("No file provided")]
    NoFile,

    /// File part present but without a name.
    #[error("No file selected")]
    EmptyFilename,

    /// Extension outside the allowed set.
    #[error("File type not allowed: {0} (expected .xlsx or .xls)")]
    ExtensionNotAllowed(String),

    /// Name is empty once sanitized.
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    /// Request body exceeds the configured upload limit.
    #[error("File too large: uploads are limited to {0} bytes")]
    TooLarge(usize),

    /// Multipart decoding failed.
    #[error("Multipart error: {0}")]
    Multipart(String),
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors from the upload folder.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Requested file does not exist (or escapes the folder).
    #[error("File not found: {0}")]
    NotFound(String),

    /// IO error.
    #[error("Storage IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::process_bytes`]
/// and [`crate::transform::pipeline::process_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Workbook error.
    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// Transformation error.
    #[error("{0}")]
    Transform(#[from] TransformError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Rejected upload.
    #[error("{0}")]
    Upload(#[from] UploadError),

    /// Storage error.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// True when the client sent something unusable (4xx rather than 5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServerError::Upload(_)
                | ServerError::Pipeline(PipelineError::Transform(_))
                | ServerError::Pipeline(PipelineError::Workbook(WorkbookError::OpenError(_)))
                | ServerError::Pipeline(PipelineError::Workbook(WorkbookError::NoWorksheet))
        )
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for workbook operations.
pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for upload checks.
pub type UploadResult<T> = Result<T, UploadError>;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
