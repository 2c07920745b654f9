//! # Wersmap - WERS sequence numbers and marketing groups for Excel sheets
//!
//! Wersmap takes a feature export spreadsheet, numbers the described rows of
//! every "Top Family WERS Code" (100, 105, 110, ...) and tags each of them
//! with the marketing group derived from the code.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ .xlsx/.xls  │────▶│   Parser    │────▶│  Transform  │────▶│    Writer   │
//! │   upload    │     │ (calamine)  │     │ (seq+group) │     │   (.xlsx)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wersmap::{process_file, ProcessOptions};
//! use std::path::Path;
//!
//! let result = process_file(
//!     Path::new("input.xlsx"),
//!     Path::new("processed_input.xlsx"),
//!     &ProcessOptions::default(),
//! ).unwrap();
//! println!("Sequenced {} rows", result.stats.updated_rows);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Cells, worksheets and workbooks
//! - [`parser`] - Workbook reading (calamine)
//! - [`writer`] - Workbook writing (rust_xlsxwriter)
//! - [`transform`] - Header detection, classifier, sequencer, pipeline
//! - [`validation`] - Upload checks and filename sanitizing
//! - [`storage`] - Upload folder
//! - [`config`] - Server configuration
//! - [`api`] - HTTP server

// Core modules
pub mod error;
pub mod models;

// Spreadsheet I/O
pub mod parser;
pub mod writer;

// Transformation
pub mod transform;

// Uploads
pub mod storage;
pub mod validation;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    PipelineError, ServerError, StorageError, TransformError, UploadError, WorkbookError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Cell, Workbook, Worksheet};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    classify, groups_description, locate_header, transform, ColumnLayout,
    HeaderMap, TransformStats, MARKETING_GROUPS,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    process_bytes, process_file, process_workbook, ProcessOptions, ProcessResult, SheetInfo,
};

// =============================================================================
// Re-exports - Spreadsheet I/O
// =============================================================================

pub use parser::{read_workbook_bytes, read_workbook_file};
pub use writer::{write_workbook_bytes, write_workbook_file};

// =============================================================================
// Re-exports - Uploads & Config
// =============================================================================

pub use config::ServerConfig;
pub use storage::{output_name, UploadStore};
pub use validation::{allowed_file, check_upload, secure_filename};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, HealthResponse, ResponseMetadata, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
