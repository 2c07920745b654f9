//! REST API types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::transform::pipeline::{ProcessResult, SheetInfo};
use crate::transform::header::REQUIRED_COLUMNS;
use crate::transform::TransformStats;

/// Response sent after a workbook upload was processed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "ready" or "warning" (some rows skipped)
    pub status: String,

    /// Stored name of the processed workbook
    pub output_file: String,

    /// Relative URL serving the processed workbook
    pub download_url: String,

    /// Metadata about the run
    pub metadata: ResponseMetadata,
}

/// Metadata about the run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Sanitized name of the uploaded file
    pub source_file: String,

    /// RFC 3339 completion time
    pub processed_at: String,

    /// Transformed sheet info
    pub sheet: SheetInfo,

    /// All sheets of the output workbook
    pub sheets: Vec<String>,

    /// Transformer statistics
    pub stats: TransformStats,
}

/// Health check body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl UploadResponse {
    pub fn new(
        job_id: String,
        source_file: String,
        output_file: String,
        result: &ProcessResult,
    ) -> Self {
        let status = if result.stats.skipped_rows == 0 { "ready" } else { "warning" };

        UploadResponse {
            job_id,
            status: status.to_string(),
            download_url: download_url(&output_file),
            output_file,
            metadata: ResponseMetadata {
                source_file,
                processed_at: Utc::now().to_rfc3339(),
                sheet: result.sheet.clone(),
                sheets: result.sheets.clone(),
                stats: result.stats.clone(),
            },
        }
    }
}

/// URL of the download route for a stored file.
pub fn download_url(filename: &str) -> String {
    format!("/download/{}", filename)
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "requiredColumns": REQUIRED_COLUMNS,
    })
}
