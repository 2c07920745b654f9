//! Upload validation: accepted extensions and filename sanitizing.
//!
//! # Rules
//!
//! - only `.xlsx` and `.xls` files are accepted (case-insensitive)
//! - names are reduced to a safe ASCII form before touching the disk:
//!   directory parts are dropped, whitespace becomes `_`, characters outside
//!   `[A-Za-z0-9_.-]` are removed and leading/trailing `.`/`_` are trimmed
//!
//! # Example
//!
//! ```rust,ignore
//! use wersmap::validation::{allowed_file, secure_filename};
//!
//! assert!(allowed_file("parts.XLSX"));
//! assert_eq!(secure_filename("../../etc/my parts.xlsx"), "etc_my_parts.xlsx");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{UploadError, UploadResult};

/// Extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("static regex is valid"));

/// Lower-cased extension after the last dot, if any.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// Whether the filename carries an allowed extension.
pub fn allowed_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduce a client-supplied name to something safe to join onto a directory.
///
/// May return an empty string when nothing usable is left.
pub fn secure_filename(filename: &str) -> String {
    let flattened = filename.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_CHARS.replace_all(&joined, "");
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Validate an uploaded filename and return its sanitized form.
pub fn check_upload(filename: Option<&str>) -> UploadResult<String> {
    let filename = filename.ok_or(UploadError::NoFile)?;
    if filename.is_empty() {
        return Err(UploadError::EmptyFilename);
    }
    if !allowed_file(filename) {
        return Err(UploadError::ExtensionNotAllowed(filename.to_string()));
    }

    let safe = secure_filename(filename);
    if safe.is_empty() || !allowed_file(&safe) {
        return Err(UploadError::InvalidFilename(filename.to_string()));
    }
    Ok(safe)
}
