//! Upload folder - stores uploaded workbooks and their processed output.
//!
//! Every name passed in is sanitized with [`secure_filename`] first, so
//! callers can hand over raw client input and still never read or write
//! outside the folder.
//!
//! Files of one upload are stored under a job prefix (`<job>_parts.xlsx`,
//! `<job>_processed_parts.xlsx`): two clients uploading `parts.xlsx` at the
//! same time never see each other's output.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{StorageError, StorageResult};
use crate::validation::secure_filename;

/// Default upload folder (relative to current dir)
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Prefix of processed output files.
pub const OUTPUT_PREFIX: &str = "processed_";

/// Name of the processed file for an upload: `processed_<stem>.xlsx`.
///
/// Output is always xlsx, so `.xls` uploads change extension.
pub fn output_name(upload_name: &str) -> String {
    let stem = Path::new(upload_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(upload_name);
    format!("{}{}.xlsx", OUTPUT_PREFIX, stem)
}

/// Stored name of a file belonging to an upload job: `<job>_<name>`.
pub fn job_file_name(job_id: &Uuid, name: &str) -> String {
    format!("{}_{}", job_id.simple(), secure_filename(name))
}

/// Stored name without its job prefix, as offered to the browser.
pub fn display_name(stored: &str) -> &str {
    match stored.split_once('_') {
        Some((job, rest))
            if !rest.is_empty()
                && job.len() == 32
                && job.chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            rest
        }
        _ => stored,
    }
}

/// Filesystem-backed upload folder.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open the store, creating the folder if needed.
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a stored file. Does not check existence.
    pub fn path_for(&self, name: &str) -> StorageResult<PathBuf> {
        let safe = secure_filename(name);
        if safe.is_empty() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        Ok(self.dir.join(safe))
    }

    /// Write a file, replacing any previous one with the same name.
    pub fn save(&self, name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        let path = self.path_for(name)?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Resolve an existing file for download.
    pub fn resolve(&self, name: &str) -> StorageResult<PathBuf> {
        let path = self.path_for(name)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(StorageError::NotFound(name.to_string()))
        }
    }

    /// Read a stored file.
    pub fn read(&self, name: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(name)?;
        Ok(fs::read(path)?)
    }
}
