//! Transformation module.
//!
//! This module handles the WERS sheet transformation:
//! - Header: header row detection and column resolution
//! - Classifier: WERS code to marketing group
//! - Sequencer: per-code sequence numbers on described rows
//! - Pipeline: read, transform, write

pub mod classifier;
pub mod header;
pub mod pipeline;
pub mod sequencer;

pub use classifier::{classify, groups_description, MARKETING_GROUPS};
pub use header::{locate_header, ColumnLayout, HeaderMap};
pub use pipeline::*;
pub use sequencer::{transform, TransformStats};
