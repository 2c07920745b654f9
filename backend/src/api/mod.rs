//! HTTP API module.
//!
//! This module provides the HTTP server, the HTML upload pages, the API
//! types and the broadcast logger.

pub mod logs;
pub mod page;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::{router, start_server, AppState};
pub use types::*;
