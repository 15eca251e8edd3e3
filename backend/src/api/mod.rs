//! HTTP API module.
//!
//! This module provides the HTTP server, response types and ZIP packaging.

pub mod archive;
pub mod server;
pub mod types;

pub use server::{router, start_server};
pub use types::*;
