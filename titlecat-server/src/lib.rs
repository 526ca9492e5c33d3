//! # Title Categorization Service (titlecat-server)
//!
//! HTTP transport around the titlecat-core engine.
//!
//! **Purpose:** Expose title categorization over a small REST surface,
//! load the mapping file into a taxonomy snapshot, and serve health and
//! readiness probes. All categorization logic lives in titlecat-core;
//! this crate only parses requests, applies request-size limits, and
//! shapes responses.

pub mod api;
pub mod error;
pub mod loader;
pub mod settings;

pub use error::{Error, Result};
