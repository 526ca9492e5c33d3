//! # Title Categorization Engine (titlecat-core)
//!
//! Classifies free-text job titles into a controlled taxonomy of
//! (function, sub-function, seniority) with a confidence score and
//! diagnostic warnings.
//!
//! **Purpose:** Normalize raw titles, resolve them against a versioned
//! in-memory taxonomy (exact/regex matching with a fuzzy fallback),
//! memoize results, and fan out batches across a bounded worker pool.
//!
//! **Architecture:** Pure synchronous pipeline (normalize → match → score)
//! behind an [`Engine`] facade that owns the atomically-swappable taxonomy
//! snapshot, the LRU result cache, and the batch coordinator. The HTTP
//! transport lives in titlecat-server and only sees plain result records.

pub mod cache;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod result;
pub mod scorer;
pub mod taxonomy;

pub use engine::{Engine, EngineConfig};
pub use error::{Error, Result};
pub use result::{Categorization, Warning};
pub use taxonomy::{Taxonomy, TaxonomySpec};
