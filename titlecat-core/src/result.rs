//! Categorization result records
//!
//! The externally visible unit of work: one immutable record per input
//! title, carrying the resolved categories, a confidence score, and
//! ordered diagnostic warnings.

use serde::{Deserialize, Serialize};

/// Function label used when no function could be determined
pub const UNKNOWN_FUNCTION: &str = "Unknown";

/// Diagnostic warning attached to a result
///
/// Warnings are informational: they never change a result into an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Warning {
    /// No function/sub-function could be determined
    NoMatch,
    /// Multiple candidates tied; first-declared won, the rest are listed
    AmbiguousMatch { runners_up: Vec<String> },
    /// Function matched but no seniority was detected
    SeniorityUnmatched,
    /// Per-title processing failed inside a batch
    ProcessingError,
    /// The batch deadline expired before this title was processed
    Timeout,
}

impl Warning {
    /// Stable snake_case code for logs and assertions
    pub fn code(&self) -> &'static str {
        match self {
            Warning::NoMatch => "no_match",
            Warning::AmbiguousMatch { .. } => "ambiguous_match",
            Warning::SeniorityUnmatched => "seniority_unmatched",
            Warning::ProcessingError => "processing_error",
            Warning::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One categorization result, immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categorization {
    pub original_title: String,
    /// Resolved function, or [`UNKNOWN_FUNCTION`] when unmatched
    pub function: String,
    pub sub_function: Option<String>,
    pub seniority: Option<String>,
    /// Confidence in [0, 1]; 1.0 for exact/regex matches
    pub confidence: f64,
    pub matched: bool,
    pub warnings: Vec<Warning>,
    pub processing_time_ms: f64,
}

impl Categorization {
    /// An unmatched result carrying a single warning
    ///
    /// Used for the batch coordinator's isolation paths (per-title failure,
    /// deadline expiry) where the pipeline never produced a real record.
    pub fn unprocessed(original_title: impl Into<String>, warning: Warning) -> Self {
        Self {
            original_title: original_title.into(),
            function: UNKNOWN_FUNCTION.to_string(),
            sub_function: None,
            seniority: None,
            confidence: 0.0,
            matched: false,
            warnings: vec![warning],
            processing_time_ms: 0.0,
        }
    }
}
