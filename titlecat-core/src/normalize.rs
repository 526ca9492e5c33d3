//! Title normalization
//!
//! Deterministic text-to-token pipeline: case folding, punctuation
//! stripping, whitespace tokenization, and single-level alias
//! substitution. Normalization is a pure function of the raw title and
//! the active taxonomy's alias table, which is what makes result caching
//! sound.

use crate::taxonomy::Taxonomy;

/// Ordered sequence of canonical tokens derived from one raw title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTitle {
    tokens: Vec<String>,
}

impl NormalizedTitle {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens joined with single spaces, the form regex patterns run against
    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Normalize a raw title against a taxonomy's alias table
///
/// Steps, in order: lowercase; strip punctuation except internal hyphens;
/// split on whitespace; substitute each token via the alias table.
/// Substitution is whole-token and single-level: a token whose alias
/// target is itself aliased is not re-substituted, so alias cycles cannot
/// loop. An empty or whitespace-only title yields an empty token sequence,
/// which is not an error at this layer.
pub fn normalize(raw: &str, taxonomy: &Taxonomy) -> NormalizedTitle {
    let lowered = raw.to_lowercase();

    let cleaned: String = lowered
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || c == '-' {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' {
                // Apostrophes collapse so contractions stay one token
                // ("int'l" → "intl"), they never split a word
                None
            } else {
                Some(' ')
            }
        })
        .collect();

    let tokens = cleaned
        .split_whitespace()
        .filter_map(|token| {
            // Hyphens survive only between alphanumerics ("mid-level"),
            // not as leading/trailing punctuation
            let token = token.trim_matches('-');
            if token.is_empty() {
                return None;
            }
            Some(match taxonomy.alias(token) {
                Some(canonical) => canonical.to_string(),
                None => token.to_string(),
            })
        })
        .collect();

    NormalizedTitle { tokens }
}
