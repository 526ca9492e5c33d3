//! Confidence scoring and warning assembly
//!
//! Folds the matcher's candidates into a single (function, sub-function,
//! seniority, confidence) outcome. Ties are resolved deterministically in
//! favor of the first-declared candidate, with an `ambiguous_match`
//! warning naming the runners-up.
//!
//! Policy: overall confidence is the function-side confidence. Seniority
//! is informational; an unmatched seniority adds a warning but never
//! lowers the score or flips `matched`. The two paths are scored
//! independently and must stay that way (see the policy test below).

use crate::matcher::{MatchKind, TitleMatches};
use crate::result::{Warning, UNKNOWN_FUNCTION};

/// Partial result produced by the scorer, before timing and caching
#[derive(Debug, Clone)]
pub struct Scored {
    pub function: String,
    pub sub_function: Option<String>,
    pub seniority: Option<String>,
    pub confidence: f64,
    pub matched: bool,
    pub warnings: Vec<Warning>,
}

/// Fold candidates into a scored outcome
pub fn score(matches: &TitleMatches, min_confidence: f64) -> Scored {
    let mut warnings = Vec::new();

    let (function, sub_function, confidence, matched) = match matches.functions.split_first() {
        None => {
            warnings.push(Warning::NoMatch);
            (UNKNOWN_FUNCTION.to_string(), None, 0.0, false)
        }
        Some((winner, runners_up)) => {
            if !runners_up.is_empty() {
                warnings.push(Warning::AmbiguousMatch {
                    runners_up: runners_up
                        .iter()
                        .map(|c| format!("{} / {}", c.function, c.sub_function))
                        .collect(),
                });
            }
            let matched = match winner.kind {
                MatchKind::Exact | MatchKind::Regex => true,
                MatchKind::Fuzzy => winner.score >= min_confidence,
            };
            (
                winner.function.clone(),
                Some(winner.sub_function.clone()),
                winner.score,
                matched,
            )
        }
    };

    // Seniority ties (e.g. "senior" + "manager" both hitting) are everyday
    // input, not ambiguity; first-declared wins silently.
    let seniority = matches.seniority.first().map(|c| c.label.clone());
    if matched && seniority.is_none() {
        warnings.push(Warning::SeniorityUnmatched);
    }

    Scored {
        function,
        sub_function,
        seniority,
        confidence,
        matched,
        warnings,
    }
}
