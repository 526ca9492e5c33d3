//! Taxonomy matching
//!
//! Resolves a normalized title against the taxonomy in two tiers. Tier 1
//! runs every exact/regex keyword pattern and keeps all hits across all
//! functions. Tier 2 (fuzzy similarity) only runs when tier 1 produced no
//! sub-function hit, and retains every sub-function tied at the top score
//! at or above the confidence threshold. Tie-breaking is the scorer's job;
//! the matcher reports all the evidence it finds.
//!
//! Seniority is resolved independently through the same two tiers, so a
//! title can match a sub-function with no detected seniority and vice
//! versa.

use crate::normalize::NormalizedTitle;
use crate::taxonomy::{PatternKind, Taxonomy};
use std::collections::BTreeSet;

/// How a candidate was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Regex,
    Fuzzy,
}

impl From<PatternKind> for MatchKind {
    fn from(kind: PatternKind) -> Self {
        match kind {
            PatternKind::Plain => MatchKind::Exact,
            PatternKind::Regex => MatchKind::Regex,
        }
    }
}

/// One function/sub-function candidate, ephemeral per title
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub function: String,
    pub sub_function: String,
    pub score: f64,
    pub kind: MatchKind,
}

/// One seniority candidate, ephemeral per title
#[derive(Debug, Clone)]
pub struct SeniorityCandidate {
    pub label: String,
    pub score: f64,
    pub kind: MatchKind,
}

/// All candidates found for one title, in taxonomy declaration order
#[derive(Debug, Clone, Default)]
pub struct TitleMatches {
    pub functions: Vec<MatchCandidate>,
    pub seniority: Vec<SeniorityCandidate>,
}

/// Match a normalized title against the taxonomy
///
/// An empty token sequence yields no candidates; no candidate above the
/// threshold yields an empty set. Neither is an error.
pub fn match_title(
    title: &NormalizedTitle,
    taxonomy: &Taxonomy,
    min_confidence: f64,
) -> TitleMatches {
    if title.is_empty() {
        return TitleMatches::default();
    }
    let joined = title.joined();

    TitleMatches {
        functions: match_functions(title, &joined, taxonomy, min_confidence),
        seniority: match_seniority(title, &joined, taxonomy, min_confidence),
    }
}

fn match_functions(
    title: &NormalizedTitle,
    joined: &str,
    taxonomy: &Taxonomy,
    min_confidence: f64,
) -> Vec<MatchCandidate> {
    let mut candidates = Vec::new();

    // Tier 1: exact/regex hits, all kept
    for function in taxonomy.functions() {
        for sub in &function.sub_functions {
            if let Some(pattern) = sub.patterns.iter().find(|p| p.is_match(joined)) {
                candidates.push(MatchCandidate {
                    function: function.name.clone(),
                    sub_function: sub.name.clone(),
                    score: 1.0,
                    kind: pattern.kind().into(),
                });
            }
        }
    }
    if !candidates.is_empty() {
        return candidates;
    }

    // Tier 2: fuzzy fallback, top-tied sub-functions at or above threshold
    let mut scored = Vec::new();
    let mut top = 0.0f64;
    for function in taxonomy.functions() {
        for sub in &function.sub_functions {
            let score = sub
                .patterns
                .iter()
                .map(|p| keyword_similarity(title, joined, p.keyword()))
                .fold(0.0f64, f64::max);
            top = top.max(score);
            scored.push((function, sub, score));
        }
    }
    if top < min_confidence {
        return Vec::new();
    }
    scored
        .into_iter()
        .filter(|(_, _, score)| (top - score).abs() <= f64::EPSILON)
        .map(|(function, sub, score)| MatchCandidate {
            function: function.name.clone(),
            sub_function: sub.name.clone(),
            score,
            kind: MatchKind::Fuzzy,
        })
        .collect()
}

fn match_seniority(
    title: &NormalizedTitle,
    joined: &str,
    taxonomy: &Taxonomy,
    min_confidence: f64,
) -> Vec<SeniorityCandidate> {
    let mut candidates = Vec::new();

    for level in taxonomy.seniority() {
        if let Some(pattern) = level.patterns.iter().find(|p| p.is_match(joined)) {
            candidates.push(SeniorityCandidate {
                label: level.label.clone(),
                score: 1.0,
                kind: pattern.kind().into(),
            });
        }
    }
    if !candidates.is_empty() {
        return candidates;
    }

    let mut scored = Vec::new();
    let mut top = 0.0f64;
    for level in taxonomy.seniority() {
        let score = level
            .patterns
            .iter()
            .map(|p| keyword_similarity(title, joined, p.keyword()))
            .fold(0.0f64, f64::max);
        top = top.max(score);
        scored.push((level, score));
    }
    if top < min_confidence {
        return Vec::new();
    }
    scored
        .into_iter()
        .filter(|(_, score)| (top - score).abs() <= f64::EPSILON)
        .map(|(level, score)| SeniorityCandidate {
            label: level.label.clone(),
            score,
            kind: MatchKind::Fuzzy,
        })
        .collect()
}

/// Similarity between a normalized title and one keyword in [0, 1]
///
/// Takes the better of a token-set comparison (so a keyword fully
/// contained in the title scores 1.0 regardless of surrounding tokens)
/// and the best single-token comparison (so one misspelled token in a
/// long title can still clear the threshold).
fn keyword_similarity(title: &NormalizedTitle, joined: &str, keyword: &str) -> f64 {
    let set_score = token_set_similarity(joined, keyword);
    let token_score = title
        .tokens()
        .iter()
        .map(|token| strsim::normalized_levenshtein(token, keyword))
        .fold(0.0f64, f64::max);
    set_score.max(token_score)
}

/// Token-set similarity over normalized Levenshtein
///
/// Compares sorted token intersections and differences pairwise and keeps
/// the best score, so shared tokens dominate and token order is ignored.
fn token_set_similarity(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a
        .intersection(&set_b)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let only_a = set_a
        .difference(&set_b)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let only_b = set_b
        .difference(&set_a)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let combined_a = join_nonempty(&intersection, &only_a);
    let combined_b = join_nonempty(&intersection, &only_b);

    let mut best = strsim::normalized_levenshtein(&combined_a, &combined_b);
    if !intersection.is_empty() {
        best = best
            .max(strsim::normalized_levenshtein(&intersection, &combined_a))
            .max(strsim::normalized_levenshtein(&intersection, &combined_b));
    }
    best
}

fn join_nonempty(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (_, true) => left.to_string(),
        _ => format!("{} {}", left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::taxonomy::Taxonomy;

    fn run(raw: &str) -> TitleMatches {
        let taxonomy = Taxonomy::default_mappings();
        let title = normalize(raw, &taxonomy);
        match_title(&title, &taxonomy, 0.7)
    }

    #[test]
    fn exact_hit_scores_one() {
        let matches = run("Senior Growth Manager");
        assert_eq!(matches.functions.len(), 1);
        let candidate = &matches.functions[0];
        assert_eq!(candidate.function, "Marketing");
        assert_eq!(candidate.sub_function, "Growth");
        assert_eq!(candidate.score, 1.0);
        assert_eq!(candidate.kind, MatchKind::Exact);
    }

    #[test]
    fn all_exact_hits_are_kept() {
        // "digital" (Marketing) and "software" (Engineering) both hit
        let matches = run("Digital Software Person");
        let subs: Vec<&str> = matches
            .functions
            .iter()
            .map(|c| c.sub_function.as_str())
            .collect();
        assert_eq!(subs, ["Digital Marketing", "Software Engineering"]);
    }

    #[test]
    fn fuzzy_tier_only_runs_without_exact_hits() {
        // Misspelled "backnd" has no exact hit anywhere
        let matches = run("Backnd");
        assert_eq!(matches.functions.len(), 1);
        let candidate = &matches.functions[0];
        assert_eq!(candidate.sub_function, "Backend Development");
        assert_eq!(candidate.kind, MatchKind::Fuzzy);
        assert!(candidate.score >= 0.7 && candidate.score < 1.0);
    }

    #[test]
    fn below_threshold_yields_nothing() {
        let matches = run("Zebra Wrangler");
        assert!(matches.functions.is_empty());
        assert!(matches.seniority.is_empty());
    }

    #[test]
    fn seniority_matches_independently() {
        let matches = run("Senior Zebra Wrangler");
        assert!(matches.functions.is_empty());
        assert_eq!(matches.seniority.len(), 1);
        assert_eq!(matches.seniority[0].label, "Senior");
        assert_eq!(matches.seniority[0].score, 1.0);
    }

    #[test]
    fn empty_title_yields_no_candidates() {
        let matches = run("");
        assert!(matches.functions.is_empty());
        assert!(matches.seniority.is_empty());
    }

    #[test]
    fn seniority_hits_keep_declaration_order() {
        // "senior" (Senior) and "manager" (Manager) both hit; Manager is
        // declared first in the default mappings
        let matches = run("Senior Growth Manager");
        let labels: Vec<&str> = matches.seniority.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Manager", "Senior"]);
    }

    #[test]
    fn token_set_ignores_order_and_extras() {
        assert_eq!(token_set_similarity("growth senior manager", "growth"), 1.0);
        assert_eq!(token_set_similarity("growth", "growth"), 1.0);
        assert_eq!(token_set_similarity("", "growth"), 0.0);
    }

    #[test]
    fn single_token_similarity_catches_misspellings() {
        let taxonomy = Taxonomy::default_mappings();
        let title = normalize("Juniour Backnd Developer", &taxonomy);
        let joined = title.joined();
        let score = keyword_similarity(&title, &joined, "backend");
        assert!(score >= 0.7 && score < 1.0);
    }
}
