//! Versioned taxonomy snapshots
//!
//! A [`Taxonomy`] is an immutable, versioned view of all matching rules:
//! functions → sub-functions → keyword patterns, seniority keyword
//! patterns, and the alias table used by normalization. Snapshots are
//! built once from a serde-friendly [`TaxonomySpec`] and never mutated;
//! a reload constructs a fresh snapshot (with a new version id) and the
//! engine publishes it with a single pointer swap.
//!
//! Declaration order is significant: candidate ties are broken in favor
//! of the first-declared entry, so functions and seniority levels are
//! stored as ordered vectors rather than maps.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// How a keyword pattern matches text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Plain keyword, matched as whole word(s)
    Plain,
    /// Pattern containing regex metacharacters, matched as written
    Regex,
}

/// One compiled keyword pattern
///
/// Plain keywords ("growth", "paid media") are escaped and wrapped in
/// word boundaries; anything with regex metacharacters is compiled as
/// written inside a non-capturing boundary group. Compilation failures
/// surface at taxonomy construction, never mid-match.
#[derive(Debug, Clone)]
pub struct KeywordPattern {
    keyword: String,
    regex: Regex,
    kind: PatternKind,
}

impl KeywordPattern {
    fn compile(keyword: &str) -> Result<Self> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Err(Error::InvalidTaxonomy("empty keyword pattern".to_string()));
        }

        let is_plain = keyword
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ' || c == '-');

        let body = if is_plain {
            // Multi-word keywords tolerate any whitespace between words
            keyword
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        } else {
            format!("(?:{})", keyword)
        };

        let regex = Regex::new(&format!(r"\b{}\b", body)).map_err(|source| {
            Error::InvalidPattern {
                pattern: keyword.clone(),
                source,
            }
        })?;

        Ok(Self {
            keyword,
            regex,
            kind: if is_plain {
                PatternKind::Plain
            } else {
                PatternKind::Regex
            },
        })
    }

    /// The keyword as declared (lowercased)
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Test the pattern against a normalized title string
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }
}

/// A specialization within a function (e.g. Growth within Marketing)
#[derive(Debug, Clone)]
pub struct SubFunction {
    pub name: String,
    pub patterns: Vec<KeywordPattern>,
}

/// A top-level job domain category (e.g. Marketing)
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub sub_functions: Vec<SubFunction>,
}

/// A job level (e.g. Entry, Senior, Director) and its keyword patterns
#[derive(Debug, Clone)]
pub struct SeniorityLevel {
    pub label: String,
    pub patterns: Vec<KeywordPattern>,
}

/// One immutable snapshot of all matching rules
#[derive(Debug, Clone)]
pub struct Taxonomy {
    version: Uuid,
    functions: Vec<Function>,
    seniority: Vec<SeniorityLevel>,
    aliases: BTreeMap<String, String>,
}

impl Taxonomy {
    /// Validate and compile a spec into an immutable snapshot
    ///
    /// Fails fast on structural problems (zero functions, a function or
    /// sub-function with no keywords, an uncompilable pattern) so a broken
    /// mapping file is rejected at the load boundary, not discovered
    /// mid-match.
    pub fn from_spec(spec: TaxonomySpec) -> Result<Self> {
        if spec.functions.is_empty() {
            return Err(Error::InvalidTaxonomy(
                "taxonomy defines zero functions".to_string(),
            ));
        }

        let mut functions = Vec::with_capacity(spec.functions.len());
        for function in spec.functions {
            if function.name.trim().is_empty() {
                return Err(Error::InvalidTaxonomy("function with empty name".to_string()));
            }
            if function.sub_functions.is_empty() {
                return Err(Error::InvalidTaxonomy(format!(
                    "function {:?} has no sub-functions",
                    function.name
                )));
            }
            let mut sub_functions = Vec::with_capacity(function.sub_functions.len());
            for sub in function.sub_functions {
                if sub.name.trim().is_empty() {
                    return Err(Error::InvalidTaxonomy(format!(
                        "sub-function with empty name under {:?}",
                        function.name
                    )));
                }
                if sub.keywords.is_empty() {
                    return Err(Error::InvalidTaxonomy(format!(
                        "sub-function {:?} has no keywords",
                        sub.name
                    )));
                }
                let patterns = sub
                    .keywords
                    .iter()
                    .map(|k| KeywordPattern::compile(k))
                    .collect::<Result<Vec<_>>>()?;
                sub_functions.push(SubFunction {
                    name: sub.name,
                    patterns,
                });
            }
            functions.push(Function {
                name: function.name,
                sub_functions,
            });
        }

        let mut seniority = Vec::with_capacity(spec.seniority.len());
        for level in spec.seniority {
            if level.label.trim().is_empty() {
                return Err(Error::InvalidTaxonomy("seniority level with empty label".to_string()));
            }
            if level.keywords.is_empty() {
                return Err(Error::InvalidTaxonomy(format!(
                    "seniority level {:?} has no keywords",
                    level.label
                )));
            }
            let patterns = level
                .keywords
                .iter()
                .map(|k| KeywordPattern::compile(k))
                .collect::<Result<Vec<_>>>()?;
            seniority.push(SeniorityLevel {
                label: level.label,
                patterns,
            });
        }

        let aliases = spec
            .aliases
            .into_iter()
            .map(|(raw, canonical)| (raw.to_lowercase(), canonical.to_lowercase()))
            .collect();

        Ok(Self {
            version: Uuid::new_v4(),
            functions,
            seniority,
            aliases,
        })
    }

    /// Built-in default mappings, used when no external mapping is supplied
    pub fn default_mappings() -> Self {
        Self::from_spec(TaxonomySpec::default_mappings())
            .expect("built-in default mappings are structurally valid")
    }

    /// Unique identity of this snapshot
    pub fn version(&self) -> Uuid {
        self.version
    }

    /// Functions in declaration order
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Seniority levels in declaration order
    pub fn seniority(&self) -> &[SeniorityLevel] {
        &self.seniority
    }

    /// Single-level alias lookup for a normalized token
    pub fn alias(&self, token: &str) -> Option<&str> {
        self.aliases.get(token).map(String::as_str)
    }

    /// Total number of sub-functions across all functions
    pub fn sub_function_count(&self) -> usize {
        self.functions.iter().map(|f| f.sub_functions.len()).sum()
    }
}

// ============================================================================
// Serde-facing spec shape
// ============================================================================

/// Plain data shape of a taxonomy, as parsed from a mapping file
///
/// Array-based so declaration order survives deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomySpec {
    pub functions: Vec<FunctionSpec>,
    #[serde(default)]
    pub seniority: Vec<SenioritySpec>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub sub_functions: Vec<SubFunctionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubFunctionSpec {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenioritySpec {
    pub label: String,
    pub keywords: Vec<String>,
}

impl TaxonomySpec {
    /// The built-in mapping set shipped with the service
    pub fn default_mappings() -> Self {
        fn sub(name: &str, keywords: &[&str]) -> SubFunctionSpec {
            SubFunctionSpec {
                name: name.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            }
        }
        fn level(label: &str, keywords: &[&str]) -> SenioritySpec {
            SenioritySpec {
                label: label.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            }
        }

        Self {
            functions: vec![
                FunctionSpec {
                    name: "Marketing".to_string(),
                    sub_functions: vec![
                        sub("Growth", &["growth"]),
                        sub("Brand Management", &["brand"]),
                        sub("Performance Marketing", &["paid media"]),
                        sub("Content Marketing", &["content"]),
                        sub("Digital Marketing", &["digital"]),
                    ],
                },
                FunctionSpec {
                    name: "Sales".to_string(),
                    sub_functions: vec![
                        sub("Account Management", &["account"]),
                        sub("Business Development", &["business development"]),
                        sub("Sales Development", &["sales development"]),
                    ],
                },
                FunctionSpec {
                    name: "Engineering".to_string(),
                    sub_functions: vec![
                        sub("Frontend Development", &["frontend"]),
                        sub("Backend Development", &["backend"]),
                        sub("Full Stack Development", &["fullstack"]),
                        sub("Software Engineering", &["software"]),
                    ],
                },
            ],
            seniority: vec![
                level("Entry", &["intern", "junior", "associate", "analyst"]),
                level("Mid-Level", &["specialist"]),
                level("Manager", &["manager", "lead"]),
                level("Director", &["director", "head"]),
                level("VP", &["vp"]),
                level("C-Level", &["chief", "cmo", "cto"]),
                level("Senior", &["sr", "senior"]),
            ],
            aliases: [("dev", "developer"), ("eng", "engineer"), ("mgr", "manager")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
