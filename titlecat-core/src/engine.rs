//! Categorization engine
//!
//! Facade over the whole pipeline: owns the atomically-swappable taxonomy
//! snapshot, the result cache, and the bounded worker pool for batch
//! work. The per-title pipeline (normalize → match → score) is pure,
//! synchronous, and never blocks; the only shared-state touch points are
//! the lock-free snapshot load and the cache.
//!
//! Reload is the single mutation of shared state: it publishes a new
//! snapshot with one pointer swap, so in-flight pipelines observe either
//! the fully-old or fully-new taxonomy, never a mix. In-flight work holds
//! its own `Arc` and finishes against the version it started with.

use crate::cache::{CacheKey, ResultCache};
use crate::error::{Error, Result};
use crate::matcher::match_title;
use crate::normalize::normalize;
use crate::result::{Categorization, Warning};
use crate::scorer::score;
use crate::taxonomy::Taxonomy;
use arc_swap::ArcSwap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Engine tuning knobs, supplied by the surrounding layer
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum similarity for a fuzzy match to count (0.0–1.0)
    pub min_confidence: f64,
    /// Maximum number of cached results
    pub cache_capacity: usize,
    /// Worker pool size for batch processing
    pub workers: usize,
    /// Per-batch deadline; unfinished titles get a `timeout` warning
    pub batch_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.7,
            cache_capacity: 1024,
            workers: 4,
            batch_timeout: Duration::from_secs(10),
        }
    }
}

/// The categorization engine
///
/// Cheap to clone; clones share the taxonomy pointer, cache, and worker
/// pool.
#[derive(Clone)]
pub struct Engine {
    taxonomy: Arc<ArcSwap<Taxonomy>>,
    cache: Arc<ResultCache>,
    workers: Arc<Semaphore>,
    config: Arc<EngineConfig>,
}

impl Engine {
    /// Create an engine serving the given taxonomy snapshot
    pub fn new(taxonomy: Taxonomy, config: EngineConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.min_confidence) {
            return Err(Error::Config(format!(
                "min_confidence must be within 0.0..=1.0, got {}",
                config.min_confidence
            )));
        }
        if config.workers == 0 {
            return Err(Error::Config("worker pool size must be at least 1".to_string()));
        }

        info!(
            version = %taxonomy.version(),
            functions = taxonomy.functions().len(),
            sub_functions = taxonomy.sub_function_count(),
            "categorization engine initialized"
        );

        Ok(Self {
            taxonomy: Arc::new(ArcSwap::from_pointee(taxonomy)),
            cache: Arc::new(ResultCache::new(config.cache_capacity)),
            workers: Arc::new(Semaphore::new(config.workers)),
            config: Arc::new(config),
        })
    }

    /// Categorize a single title
    ///
    /// Never fails for ordinary text input: unmatched and empty titles
    /// produce unmatched results with warnings. Cache hits echo the
    /// caller's raw title and this call's elapsed time; the categorization
    /// fields come from the cached record.
    pub fn categorize(&self, raw_title: &str) -> Categorization {
        let started = Instant::now();
        let taxonomy = self.taxonomy.load_full();
        let title = normalize(raw_title, &taxonomy);
        let key = CacheKey::new(title.joined(), taxonomy.version());

        let cached = self.cache.get_or_compute(key, || {
            let matches = match_title(&title, &taxonomy, self.config.min_confidence);
            let scored = score(&matches, self.config.min_confidence);
            debug!(
                title = raw_title,
                function = %scored.function,
                confidence = scored.confidence,
                matched = scored.matched,
                "title categorized"
            );
            Categorization {
                original_title: raw_title.to_string(),
                function: scored.function,
                sub_function: scored.sub_function,
                seniority: scored.seniority,
                confidence: scored.confidence,
                matched: scored.matched,
                warnings: scored.warnings,
                processing_time_ms: elapsed_ms(started),
            }
        });

        let mut result = (*cached).clone();
        result.original_title = raw_title.to_string();
        result.processing_time_ms = elapsed_ms(started);
        result
    }

    /// Categorize a batch of titles concurrently
    ///
    /// Results are index-aligned with the input regardless of completion
    /// order. Concurrency is bounded by the worker pool, independent of
    /// batch size. A panic while processing one title is isolated into a
    /// `processing_error` result; titles unfinished at the batch deadline
    /// come back with a `timeout` warning instead of blocking the caller.
    pub async fn categorize_batch(&self, titles: Vec<String>) -> Vec<Categorization> {
        let deadline = tokio::time::Instant::now() + self.config.batch_timeout;
        let mut tasks = JoinSet::new();

        for (index, title) in titles.iter().enumerate() {
            let engine = self.clone();
            let workers = Arc::clone(&self.workers);
            let title = title.clone();
            tasks.spawn(async move {
                let Ok(_permit) = workers.acquire_owned().await else {
                    return (
                        index,
                        Categorization::unprocessed(title, Warning::ProcessingError),
                    );
                };
                let result = isolate_panic(&title, || engine.categorize(&title));
                (index, result)
            });
        }

        let mut slots: Vec<Option<Categorization>> = vec![None; titles.len()];
        while !tasks.is_empty() {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok((index, result)))) => slots[index] = Some(result),
                // A task aborted between spawn and completion; its slot is
                // filled with a timeout result below
                Ok(Some(Err(_))) => {}
                Ok(None) => break,
                Err(_) => {
                    error!(
                        pending = slots.iter().filter(|s| s.is_none()).count(),
                        "batch deadline expired, aborting unfinished titles"
                    );
                    tasks.abort_all();
                    break;
                }
            }
        }

        titles
            .into_iter()
            .zip(slots)
            .map(|(title, slot)| {
                slot.unwrap_or_else(|| Categorization::unprocessed(title, Warning::Timeout))
            })
            .collect()
    }

    /// Publish a new taxonomy snapshot with a single atomic pointer swap
    ///
    /// Cache entries keyed to the old version stay valid and age out
    /// through normal LRU eviction; no invalidation sweep runs.
    pub fn reload(&self, taxonomy: Taxonomy) {
        info!(
            old_version = %self.taxonomy.load().version(),
            new_version = %taxonomy.version(),
            "taxonomy reloaded"
        );
        self.taxonomy.store(Arc::new(taxonomy));
    }

    /// Identity of the currently active taxonomy snapshot
    pub fn taxonomy_version(&self) -> Uuid {
        self.taxonomy.load().version()
    }

    /// A reference to the currently active snapshot
    pub fn current_taxonomy(&self) -> Arc<Taxonomy> {
        self.taxonomy.load_full()
    }

    /// Number of currently cached results
    pub fn cached_results(&self) -> usize {
        self.cache.len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Run one title's pipeline, converting a panic into a `processing_error`
/// result so a defect in one title never aborts its batch siblings
fn isolate_panic<F>(title: &str, compute: F) -> Categorization
where
    F: FnOnce() -> Categorization,
{
    match catch_unwind(AssertUnwindSafe(compute)) {
        Ok(result) => result,
        Err(_) => {
            error!(title = %title, "categorization pipeline panicked");
            Categorization::unprocessed(title, Warning::ProcessingError)
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    let ms = started.elapsed().as_secs_f64() * 1000.0;
    (ms * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(Taxonomy::default_mappings(), EngineConfig::default()).unwrap()
    }

    #[test]
    fn rejects_out_of_range_min_confidence() {
        let config = EngineConfig {
            min_confidence: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::new(Taxonomy::default_mappings(), config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn rejects_zero_workers() {
        let config = EngineConfig {
            workers: 0,
            ..EngineConfig::default()
        };
        assert!(Engine::new(Taxonomy::default_mappings(), config).is_err());
    }

    #[test]
    fn cache_hit_echoes_the_raw_title() {
        let engine = engine();
        let first = engine.categorize("Senior Growth Manager");
        // Different raw spelling, same normalized key
        let second = engine.categorize("SENIOR  Growth   Manager");
        assert_eq!(engine.cached_results(), 1);
        assert_eq!(second.original_title, "SENIOR  Growth   Manager");
        assert_eq!(second.function, first.function);
        assert_eq!(second.sub_function, first.sub_function);
    }

    #[test]
    fn panics_are_isolated_into_processing_error_results() {
        let result = isolate_panic("Anything", || panic!("defect"));
        assert_eq!(result.original_title, "Anything");
        assert!(!result.matched);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.warnings, vec![Warning::ProcessingError]);
    }

    #[test]
    fn reload_swaps_the_version() {
        let engine = engine();
        let before = engine.taxonomy_version();
        engine.reload(Taxonomy::default_mappings());
        assert_ne!(engine.taxonomy_version(), before);
    }
}
