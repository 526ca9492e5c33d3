//! Service configuration
//!
//! All knobs come from command-line arguments with environment variable
//! fallbacks. The engine-facing subset is converted into an
//! [`EngineConfig`] in one place so the two layers cannot drift apart.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use titlecat_core::EngineConfig;

/// Command-line arguments for titlecat-server
#[derive(Parser, Debug, Clone)]
#[command(name = "titlecat-server")]
#[command(about = "Job title categorization service")]
#[command(version)]
pub struct Settings {
    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "TITLECAT_PORT")]
    pub port: u16,

    /// Path to the TOML mapping file (built-in defaults when omitted)
    #[arg(short, long, env = "TITLECAT_CONFIG_PATH")]
    pub config_path: Option<PathBuf>,

    /// Minimum similarity for a fuzzy match to count (0.0-1.0)
    #[arg(long, default_value = "0.7", env = "TITLECAT_MIN_CONFIDENCE")]
    pub min_confidence: f64,

    /// Maximum number of titles accepted in one request
    #[arg(long, default_value = "100", env = "TITLECAT_MAX_TITLES")]
    pub max_titles_per_request: usize,

    /// Result cache capacity (entries)
    #[arg(long, default_value = "1024", env = "TITLECAT_CACHE_CAPACITY")]
    pub cache_capacity: usize,

    /// Worker pool size for batch processing
    #[arg(long, default_value = "4", env = "TITLECAT_WORKERS")]
    pub workers: usize,

    /// Per-batch deadline in milliseconds
    #[arg(long, default_value = "10000", env = "TITLECAT_BATCH_TIMEOUT_MS")]
    pub batch_timeout_ms: u64,
}

impl Settings {
    /// Engine-facing subset of the settings
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            min_confidence: self.min_confidence,
            cache_capacity: self.cache_capacity,
            workers: self.workers,
            batch_timeout: Duration::from_millis(self.batch_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_defaults() {
        let settings = Settings::parse_from(["titlecat-server"]);
        let config = settings.engine_config();
        assert_eq!(config.min_confidence, 0.7);
        assert_eq!(config.cache_capacity, 1024);
        assert_eq!(config.workers, 4);
        assert_eq!(config.batch_timeout, Duration::from_secs(10));
        assert_eq!(settings.max_titles_per_request, 100);
        assert!(settings.config_path.is_none());
    }
}
