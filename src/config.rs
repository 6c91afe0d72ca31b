use crate::engine::EngineConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Service configuration. Every flag can also be set through the
/// environment with a `PLACES_` prefix, which is how deployments
/// configure the container.
#[derive(Debug, Parser)]
#[command(name = "kiezplaces", about = "Typo-tolerant autocomplete for civic places")]
pub struct Settings {
    #[arg(long, env = "PLACES_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Maximum precomputed prefix depth (L). Memory vs query latency.
    #[arg(long, env = "PLACES_MAX_PREFIX_LENGTH", default_value_t = 8)]
    pub max_prefix_length: usize,

    /// Target reply size and completion-slot capacity (M).
    #[arg(long, env = "PLACES_MIN_COMPLETION_COUNT", default_value_t = 5)]
    pub min_completion_count: usize,

    /// Minimum input length before the edit-distance fallback runs (F).
    #[arg(long, env = "PLACES_MIN_LEV", default_value_t = 4)]
    pub min_lev: usize,

    /// Distance gap beyond which distance outranks relevance (C).
    #[arg(long, env = "PLACES_DISTANCE_CUT", default_value_t = 4)]
    pub distance_cut: usize,

    #[arg(long, env = "PLACES_CACHE_TTL_SECS", default_value_t = 60)]
    pub cache_ttl_secs: u64,

    #[arg(long, env = "PLACES_CACHE_CAPACITY", default_value_t = 10_000)]
    pub cache_capacity: u64,

    #[arg(long, env = "PLACES_FEEDBACK_QUEUE_CAPACITY", default_value_t = 1024)]
    pub feedback_queue_capacity: usize,

    #[arg(long, env = "PLACES_DISTRICTS_CSV", default_value = "data/districts.csv")]
    pub districts_csv: PathBuf,

    #[arg(long, env = "PLACES_STREETS_CSV", default_value = "data/streets.csv")]
    pub streets_csv: PathBuf,

    #[arg(long, env = "PLACES_LOCATIONS_CSV", default_value = "data/locations.csv")]
    pub locations_csv: PathBuf,

    #[arg(long, env = "PLACES_HOUSENUMBERS_CSV", default_value = "data/housenumbers.csv")]
    pub housenumbers_csv: PathBuf,
}

impl Settings {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_prefix_length: self.max_prefix_length,
            min_completion_count: self.min_completion_count,
            min_lev: self.min_lev,
            distance_cut: self.distance_cut,
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            cache_capacity: self.cache_capacity,
            feedback_queue_capacity: self.feedback_queue_capacity,
        }
    }
}
