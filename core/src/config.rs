use serde::{Deserialize, Serialize};

/// Ranked results never exceed this many documents.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;
/// Relevances closer than this are considered equal and ordered by rating.
pub const RELEVANCE_EPSILON: f64 = 1e-6;
pub const DEFAULT_ACCUMULATOR_SHARDS: usize = 100;

/// How an operation with a parallel form is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchServerConfig {
    /// Worker pool size for parallel evaluation; `None` uses every available core.
    pub worker_threads: Option<usize>,
    /// Number of independently locked shards used for parallel relevance accumulation.
    pub accumulator_shards: usize,
}

impl Default for SearchServerConfig {
    fn default() -> Self {
        Self { worker_threads: None, accumulator_shards: DEFAULT_ACCUMULATOR_SHARDS }
    }
}

impl SearchServerConfig {
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn with_accumulator_shards(mut self, shards: usize) -> Self {
        self.accumulator_shards = shards;
        self
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads.filter(|&n| n > 0).unwrap_or_else(num_cpus::get)
    }

    pub fn accumulator_shards(&self) -> usize {
        self.accumulator_shards.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_fall_back() {
        let config = SearchServerConfig::default().with_worker_threads(0).with_accumulator_shards(0);
        assert!(config.worker_threads() >= 1);
        assert_eq!(config.accumulator_shards(), 1);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: SearchServerConfig = serde_json::from_str(r#"{ "worker_threads": 3 }"#).unwrap();
        assert_eq!(config.worker_threads(), 3);
        assert_eq!(config.accumulator_shards, DEFAULT_ACCUMULATOR_SHARDS);
    }
}
