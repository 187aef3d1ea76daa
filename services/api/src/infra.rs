use critique_grader::config::{load_scoring_config, ConfigError};
use critique_grader::grading::{CacheError, ScoreCache, ScoringConfig, ScoringResult};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local score cache keyed by snapshot digest, bounded by `capacity` entries.
#[derive(Clone)]
pub(crate) struct InMemoryScoreCache {
    entries: Arc<Mutex<HashMap<String, ScoringResult>>>,
    capacity: usize,
}

impl InMemoryScoreCache {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            capacity,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl Default for InMemoryScoreCache {
    fn default() -> Self {
        Self::with_capacity(10_000)
    }
}

impl ScoreCache for InMemoryScoreCache {
    fn get(&self, digest: &str) -> Result<Option<ScoringResult>, CacheError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| CacheError::Unavailable("score cache mutex poisoned".to_string()))?;
        Ok(guard.get(digest).cloned())
    }

    fn put(&self, digest: String, result: ScoringResult) -> Result<(), CacheError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| CacheError::Unavailable("score cache mutex poisoned".to_string()))?;
        // Digest keys never go stale; a full cache is simply cleared.
        if guard.len() >= self.capacity && !guard.contains_key(&digest) {
            guard.clear();
        }
        guard.insert(digest, result);
        Ok(())
    }
}

/// Scoring config from an explicit file, else the one carried by the app config.
pub(crate) fn resolve_scoring_config(
    path: Option<&Path>,
    fallback: ScoringConfig,
) -> Result<ScoringConfig, ConfigError> {
    match path {
        Some(path) => load_scoring_config(path),
        None => Ok(fallback),
    }
}
