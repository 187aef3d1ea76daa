use super::domain::ScoringResult;

/// Storage for computed scores keyed by snapshot digest, so the service can be exercised in isolation.
pub trait ScoreCache: Send + Sync {
    fn get(&self, digest: &str) -> Result<Option<ScoringResult>, CacheError>;
    fn put(&self, digest: String, result: ScoringResult) -> Result<(), CacheError>;
}

/// Error enumeration for cache failures.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("score cache unavailable: {0}")]
    Unavailable(String),
}

/// Cache that never stores anything, for callers that do their own caching.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl ScoreCache for NoCache {
    fn get(&self, _digest: &str) -> Result<Option<ScoringResult>, CacheError> {
        Ok(None)
    }

    fn put(&self, _digest: String, _result: ScoringResult) -> Result<(), CacheError> {
        Ok(())
    }
}
