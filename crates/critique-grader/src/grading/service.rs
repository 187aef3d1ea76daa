use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::cache::{CacheError, ScoreCache};
use super::digest::snapshot_digest;
use super::domain::{Annotation, MatchResult, RubricItem, ScoringResult};
use super::engine::{ScoringEngine, Submission, SubmissionScore};
use super::validation::ScoringError;

/// Annotations and rubric for one text, as sent to the match endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub rubric_items: Vec<RubricItem>,
}

/// Everything needed to score one student's work on one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub rubric_items: Vec<RubricItem>,
    pub text_length: usize,
}

/// A whole class's submissions on one text and its rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassScoreRequest {
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub rubric_items: Vec<RubricItem>,
    pub text_length: usize,
}

/// Score plus the snapshot digest it is cached under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredText {
    pub digest: String,
    pub cached: bool,
    pub result: ScoringResult,
}

/// Service composing the scoring engine and a score cache.
pub struct GradingService<C> {
    engine: Arc<ScoringEngine>,
    cache: Arc<C>,
}

impl<C> GradingService<C>
where
    C: ScoreCache + 'static,
{
    pub fn new(engine: ScoringEngine, cache: Arc<C>) -> Self {
        Self {
            engine: Arc::new(engine),
            cache,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn match_text(&self, request: &MatchRequest) -> Result<Vec<MatchResult>, GradingServiceError> {
        let matches = self
            .engine
            .match_annotations(&request.annotations, &request.rubric_items)
            .inspect_err(|err| warn!(%err, "match request rejected"))?;
        Ok(matches)
    }

    /// Score a snapshot, reusing a cached result when the exact snapshot was scored before.
    pub fn score_text(&self, request: &ScoreRequest) -> Result<ScoredText, GradingServiceError> {
        let digest = snapshot_digest(
            &request.annotations,
            &request.rubric_items,
            request.text_length,
        );

        if let Some(result) = self.cache.get(&digest)? {
            debug!(%digest, "score served from cache");
            return Ok(ScoredText {
                digest,
                cached: true,
                result,
            });
        }

        let result = self
            .engine
            .score(
                &request.annotations,
                &request.rubric_items,
                request.text_length,
            )
            .inspect_err(|err| warn!(%digest, %err, "score request rejected"))?;

        info!(
            %digest,
            normalized_final = result.normalized_final,
            matches = result.matches.len(),
            "scored annotations"
        );
        self.cache.put(digest.clone(), result.clone())?;

        Ok(ScoredText {
            digest,
            cached: false,
            result,
        })
    }

    pub fn score_class(&self, request: &ClassScoreRequest) -> Vec<SubmissionScore> {
        let scores = self.engine.score_class(
            &request.submissions,
            &request.rubric_items,
            request.text_length,
        );
        info!(
            submissions = scores.len(),
            rejected = scores.iter().filter(|score| score.error.is_some()).count(),
            "scored class"
        );
        scores
    }
}

/// Error raised by the grading service.
#[derive(Debug, thiserror::Error)]
pub enum GradingServiceError {
    #[error(transparent)]
    Invalid(#[from] ScoringError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}
