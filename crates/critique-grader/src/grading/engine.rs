use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::config::ScoringConfig;
use super::domain::{Annotation, MatchResult, RubricItem, ScoringResult};
use super::matching::match_annotations;
use super::scoring::compose;
use super::validation::{validate_against_text, validate_records, ScoringError};

/// Stateless matcher and score composer parameterized by a `ScoringConfig`.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// One-to-one matches between annotations and confirmed rubric items.
    pub fn match_annotations(
        &self,
        annotations: &[Annotation],
        rubric_items: &[RubricItem],
    ) -> Result<Vec<MatchResult>, ScoringError> {
        validate_records(annotations, rubric_items)?;
        Ok(match_annotations(annotations, rubric_items, &self.config))
    }

    /// Tiered 0-100 score for one student's annotations on a text of `text_length` characters.
    pub fn score(
        &self,
        annotations: &[Annotation],
        rubric_items: &[RubricItem],
        text_length: usize,
    ) -> Result<ScoringResult, ScoringError> {
        validate_against_text(annotations, rubric_items, text_length)?;
        let matches = match_annotations(annotations, rubric_items, &self.config);
        Ok(compose(
            annotations,
            rubric_items,
            text_length,
            matches,
            &self.config,
        ))
    }

    /// Score every submission against the same rubric in parallel, preserving input order.
    pub fn score_class(
        &self,
        submissions: &[Submission],
        rubric_items: &[RubricItem],
        text_length: usize,
    ) -> Vec<SubmissionScore> {
        submissions
            .par_iter()
            .map(|submission| {
                match self.score(&submission.annotations, rubric_items, text_length) {
                    Ok(result) => SubmissionScore {
                        submission_id: submission.submission_id.clone(),
                        result: Some(result),
                        error: None,
                    },
                    Err(err) => {
                        warn!(submission_id = %submission.submission_id, %err, "submission rejected");
                        SubmissionScore {
                            submission_id: submission.submission_id.clone(),
                            result: None,
                            error: Some(err.to_string()),
                        }
                    }
                }
            })
            .collect()
    }
}

/// One student's annotations on the shared text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub submission_id: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Per-submission outcome of a class run; exactly one of `result` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionScore {
    pub submission_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoringResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Match with the default thresholds. See [`ScoringEngine::match_annotations`].
pub fn match_annotations_to_rubric(
    annotations: &[Annotation],
    rubric_items: &[RubricItem],
) -> Result<Vec<MatchResult>, ScoringError> {
    ScoringEngine::default().match_annotations(annotations, rubric_items)
}

/// Score with the default thresholds and caps. See [`ScoringEngine::score`].
pub fn calculate_score(
    annotations: &[Annotation],
    rubric_items: &[RubricItem],
    text_length: usize,
) -> Result<ScoringResult, ScoringError> {
    ScoringEngine::default().score(annotations, rubric_items, text_length)
}
