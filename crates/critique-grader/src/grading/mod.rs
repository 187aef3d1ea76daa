//! Annotation-to-rubric matching and tiered scoring.
//!
//! Students annotate spans of a flawed AI-generated text; instructors confirm a rubric of
//! planted issues. The matcher pairs annotations with confirmed rubric items using textual
//! and positional similarity, and the composer turns those pairs into a 0-100 score from
//! catches, misses, insight beyond the rubric and text coverage. Both operations are pure
//! and hold no state between calls.

pub mod cache;
pub mod config;
pub(crate) mod digest;
pub mod domain;
pub(crate) mod engine;
pub mod matching;
pub mod router;
pub mod scoring;
pub mod service;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use cache::{CacheError, NoCache, ScoreCache};
pub use config::ScoringConfig;
pub use digest::snapshot_digest;
pub use domain::{
    Annotation, AnnotationType, Evidence, MatchConfidence, MatchResult, RecordKind, RubricItem,
    ScoringResult, Severity, TextSpan,
};
pub use engine::{
    calculate_score, match_annotations_to_rubric, ScoringEngine, Submission, SubmissionScore,
};
pub use router::grading_router;
pub use service::{
    ClassScoreRequest, GradingService, GradingServiceError, MatchRequest, ScoreRequest,
    ScoredText,
};
pub use validation::{ScoringError, MAX_SPAN_OFFSET};
