use std::sync::Arc;

use super::common::*;
use crate::grading::cache::CacheError;
use crate::grading::digest::snapshot_digest;
use crate::grading::domain::AnnotationType;
use crate::grading::engine::Submission;
use crate::grading::service::{
    ClassScoreRequest, GradingService, GradingServiceError, MatchRequest, ScoreRequest,
};
use crate::grading::validation::ScoringError;

fn score_request() -> ScoreRequest {
    ScoreRequest {
        annotations: vec![statistic_catch()],
        rubric_items: vec![fabricated_statistic()],
        text_length: 100,
    }
}

#[test]
fn score_text_caches_by_snapshot_digest() {
    let (service, cache) = build_service();
    let request = score_request();

    let first = service.score_text(&request).expect("scores");
    let second = service.score_text(&request).expect("scores");

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(first.digest, second.digest);
    assert_eq!(first.result, second.result);
    assert_eq!(
        first.digest,
        snapshot_digest(&request.annotations, &request.rubric_items, request.text_length)
    );
    assert_eq!(cache.entries.lock().expect("cache mutex poisoned").len(), 1);
}

#[test]
fn changed_snapshot_is_scored_again() {
    let (service, cache) = build_service();
    let mut request = score_request();
    let original = service.score_text(&request).expect("scores");

    request.annotations[0].note.push_str(" and uncited");
    let edited = service.score_text(&request).expect("scores");

    assert!(!edited.cached);
    assert_ne!(original.digest, edited.digest);
    assert_eq!(cache.entries.lock().expect("cache mutex poisoned").len(), 2);
}

#[test]
fn score_text_propagates_validation_errors_without_caching() {
    let (service, cache) = build_service();
    let mut request = score_request();
    request.text_length = 10;

    match service.score_text(&request) {
        Err(GradingServiceError::Invalid(ScoringError::SpanOutOfBounds { .. })) => {}
        other => panic!("expected out of bounds rejection, got {other:?}"),
    }
    assert!(cache.entries.lock().expect("cache mutex poisoned").is_empty());
}

#[test]
fn score_text_propagates_cache_failures() {
    let service = GradingService::new(scoring_engine(), Arc::new(UnavailableCache));

    match service.score_text(&score_request()) {
        Err(GradingServiceError::Cache(CacheError::Unavailable(_))) => {}
        other => panic!("expected cache failure, got {other:?}"),
    }
}

#[test]
fn match_text_returns_matches() {
    let (service, _) = build_service();
    let request = MatchRequest {
        annotations: vec![statistic_catch()],
        rubric_items: vec![fabricated_statistic()],
    };

    let matches = service.match_text(&request).expect("matches");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].rubric_item_id, "r-stat");
}

#[test]
fn score_class_isolates_invalid_submissions() {
    let (service, _) = build_service();
    let request = ClassScoreRequest {
        submissions: vec![
            Submission {
                submission_id: "student-1".to_string(),
                annotations: vec![statistic_catch()],
            },
            Submission {
                submission_id: "student-2".to_string(),
                annotations: vec![annotation("a-1", AnnotationType::Gap, 90, 20, "")],
            },
            Submission {
                submission_id: "student-3".to_string(),
                annotations: Vec::new(),
            },
        ],
        rubric_items: vec![fabricated_statistic()],
        text_length: 100,
    };

    let scores = service.score_class(&request);

    let ids: Vec<&str> = scores
        .iter()
        .map(|score| score.submission_id.as_str())
        .collect();
    assert_eq!(ids, vec!["student-1", "student-2", "student-3"]);
    assert_eq!(
        scores[0].result.as_ref().map(|result| result.normalized_final),
        Some(48.0)
    );
    assert!(scores[1].result.is_none());
    assert!(scores[1]
        .error
        .as_deref()
        .is_some_and(|error| error.contains("inverted span")));
    assert_eq!(
        scores[2].result.as_ref().map(|result| result.tier2_deductions),
        Some(-20.0)
    );
}
