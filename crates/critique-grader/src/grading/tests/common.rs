use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::grading::cache::{CacheError, ScoreCache};
use crate::grading::domain::{
    Annotation, AnnotationType, Evidence, RubricItem, ScoringResult, Severity,
};
use crate::grading::engine::ScoringEngine;
use crate::grading::service::GradingService;

/// Filler note of exactly `len` characters that yields no keyword tokens.
pub(super) fn filler_note(len: usize) -> String {
    "ab ".repeat(len / 3 + 1)[..len].to_string()
}

pub(super) fn annotation(
    id: &str,
    kind: AnnotationType,
    start: usize,
    end: usize,
    note: &str,
) -> Annotation {
    Annotation {
        id: id.to_string(),
        kind,
        location_start: start,
        location_end: end,
        selected_text: String::new(),
        note: note.to_string(),
        evidence: Vec::new(),
    }
}

pub(super) fn with_evidence(mut annotation: Annotation) -> Annotation {
    annotation.evidence.push(Evidence {
        id: format!("{}-ev", annotation.id),
        kind: "link".to_string(),
        content: "https://data.example.org/labour-survey".to_string(),
    });
    annotation
}

pub(super) fn rubric_item(
    id: &str,
    severity: Severity,
    category: &str,
    start: usize,
    end: usize,
    description: &str,
) -> RubricItem {
    RubricItem {
        id: id.to_string(),
        pass_source: "audit:pass-1".to_string(),
        severity,
        category: category.to_string(),
        location_start: start,
        location_end: end,
        description: description.to_string(),
        confirmed: true,
    }
}

/// Critical factual issue over `[0, 40)`.
pub(super) fn fabricated_statistic() -> RubricItem {
    rubric_item(
        "r-stat",
        Severity::Critical,
        "unverifiable_statistic",
        0,
        40,
        "Fabricated unemployment statistic",
    )
}

/// Catches `fabricated_statistic` with quality 8: aligned (+3), note of 38 chars (+2),
/// evidence (+2), strong overlap with a note too short for the top award (+1).
pub(super) fn statistic_catch() -> Annotation {
    with_evidence(annotation(
        "a-stat",
        AnnotationType::Error,
        0,
        40,
        "Fabricated unemployment statistic here",
    ))
}

pub(super) fn scoring_engine() -> ScoringEngine {
    ScoringEngine::default()
}

#[derive(Default, Clone)]
pub(super) struct MemoryCache {
    pub(super) entries: Arc<Mutex<HashMap<String, ScoringResult>>>,
}

impl ScoreCache for MemoryCache {
    fn get(&self, digest: &str) -> Result<Option<ScoringResult>, CacheError> {
        let guard = self.entries.lock().expect("cache mutex poisoned");
        Ok(guard.get(digest).cloned())
    }

    fn put(&self, digest: String, result: ScoringResult) -> Result<(), CacheError> {
        let mut guard = self.entries.lock().expect("cache mutex poisoned");
        guard.insert(digest, result);
        Ok(())
    }
}

pub(super) struct UnavailableCache;

impl ScoreCache for UnavailableCache {
    fn get(&self, _digest: &str) -> Result<Option<ScoringResult>, CacheError> {
        Err(CacheError::Unavailable("cache offline".to_string()))
    }

    fn put(&self, _digest: String, _result: ScoringResult) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("cache offline".to_string()))
    }
}

pub(super) fn build_service() -> (GradingService<MemoryCache>, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::default());
    let service = GradingService::new(scoring_engine(), cache.clone());
    (service, cache)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
