mod alignment;
mod lexical;
mod location;

pub use alignment::{aligned_fragments, type_aligned};
pub use lexical::{keyword_overlap, tokenize};
pub use location::location_overlap;

use std::collections::BTreeMap;

use tracing::debug;

use super::config::ScoringConfig;
use super::domain::{Annotation, MatchConfidence, MatchResult, RubricItem};

/// Similarity signals measured for one (annotation, rubric item) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairSignals {
    pub location_overlap: f64,
    pub semantic_similarity: f64,
    pub type_aligned: bool,
}

impl PairSignals {
    pub fn measure(annotation: &Annotation, item: &RubricItem) -> Self {
        let annotation_text = format!("{} {}", annotation.note, annotation.selected_text);
        Self {
            location_overlap: location_overlap(annotation.span(), item.span()),
            semantic_similarity: keyword_overlap(&annotation_text, &item.description),
            type_aligned: type_aligned(annotation.kind, &item.category, &item.pass_source),
        }
    }

    /// Either strong positional or strong textual evidence is enough.
    pub fn is_candidate(&self, config: &ScoringConfig) -> bool {
        self.location_overlap > config.candidate_location_threshold
            || self.semantic_similarity > config.candidate_semantic_threshold
    }

    pub fn confidence(&self, config: &ScoringConfig) -> MatchConfidence {
        if self.location_overlap > config.high_location_threshold
            && self.semantic_similarity > config.high_semantic_threshold
        {
            MatchConfidence::High
        } else if self.is_candidate(config) {
            MatchConfidence::Medium
        } else {
            MatchConfidence::Low
        }
    }
}

/// Semantic similarity above which a pairing earns the full relevance points.
pub(crate) const STRONG_SEMANTIC_BAND: f64 = 0.2;
/// Semantic similarity above which a pairing earns partial relevance points.
pub(crate) const PARTIAL_SEMANTIC_BAND: f64 = 0.1;
/// Semantic similarity above which a long note earns the full depth bonus.
pub(crate) const DEEP_SEMANTIC_BAND: f64 = 0.25;
/// Semantic similarity above which any note earns the reduced depth bonus.
pub(crate) const SHALLOW_SEMANTIC_BAND: f64 = 0.15;

// The bands mirror the default confidence gates but stay fixed when a custom
// `ScoringConfig` moves those gates.

/// Quality of a candidate pairing in `[0, config.max_match_quality]`.
pub fn match_quality(annotation: &Annotation, signals: &PairSignals, config: &ScoringConfig) -> f64 {
    let semantic = signals.semantic_similarity;
    let note_len = annotation.note_len();
    let mut quality: f64 = 0.0;

    if signals.type_aligned || semantic > STRONG_SEMANTIC_BAND {
        quality += 3.0;
    } else if semantic > PARTIAL_SEMANTIC_BAND {
        quality += 1.5;
    }

    if note_len > 30 {
        quality += 2.0;
    }
    if note_len > 100 {
        quality += 1.0;
    }

    if annotation.has_evidence() {
        quality += 2.0;
    }

    if semantic > DEEP_SEMANTIC_BAND && note_len > 50 {
        quality += 2.0;
    } else if semantic > SHALLOW_SEMANTIC_BAND {
        quality += 1.0;
    }

    quality.clamp(0.0, config.max_match_quality.max(0.0))
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    annotation: usize,
    item: usize,
    confidence: MatchConfidence,
    quality: f64,
}

/// Infer a one-to-one assignment of annotations to confirmed rubric items.
///
/// Two greedy passes: each annotation keeps its best candidate, then each rubric item
/// keeps the best annotation among those that chose it. Annotations and rubric items are
/// visited in id order and ties keep the first visited, so the output is independent of
/// input order. An annotation whose chosen item is won by a rival stays unmatched.
pub(crate) fn match_annotations(
    annotations: &[Annotation],
    rubric_items: &[RubricItem],
    config: &ScoringConfig,
) -> Vec<MatchResult> {
    let mut annotations: Vec<&Annotation> = annotations.iter().collect();
    annotations.sort_by(|a, b| a.id.cmp(&b.id));

    let mut confirmed: Vec<&RubricItem> = rubric_items.iter().filter(|item| item.confirmed).collect();
    confirmed.sort_by(|a, b| a.id.cmp(&b.id));

    let mut candidate_count = 0usize;
    let mut best_per_annotation: Vec<Candidate> = Vec::new();

    for (annotation_idx, annotation) in annotations.iter().enumerate() {
        let mut best: Option<Candidate> = None;

        for (item_idx, item) in confirmed.iter().enumerate() {
            let signals = PairSignals::measure(annotation, item);
            if !signals.is_candidate(config) {
                continue;
            }
            candidate_count += 1;

            let candidate = Candidate {
                annotation: annotation_idx,
                item: item_idx,
                confidence: signals.confidence(config),
                quality: match_quality(annotation, &signals, config),
            };
            if best.map_or(true, |current| candidate.quality > current.quality) {
                best = Some(candidate);
            }
        }

        if let Some(candidate) = best {
            best_per_annotation.push(candidate);
        }
    }

    let mut best_per_item: BTreeMap<usize, Candidate> = BTreeMap::new();
    for candidate in &best_per_annotation {
        let keep = best_per_item
            .get(&candidate.item)
            .map_or(true, |current| candidate.quality > current.quality);
        if keep {
            best_per_item.insert(candidate.item, *candidate);
        }
    }

    let mut winners: Vec<Candidate> = best_per_item.into_values().collect();
    winners.sort_by_key(|candidate| candidate.annotation);

    debug!(
        annotations = annotations.len(),
        confirmed_items = confirmed.len(),
        candidates = candidate_count,
        displaced = best_per_annotation.len() - winners.len(),
        matches = winners.len(),
        "matched annotations to rubric"
    );

    winners
        .into_iter()
        .map(|candidate| MatchResult {
            annotation_id: annotations[candidate.annotation].id.clone(),
            rubric_item_id: confirmed[candidate.item].id.clone(),
            match_confidence: candidate.confidence,
            match_quality: candidate.quality,
        })
        .collect()
}
