mod coverage;

pub use coverage::CoverageMap;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::config::ScoringConfig;
use super::domain::{Annotation, AnnotationType, MatchResult, RubricItem, ScoringResult};
use super::validation::MAX_SPAN_OFFSET;

/// Round half up to `decimals` places (`-2.25` becomes `-2.2`, `2.25` becomes `2.3`).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

/// Percentage of the text covered by the union of all annotation spans, rounded.
///
/// The bitset only spans up to the furthest annotation end, so a long text with few
/// or no annotations costs nothing. Offsets past `MAX_SPAN_OFFSET` are ignored;
/// validated input never carries them.
pub fn coverage_score(annotations: &[Annotation], text_length: usize) -> u32 {
    let furthest_end = annotations
        .iter()
        .map(|annotation| annotation.span())
        .filter(|span| !span.is_empty())
        .map(|span| span.end)
        .max()
        .unwrap_or(0)
        .min(text_length)
        .min(MAX_SPAN_OFFSET);
    if text_length == 0 || furthest_end == 0 {
        return 0;
    }

    let mut map = CoverageMap::new(furthest_end);
    for annotation in annotations {
        map.mark(annotation.span());
    }

    round_to(map.covered() as f64 / text_length as f64 * 100.0, 0) as u32
}

/// Tier 1: severity-weighted quality of the catches, scaled to `tier1_cap`.
fn tier1(
    confirmed: &[&RubricItem],
    matches: &[MatchResult],
    config: &ScoringConfig,
) -> f64 {
    let max_possible: f64 = confirmed
        .iter()
        .map(|item| config.max_match_quality * item.severity.weight())
        .sum();
    if max_possible == 0.0 {
        return 0.0;
    }

    let by_id: HashMap<&str, &RubricItem> = confirmed
        .iter()
        .map(|item| (item.id.as_str(), *item))
        .collect();
    let achieved: f64 = matches
        .iter()
        .filter_map(|found| {
            by_id
                .get(found.rubric_item_id.as_str())
                .map(|item| found.match_quality * item.severity.weight())
        })
        .sum();

    round_to(achieved / max_possible * config.tier1_cap, 1)
}

/// Tier 2: severity-weighted share of confirmed items nobody caught, down to `-tier2_cap`.
fn tier2(confirmed: &[&RubricItem], missed: &[&RubricItem], config: &ScoringConfig) -> f64 {
    let tier2_max: f64 = confirmed.iter().map(|item| item.severity.weight() * 2.0).sum();
    if tier2_max == 0.0 {
        return 0.0;
    }

    let deduction: f64 = missed.iter().map(|item| item.severity.weight() * 2.0).sum();
    round_to(-(deduction / tier2_max) * config.tier2_cap, 1)
}

/// Tier 3: reward for substantive critiques the rubric did not anticipate.
fn tier3(beyond: &[&Annotation], config: &ScoringConfig) -> f64 {
    let total: f64 = beyond
        .iter()
        .map(|annotation| {
            let mut subtotal = 0.0;
            if annotation.note_len() > 30 {
                subtotal += 2.0;
            }
            if annotation.has_evidence() {
                subtotal += 3.0;
            }
            f64::min(subtotal, config.tier3_per_annotation_cap)
        })
        .sum();

    total.min(config.tier3_cap)
}

/// Compose the tiered score from the matcher output and the full input sets.
pub(crate) fn compose(
    annotations: &[Annotation],
    rubric_items: &[RubricItem],
    text_length: usize,
    matches: Vec<MatchResult>,
    config: &ScoringConfig,
) -> ScoringResult {
    let confirmed: Vec<&RubricItem> = rubric_items.iter().filter(|item| item.confirmed).collect();

    let matched_items: HashSet<&str> = matches
        .iter()
        .map(|found| found.rubric_item_id.as_str())
        .collect();
    let matched_annotations: HashSet<&str> = matches
        .iter()
        .map(|found| found.annotation_id.as_str())
        .collect();

    let missed: Vec<&RubricItem> = confirmed
        .iter()
        .copied()
        .filter(|item| !matched_items.contains(item.id.as_str()))
        .collect();
    let beyond: Vec<&Annotation> = annotations
        .iter()
        .filter(|annotation| {
            annotation.kind != AnnotationType::Accepted
                && !matched_annotations.contains(annotation.id.as_str())
        })
        .collect();

    let tier1_raw = tier1(&confirmed, &matches, config);
    let tier2_deductions = tier2(&confirmed, &missed, config);
    let tier3_bonus = tier3(&beyond, config);
    let coverage = coverage_score(annotations, text_length);

    let coverage_multiplier = if coverage < config.coverage_threshold {
        config.coverage_penalty_multiplier
    } else {
        1.0
    };

    let composite_raw = round_to(
        tier1_raw * coverage_multiplier + tier2_deductions + tier3_bonus,
        1,
    );
    let normalized_final = round_to(composite_raw.clamp(0.0, 100.0), 1);

    debug!(
        tier1_raw,
        tier2_deductions,
        tier3_bonus,
        coverage,
        coverage_multiplier,
        normalized_final,
        "composed tiered score"
    );

    ScoringResult {
        tier1_raw,
        tier2_deductions,
        tier3_bonus,
        coverage_score: coverage,
        composite_raw,
        normalized_final,
        missed_items: missed.iter().map(|item| item.id.clone()).collect(),
        beyond_rubric_annotations: beyond
            .iter()
            .map(|annotation| annotation.id.clone())
            .collect(),
        matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_rounds_half_up() {
        assert_eq!(round_to(48.0, 1), 48.0);
        assert_eq!(round_to(12.25, 1), 12.3);
        assert_eq!(round_to(-2.25, 1), -2.2);
        assert_eq!(round_to(14.5, 0), 15.0);
        assert_eq!(round_to(-20.0, 1), -20.0);
    }
}
