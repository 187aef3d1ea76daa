use serde::{Deserialize, Serialize};

/// Thresholds and caps applied by the matcher and the score composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    /// Location overlap above which a pair becomes a candidate.
    pub candidate_location_threshold: f64,
    /// Keyword overlap above which a pair becomes a candidate.
    pub candidate_semantic_threshold: f64,
    pub high_location_threshold: f64,
    pub high_semantic_threshold: f64,
    pub max_match_quality: f64,
    pub tier1_cap: f64,
    pub tier2_cap: f64,
    pub tier3_cap: f64,
    pub tier3_per_annotation_cap: f64,
    /// Coverage percentage below which tier 1 is penalized.
    pub coverage_threshold: u32,
    pub coverage_penalty_multiplier: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            candidate_location_threshold: 0.3,
            candidate_semantic_threshold: 0.15,
            high_location_threshold: 0.6,
            high_semantic_threshold: 0.2,
            max_match_quality: 10.0,
            tier1_cap: 60.0,
            tier2_cap: 20.0,
            tier3_cap: 20.0,
            tier3_per_annotation_cap: 5.0,
            coverage_threshold: 40,
            coverage_penalty_multiplier: 0.8,
        }
    }
}
