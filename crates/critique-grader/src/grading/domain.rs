use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type a student attaches to an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationType {
    Error,
    Verified,
    Alternative,
    Gap,
    Nuance,
    /// Endorsed as-is. Never a critique, so never type-aligned with a rubric issue.
    Accepted,
    /// Any type this build does not recognize. Matches only on text and position.
    #[serde(other)]
    Other,
}

impl AnnotationType {
    pub fn label(&self) -> &'static str {
        match self {
            AnnotationType::Error => "error",
            AnnotationType::Verified => "verified",
            AnnotationType::Alternative => "alternative",
            AnnotationType::Gap => "gap",
            AnnotationType::Nuance => "nuance",
            AnnotationType::Accepted => "accepted",
            AnnotationType::Other => "other",
        }
    }
}

/// Supporting material a student attached to an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

/// Student critique anchored to `[location_start, location_end)` of one text version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AnnotationType,
    pub location_start: usize,
    pub location_end: usize,
    #[serde(default)]
    pub selected_text: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl Annotation {
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.location_start, self.location_end)
    }

    /// Note length in characters.
    pub fn note_len(&self) -> usize {
        self.note.chars().count()
    }

    pub fn has_evidence(&self) -> bool {
        !self.evidence.is_empty()
    }
}

/// Instructor-assessed impact of a planted issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Moderate,
    Minor,
    #[serde(other)]
    Unknown,
}

impl Severity {
    /// Scoring multiplier; unrecognized severities count as minor.
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Critical => 3.0,
            Severity::Moderate => 2.0,
            Severity::Minor | Severity::Unknown => 1.0,
        }
    }
}

/// Planted issue in the source text, gated by instructor confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricItem {
    pub id: String,
    #[serde(default)]
    pub pass_source: String,
    pub severity: Severity,
    #[serde(default)]
    pub category: String,
    pub location_start: usize,
    pub location_end: usize,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub confirmed: bool,
}

impl RubricItem {
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.location_start, self.location_end)
    }
}

/// Half-open character range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How strongly the two similarity signals agree on a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    High,
    Medium,
    /// Kept for wire compatibility. The candidate gate already implies `Medium`,
    /// so the matcher never emits it.
    Low,
}

/// One-to-one correspondence between an annotation and a confirmed rubric item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub annotation_id: String,
    pub rubric_item_id: String,
    pub match_confidence: MatchConfidence,
    pub match_quality: f64,
}

/// Tiered score for one student's annotations on one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub tier1_raw: f64,
    pub tier2_deductions: f64,
    pub tier3_bonus: f64,
    pub coverage_score: u32,
    pub composite_raw: f64,
    pub normalized_final: f64,
    pub matches: Vec<MatchResult>,
    pub missed_items: Vec<String>,
    pub beyond_rubric_annotations: Vec<String>,
}

impl ScoringResult {
    pub fn summary(&self) -> String {
        let caught = self.matches.len();
        let confirmed = caught + self.missed_items.len();
        let mut summary = format!(
            "score {:.1}/100: caught {caught} of {confirmed} confirmed issue(s), coverage {}%",
            self.normalized_final, self.coverage_score
        );
        if !self.beyond_rubric_annotations.is_empty() {
            summary.push_str(&format!(
                ", {} insight(s) beyond the rubric",
                self.beyond_rubric_annotations.len()
            ));
        }
        summary
    }
}

/// Which input collection a record came from, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Annotation,
    RubricItem,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Annotation => write!(f, "annotation"),
            RecordKind::RubricItem => write!(f, "rubric item"),
        }
    }
}
