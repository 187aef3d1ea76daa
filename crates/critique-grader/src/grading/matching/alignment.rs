use crate::grading::domain::AnnotationType;

/// Category / pass-source keyword fragments each annotation type is conceptually aligned with.
///
/// `Accepted` endorses a passage as-is and `Other` is unrecognized; neither aligns with
/// anything, so neither earns the alignment bonus.
pub fn aligned_fragments(kind: AnnotationType) -> &'static [&'static str] {
    match kind {
        AnnotationType::Error => &[
            "factual",
            "citation",
            "unverifiable_statistic",
            "statistic",
            "fabricat",
            "hallucinat",
            "accuracy",
        ],
        AnnotationType::Verified => &["factual", "citation", "unverifiable", "source"],
        AnnotationType::Alternative => &[
            "framing",
            "mechanism",
            "disciplinary",
            "perspective",
            "bias",
        ],
        AnnotationType::Gap => &["omission", "missing", "gap", "incomplete", "counterargument"],
        AnnotationType::Nuance => &[
            "framing",
            "mechanism",
            "disciplinary",
            "oversimplif",
            "overgeneraliz",
            "nuance",
        ],
        AnnotationType::Accepted | AnnotationType::Other => &[],
    }
}

/// Leading segment of a pass source such as `factual:pass-2` or `citation/llm`.
fn leading_segment(pass_source: &str) -> &str {
    pass_source
        .split([':', '/'])
        .next()
        .unwrap_or(pass_source)
}

/// True when any fragment for `kind` occurs in the category or the pass source's leading segment.
pub fn type_aligned(kind: AnnotationType, category: &str, pass_source: &str) -> bool {
    let category = category.to_lowercase();
    let source = leading_segment(pass_source).to_lowercase();

    aligned_fragments(kind)
        .iter()
        .any(|fragment| category.contains(fragment) || source.contains(fragment))
}
