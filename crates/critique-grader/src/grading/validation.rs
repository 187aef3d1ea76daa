use std::collections::HashSet;

use super::domain::{Annotation, RecordKind, RubricItem};

/// Largest accepted span offset, in characters. Coverage keeps one bit per character
/// up to the furthest annotation end.
pub const MAX_SPAN_OFFSET: usize = 1 << 26;

/// Caller contract violations detected before any matching or scoring runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("{record} '{id}' has an inverted span ({start}..{end})")]
    InvertedSpan {
        record: RecordKind,
        id: String,
        start: usize,
        end: usize,
    },
    #[error("{record} '{id}' ends at offset {end}, beyond the text length {text_length}")]
    SpanOutOfBounds {
        record: RecordKind,
        id: String,
        end: usize,
        text_length: usize,
    },
    #[error("{record} '{id}' ends at offset {end}, beyond the supported limit {limit}")]
    SpanTooLong {
        record: RecordKind,
        id: String,
        end: usize,
        limit: usize,
    },
    #[error("duplicate {record} id '{id}'")]
    DuplicateId { record: RecordKind, id: String },
}

struct SpanRecord<'a> {
    record: RecordKind,
    id: &'a str,
    start: usize,
    end: usize,
}

fn span_records<'a>(
    annotations: &'a [Annotation],
    rubric_items: &'a [RubricItem],
) -> impl Iterator<Item = SpanRecord<'a>> {
    let annotations = annotations.iter().map(|annotation| SpanRecord {
        record: RecordKind::Annotation,
        id: &annotation.id,
        start: annotation.location_start,
        end: annotation.location_end,
    });
    let items = rubric_items.iter().map(|item| SpanRecord {
        record: RecordKind::RubricItem,
        id: &item.id,
        start: item.location_start,
        end: item.location_end,
    });
    annotations.chain(items)
}

fn check_unique<'a>(
    record: RecordKind,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ScoringError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ScoringError::DuplicateId {
                record,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Ids are unique per collection, every span has `start <= end` and no span ends past
/// `MAX_SPAN_OFFSET`.
pub(crate) fn validate_records(
    annotations: &[Annotation],
    rubric_items: &[RubricItem],
) -> Result<(), ScoringError> {
    check_unique(
        RecordKind::Annotation,
        annotations.iter().map(|annotation| annotation.id.as_str()),
    )?;
    check_unique(
        RecordKind::RubricItem,
        rubric_items.iter().map(|item| item.id.as_str()),
    )?;

    for span in span_records(annotations, rubric_items) {
        if span.start > span.end {
            return Err(ScoringError::InvertedSpan {
                record: span.record,
                id: span.id.to_string(),
                start: span.start,
                end: span.end,
            });
        }
        if span.end > MAX_SPAN_OFFSET {
            return Err(ScoringError::SpanTooLong {
                record: span.record,
                id: span.id.to_string(),
                end: span.end,
                limit: MAX_SPAN_OFFSET,
            });
        }
    }
    Ok(())
}

/// `validate_records` plus every span lying inside `[0, text_length]`.
pub(crate) fn validate_against_text(
    annotations: &[Annotation],
    rubric_items: &[RubricItem],
    text_length: usize,
) -> Result<(), ScoringError> {
    validate_records(annotations, rubric_items)?;

    for span in span_records(annotations, rubric_items) {
        if span.end > text_length {
            return Err(ScoringError::SpanOutOfBounds {
                record: span.record,
                id: span.id.to_string(),
                end: span.end,
                text_length,
            });
        }
    }
    Ok(())
}
