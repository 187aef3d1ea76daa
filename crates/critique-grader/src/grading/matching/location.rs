use crate::grading::domain::TextSpan;

/// Overlap of two spans normalized by the longer span, in `[0, 1]`.
///
/// A short span fully inside a long one scores `short / long`, so only two equal
/// spans that coincide reach `1.0`. Disjoint, touching and empty spans score `0.0`.
pub fn location_overlap(a: TextSpan, b: TextSpan) -> f64 {
    let overlap_start = a.start.max(b.start);
    let overlap_end = a.end.min(b.end);
    if overlap_start >= overlap_end {
        return 0.0;
    }

    let longest = a.len().max(b.len());
    (overlap_end - overlap_start) as f64 / longest as f64
}
