use crate::grading::domain::TextSpan;

const WORD_BITS: usize = u64::BITS as usize;

/// Bitset over the character positions of one text, one bit per character.
#[derive(Debug, Clone)]
pub struct CoverageMap {
    words: Vec<u64>,
    len: usize,
}

impl CoverageMap {
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Mark `[span.start, span.end)` as covered; the part past the text end is ignored.
    pub fn mark(&mut self, span: TextSpan) {
        let start = span.start.min(self.len);
        let end = span.end.min(self.len);
        if start >= end {
            return;
        }

        let first_word = start / WORD_BITS;
        let last_word = (end - 1) / WORD_BITS;
        for word in first_word..=last_word {
            let lo = if word == first_word { start % WORD_BITS } else { 0 };
            let hi = if word == last_word {
                (end - 1) % WORD_BITS
            } else {
                WORD_BITS - 1
            };
            self.words[word] |= range_mask(lo, hi);
        }
    }

    pub fn covered(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.count_ones() as usize)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Bits `lo..=hi` set.
fn range_mask(lo: usize, hi: usize) -> u64 {
    let upper = if hi == WORD_BITS - 1 {
        u64::MAX
    } else {
        (1u64 << (hi + 1)) - 1
    };
    upper & !((1u64 << lo) - 1)
}
