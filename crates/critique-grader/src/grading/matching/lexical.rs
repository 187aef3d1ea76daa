//! Bilingual (Hebrew + English) keyword tokenization and Jaccard overlap.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

static STRIP_PATTERN: OnceLock<Regex> = OnceLock::new();
static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// Tokens of this many characters or fewer carry no signal.
const MIN_TOKEN_CHARS: usize = 2;

fn strip_pattern() -> &'static Regex {
    // Everything except word characters, whitespace and the Hebrew block.
    STRIP_PATTERN.get_or_init(|| {
        Regex::new(r"[^\w\s\x{0590}-\x{05FF}]").expect("static pattern compiles")
    })
}

fn stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(|| {
        [
            // English
            "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her",
            "was", "one", "our", "out", "has", "his", "him", "she", "its", "may", "who", "how",
            "this", "that", "with", "from", "they", "them", "their", "there", "these", "those",
            "than", "then", "into", "onto", "over", "under", "about", "above", "after", "before",
            "between", "through", "during", "while", "where", "when", "which", "what", "would",
            "could", "should", "been", "being", "have", "does", "did", "also", "such", "only",
            "very", "some", "more", "most", "other", "each", "both", "were", "will", "your",
            "yours", "ours", "hers", "itself", "themselves", "because", "upon", "here",
            // Hebrew
            "של", "את", "על", "עם", "זה", "זו", "זאת", "הוא", "היא", "הם", "הן", "אני", "אנחנו",
            "אתה", "אתם", "אתן", "גם", "או", "אבל", "כי", "אם", "לא", "כל", "יש", "אין", "מה",
            "מי", "איך", "כמו", "רק", "עוד", "אשר", "היה", "הייתה", "היו", "להיות", "אל", "מן",
            "בין", "לפי", "כדי", "אחרי", "לפני", "תחת", "אצל", "עד", "בו", "בה", "בהם", "לו",
            "לה", "להם", "שלו", "שלה", "שלהם", "אותו", "אותה", "אותם", "כך", "כן", "אז",
            "עכשיו", "כאן", "אלה", "אלו", "מאוד", "יותר", "פחות", "הזה", "הזאת", "הזו",
            "האלה", "האלו", "ההוא", "ההיא", "ההם", "ההן",
        ]
        .iter()
        .copied()
        .collect()
    })
}

/// Lowercase, strip punctuation, split on whitespace, drop short tokens and stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = strip_pattern().replace_all(&lowered, "");
    let stop_words = stop_words();

    stripped
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .filter(|token| !stop_words.contains(token))
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of the token sets of `a` and `b`, in `[0, 1]`.
pub fn keyword_overlap(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<String> = tokenize(a).into_iter().collect();
    let tokens_b: HashSet<String> = tokenize(b).into_iter().collect();

    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    intersection as f64 / union as f64
}
