//! Tokenizer and stopword filter.
//!
//! Text is lowercased and split on runs of whitespace. Punctuation stays
//! attached to its token and no stemming is applied, so `"policy?"` and
//! `"policy"` are different terms.

use std::collections::BTreeSet;

/// Common English function words excluded from relevance scoring.
pub const STOPWORDS: [&str; 34] = [
    "i", "a", "about", "an", "are", "as", "at", "be", "by", "can", "com", "for", "from", "how",
    "in", "is", "it", "of", "on", "or", "that", "the", "this", "to", "was", "what", "when",
    "where", "who", "will", "with", "www", "my", "your",
];

/// Normalized, deduplicated set of significant terms.
pub type TermSet = BTreeSet<String>;

/// Whether `term` (already lowercased) is a stopword.
pub fn is_stopword(term: &str) -> bool {
    STOPWORDS.contains(&term)
}

/// Significant terms of `text` in order of appearance, duplicates kept.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| !is_stopword(word))
        .map(str::to_string)
        .collect()
}

/// The [`TermSet`] of `text`.
pub fn normalize(text: &str) -> TermSet {
    tokenize(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_drops_stopwords() {
        let terms = normalize("What is your Return Policy");
        let expected: TermSet = ["return", "policy"].iter().map(|s| s.to_string()).collect();
        assert_eq!(terms, expected);
    }

    #[test]
    fn test_splits_on_whitespace_runs() {
        assert_eq!(tokenize("  track\t\tmy \n order  "), vec!["track", "order"]);
    }

    #[test]
    fn test_punctuation_is_kept() {
        assert_eq!(tokenize("What is your return policy?"), vec!["return", "policy?"]);
    }

    #[test]
    fn test_empty_and_stopword_only_input() {
        assert!(normalize("").is_empty());
        assert!(normalize("   ").is_empty());
        assert!(normalize("the a is of").is_empty());
    }

    #[test]
    fn test_duplicates_collapse_in_term_set() {
        assert_eq!(tokenize("refund refund").len(), 2);
        assert_eq!(normalize("refund refund").len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let text = "How can I change the shipping address on my order?";
        assert_eq!(normalize(text), normalize(text));
    }
}
