//! Fuzzy matcher.
//!
//! Scores are normalized approximate-substring edit distances: the fewest
//! character edits needed to make the query appear anywhere inside a field,
//! divided by the query length. `0.0` is an exact occurrence, `1.0` means
//! nothing of the query could be aligned.

use super::{Ranker, MAX_MATCHES};
use crate::types::{KnowledgeEntry, ScoredMatch};
use supportbot_core::RetrievalStrategy;

/// Entries scoring at or above this distance are dropped.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Weight of the question field in the combined score.
pub const QUESTION_WEIGHT: f64 = 0.7;

/// Weight of the keyword field in the combined score.
pub const KEYWORD_WEIGHT: f64 = 0.3;

/// Longest query prefix, in characters, that takes part in fuzzy scoring.
///
/// Distance cost grows with query length times field length, so longer
/// queries are cut here before any entry is scored.
pub const MAX_PATTERN_CHARS: usize = 128;

/// `query` cut to at most [`MAX_PATTERN_CHARS`] characters.
pub fn pattern_prefix(query: &str) -> &str {
    match query.char_indices().nth(MAX_PATTERN_CHARS) {
        Some((end, _)) => &query[..end],
        None => query,
    }
}

/// Normalized distance between `pattern` and its best approximate
/// occurrence anywhere in `text`, case-insensitive.
///
/// Every end position in `text` is considered, so the result does not
/// depend on where in the field the match sits. An empty pattern has no
/// similarity to anything and scores `1.0`.
pub fn fuzzy_distance(pattern: &str, text: &str) -> f64 {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    if pattern.is_empty() {
        return 1.0;
    }
    let text: Vec<char> = text.to_lowercase().chars().collect();

    // Row i holds the cost of matching pattern[..i] ending at each text
    // position. Row 0 is all zeros: a match may start anywhere.
    let mut prev = vec![0usize; text.len() + 1];
    let mut cur = vec![0usize; text.len() + 1];

    for (i, pc) in pattern.iter().enumerate() {
        cur[0] = i + 1;
        for (j, tc) in text.iter().enumerate() {
            let substitution = prev[j] + usize::from(pc != tc);
            let deletion = prev[j + 1] + 1;
            let insertion = cur[j] + 1;
            cur[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    let best = prev.iter().copied().min().unwrap_or(pattern.len());
    best as f64 / pattern.len() as f64
}

/// Ranks entries by weighted fuzzy distance over question and keywords.
///
/// Scores are distances, lower is better. Entries at or above the
/// threshold are dropped; equal scores keep knowledge base order.
#[derive(Debug, Clone)]
pub struct FuzzyRanker {
    threshold: f64,
    question_weight: f64,
    keyword_weight: f64,
    max_matches: usize,
}

impl FuzzyRanker {
    pub fn new(threshold: f64, max_matches: usize) -> Self {
        Self {
            threshold,
            question_weight: QUESTION_WEIGHT,
            keyword_weight: KEYWORD_WEIGHT,
            max_matches,
        }
    }

    /// Override the field weights. They are expected to sum to 1.0 so the
    /// combined score stays in `[0, 1]`.
    pub fn with_weights(mut self, question_weight: f64, keyword_weight: f64) -> Self {
        self.question_weight = question_weight;
        self.keyword_weight = keyword_weight;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Combined distance of `query` to `entry`.
    ///
    /// The keyword field scores as its best keyword; an entry without
    /// keywords gets the worst keyword score.
    pub fn score(&self, query: &str, entry: &KnowledgeEntry) -> f64 {
        let question = fuzzy_distance(query, &entry.question);
        let keywords = entry
            .keywords
            .iter()
            .map(|keyword| fuzzy_distance(query, keyword))
            .fold(1.0_f64, f64::min);

        self.question_weight * question + self.keyword_weight * keywords
    }
}

impl Default for FuzzyRanker {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, MAX_MATCHES)
    }
}

impl Ranker for FuzzyRanker {
    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::Fuzzy
    }

    fn rank<'a>(&self, query: &str, entries: &'a [KnowledgeEntry]) -> Vec<ScoredMatch<'a>> {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Empty query, nothing to match");
            return Vec::new();
        }

        let pattern = pattern_prefix(query);
        if pattern.len() < query.len() {
            tracing::debug!(
                "Query cut to {} characters for fuzzy scoring",
                MAX_PATTERN_CHARS
            );
        }

        let mut matches: Vec<ScoredMatch<'a>> = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| ScoredMatch::new(position, entry, self.score(pattern, entry)))
            .filter(|m| m.score < self.threshold)
            .collect();

        let qualifying = matches.len();

        // Stable: ties keep knowledge base order
        matches.sort_by(|a, b| a.score.total_cmp(&b.score));
        matches.truncate(self.max_matches);

        tracing::debug!(
            "Fuzzy ranking: {} qualifying entries, best score {:?}",
            qualifying,
            matches.first().map(|m| m.score)
        );

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_exact_substring_is_zero() {
        assert_eq!(fuzzy_distance("return policy", "What is your return policy?"), 0.0);
        assert_eq!(fuzzy_distance("RETURN", "return"), 0.0);
    }

    #[test]
    fn test_single_typo() {
        // One missing letter against "return policy"
        let d = fuzzy_distance("retrn policy", "What is your return policy?");
        assert!(approx(d, 1.0 / 12.0), "distance was {}", d);
    }

    #[test]
    fn test_location_does_not_matter() {
        let early = fuzzy_distance("refund", "refund window and other details");
        let late = fuzzy_distance("refund", "other details and the refund");
        assert_eq!(early, late);
    }

    #[test]
    fn test_pattern_longer_than_text() {
        // "shipp" matches the first five letters; "ing" must be dropped
        assert!(approx(fuzzy_distance("shipping", "shipp"), 3.0 / 8.0));
        assert!(approx(fuzzy_distance("shipping", ""), 1.0));
    }

    #[test]
    fn test_no_similarity_is_one() {
        assert_eq!(fuzzy_distance("xyz", "abc"), 1.0);
        assert_eq!(fuzzy_distance("", "anything"), 1.0);
    }

    #[test]
    fn test_bounded_by_one() {
        for (p, t) in [("abc", "defghij"), ("longer query text", "x"), ("a", "")] {
            let d = fuzzy_distance(p, t);
            assert!((0.0..=1.0).contains(&d), "{} vs {} gave {}", p, t, d);
        }
    }

    #[test]
    fn test_weighted_score() {
        let ranker = FuzzyRanker::default();
        let entry = KnowledgeEntry::new("shipping costs", "Free over $50.", ["ship"]);
        // question: exact (0.0); keyword "ship": four letters of "shipping" missing (0.5)
        assert!(approx(ranker.score("shipping", &entry), 0.3 * 0.5));
    }

    #[test]
    fn test_entry_without_keywords_gets_worst_keyword_score() {
        let ranker = FuzzyRanker::default();
        let entry = KnowledgeEntry::new("shipping costs", "Free over $50.", Vec::<String>::new());
        assert!(approx(ranker.score("shipping", &entry), 0.3));
    }

    #[test]
    fn test_threshold_excludes_at_boundary() {
        // Keyword-only weighting: "xyz" never matches -> 1.0, dropped at any threshold <= 1
        let ranker = FuzzyRanker::new(1.0, MAX_MATCHES).with_weights(0.0, 1.0);
        let entries = vec![KnowledgeEntry::new("q", "a", ["abc"])];
        assert!(ranker.rank("xyz", &entries).is_empty());
    }

    #[test]
    fn test_pattern_prefix_counts_characters() {
        assert_eq!(pattern_prefix("short"), "short");

        let long = "é".repeat(MAX_PATTERN_CHARS + 10);
        let cut = pattern_prefix(&long);
        assert_eq!(cut.chars().count(), MAX_PATTERN_CHARS);
        assert!(long.starts_with(cut));
    }

    #[test]
    fn test_long_query_scored_on_its_prefix() {
        let entries = vec![
            KnowledgeEntry::new("Where is my package?", "Track it.", ["package", "tracking"]),
            KnowledgeEntry::new("What is your return policy?", "30 days.", ["return"]),
        ];
        let ranker = FuzzyRanker::default();

        let long = "where is my package ".repeat(25_000);
        let prefix: String = long.chars().take(MAX_PATTERN_CHARS).collect();

        let from_long: Vec<(usize, f64)> = ranker
            .rank(&long, &entries)
            .iter()
            .map(|m| (m.position, m.score))
            .collect();
        let from_prefix: Vec<(usize, f64)> = ranker
            .rank(&prefix, &entries)
            .iter()
            .map(|m| (m.position, m.score))
            .collect();

        assert_eq!(from_long, from_prefix);
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let entries = vec![KnowledgeEntry::new("q", "a", ["k"])];
        assert!(FuzzyRanker::default().rank("   ", &entries).is_empty());
    }
}
