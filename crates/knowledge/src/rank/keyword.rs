//! Exact-keyword scorer.

use super::{Ranker, MAX_MATCHES};
use crate::tokenizer::{normalize, tokenize};
use crate::types::{KnowledgeEntry, ScoredMatch};
use std::collections::HashSet;
use supportbot_core::RetrievalStrategy;

/// Scores entries by how many significant query terms appear verbatim in
/// the entry's keywords or question terms.
///
/// Scores are hit counts, higher is better. Entries with no hit are
/// dropped; equal scores keep knowledge base order.
#[derive(Debug, Clone)]
pub struct KeywordRanker {
    max_matches: usize,
}

impl KeywordRanker {
    pub fn new(max_matches: usize) -> Self {
        Self { max_matches }
    }

    /// Number of query terms found in the entry's term pool.
    ///
    /// A query term repeated in the query counts once per occurrence.
    pub fn score(query_terms: &[String], entry: &KnowledgeEntry) -> usize {
        let question_terms = normalize(&entry.question);
        let pool: HashSet<&str> = entry
            .keywords
            .iter()
            .map(String::as_str)
            .chain(question_terms.iter().map(String::as_str))
            .collect();

        query_terms
            .iter()
            .filter(|term| pool.contains(term.as_str()))
            .count()
    }
}

impl Default for KeywordRanker {
    fn default() -> Self {
        Self::new(MAX_MATCHES)
    }
}

impl Ranker for KeywordRanker {
    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::Keyword
    }

    fn rank<'a>(&self, query: &str, entries: &'a [KnowledgeEntry]) -> Vec<ScoredMatch<'a>> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() {
            tracing::debug!("Query has no significant terms after stopword removal");
            return Vec::new();
        }

        let mut matches: Vec<ScoredMatch<'a>> = entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                let score = Self::score(&query_terms, entry);
                (score > 0).then(|| ScoredMatch::new(position, entry, score as f64))
            })
            .collect();

        let qualifying = matches.len();

        // Stable: ties keep knowledge base order
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(self.max_matches);

        tracing::debug!(
            "Keyword ranking: {} qualifying entries, top score {:?}",
            qualifying,
            matches.first().map(|m| m.score)
        );

        matches
    }
}
