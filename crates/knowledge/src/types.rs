//! Knowledge system type definitions.

use serde::{Deserialize, Serialize};

/// One question/answer record of the knowledge base.
///
/// Entries are loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Canonical question as authored
    pub question: String,

    /// Answer text handed to the model as grounding
    pub answer: String,

    /// Curated lowercase search terms
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl KnowledgeEntry {
    /// Create an entry.
    pub fn new<I, S>(question: impl Into<String>, answer: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            answer: answer.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// A knowledge base entry paired with its relevance score for one query.
///
/// The meaning of `score` depends on the ranker that produced it: the
/// keyword ranker counts matched terms (higher is better), the fuzzy ranker
/// reports a normalized distance in `[0, 1]` (lower is better).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredMatch<'a> {
    /// Position of the entry in the loaded knowledge base
    pub position: usize,

    /// The matched entry
    pub entry: &'a KnowledgeEntry,

    /// Strategy-specific relevance score
    pub score: f64,
}

impl<'a> ScoredMatch<'a> {
    pub fn new(position: usize, entry: &'a KnowledgeEntry, score: f64) -> Self {
        Self {
            position,
            entry,
            score,
        }
    }
}
