//! Relevance ranking.
//!
//! A [`Ranker`] turns a query and the knowledge base into a ranked,
//! thresholded list of at most [`MAX_MATCHES`] entries, best first. The
//! strategy is chosen once at startup with [`create_ranker`]; request
//! handling only ever sees the trait object.

pub mod fuzzy;
pub mod keyword;

pub use fuzzy::{fuzzy_distance, FuzzyRanker, MAX_PATTERN_CHARS};
pub use keyword::KeywordRanker;

use crate::types::{KnowledgeEntry, ScoredMatch};
use std::fmt;
use std::sync::Arc;
use supportbot_core::RetrievalStrategy;

/// Maximum number of entries a ranker returns.
pub const MAX_MATCHES: usize = 3;

/// Capability shared by every ranking strategy.
///
/// Implementations are pure functions of `(query, entries)`: they hold no
/// mutable state and may run concurrently on the same knowledge base.
pub trait Ranker: Send + Sync + fmt::Debug {
    /// Strategy implemented by this ranker.
    fn strategy(&self) -> RetrievalStrategy;

    /// Rank `entries` against `query`, best match first.
    fn rank<'a>(&self, query: &str, entries: &'a [KnowledgeEntry]) -> Vec<ScoredMatch<'a>>;
}

/// Build the ranker for `strategy` with default tuning.
pub fn create_ranker(strategy: RetrievalStrategy) -> Arc<dyn Ranker> {
    match strategy {
        RetrievalStrategy::Keyword => Arc::new(KeywordRanker::default()),
        RetrievalStrategy::Fuzzy => Arc::new(FuzzyRanker::default()),
    }
}
