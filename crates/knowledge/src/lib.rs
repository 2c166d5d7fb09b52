//! Knowledge base retrieval for Supportbot.
//!
//! Selects the knowledge base entries relevant to a question and turns them
//! into grounding context for the answer service:
//! - [`loader`]: reads the static question/answer records once at startup
//! - [`tokenizer`]: lowercasing, whitespace splitting, stopword removal
//! - [`rank`]: the exact-keyword and fuzzy rankers behind one [`Ranker`] trait
//! - [`context`]: formats the top matches into a bounded context block
//! - [`rag`]: the per-question orchestration ([`Assistant`])

pub mod context;
pub mod loader;
pub mod rag;
pub mod rank;
pub mod tokenizer;
pub mod types;


// Re-export commonly used types
pub use context::{assemble, Context, MAX_CONTEXT_ENTRIES};
pub use loader::KnowledgeBase;
pub use rag::{Answer, Assistant};
pub use rank::{create_ranker, FuzzyRanker, KeywordRanker, Ranker, MAX_MATCHES};
pub use tokenizer::{normalize, tokenize, TermSet};
pub use types::{KnowledgeEntry, ScoredMatch};
