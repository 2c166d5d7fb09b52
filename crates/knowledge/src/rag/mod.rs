//! Retrieval-augmented answering.
//!
//! Ranks the knowledge base for a question, assembles the grounding context
//! and asks the answer service to respond from that context only.

pub mod ask;
pub mod types;

pub use ask::Assistant;
pub use types::Answer;
