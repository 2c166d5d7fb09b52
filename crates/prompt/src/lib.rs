//! Prompt system for Supportbot.
//!
//! This crate turns a question and its grounding context into the single
//! instruction string sent to the answer service:
//! - YAML-based prompt definitions, with a built-in customer support default
//! - Handlebars template rendering
//! - An explicit placeholder when no knowledge base entry qualified

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{default_prompt, load_prompt};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
