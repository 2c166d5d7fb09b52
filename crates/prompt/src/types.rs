//! Prompt types for Supportbot.

use serde::{Deserialize, Serialize};

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Fixed persona the model answers as
    pub persona: String,

    /// Sentence the model (or the service itself) uses when it cannot answer
    pub refusal: String,

    /// Placeholder inserted in place of the context block when nothing matched
    #[serde(rename = "noContext")]
    pub no_context: String,

    /// Template string with Handlebars syntax.
    ///
    /// Available variables: `persona`, `refusal`, `context`, `question`.
    pub template: String,

    /// Optional system instruction template, rendered with the same
    /// variables and sent apart from the user message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered system instruction, when the definition has one
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Whether knowledge base context was embedded (false means the
    /// no-context placeholder was used)
    #[serde(rename = "contextIncluded")]
    pub context_included: bool,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        system: Option<String>,
        user: String,
        source_prompt_id: String,
        context_included: bool,
    ) -> Self {
        Self {
            system,
            user,
            metadata: BuiltPromptMetadata {
                source_prompt_id,
                context_included,
            },
        }
    }
}
