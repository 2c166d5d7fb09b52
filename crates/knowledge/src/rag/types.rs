//! Answer types.

use serde::{Deserialize, Serialize};

/// Response to one user question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Answer text shown to the user
    pub answer: String,

    /// Questions of the knowledge base entries used as grounding, best first
    pub sources: Vec<String>,

    /// Whether any knowledge base entry grounded the answer
    pub grounded: bool,

    /// Whether the answer service was called
    #[serde(skip_serializing)]
    pub generated: bool,

    /// Score of the best match under the active ranker
    #[serde(skip_serializing)]
    pub top_score: Option<f64>,
}

impl Answer {
    /// Canned refusal returned without calling the answer service.
    pub fn refusal(message: &str) -> Self {
        Self {
            answer: message.to_string(),
            sources: Vec::new(),
            grounded: false,
            generated: false,
            top_score: None,
        }
    }
}
