//! Prompt loader for YAML prompt definitions.

use crate::types::PromptDefinition;
use std::path::Path;
use supportbot_core::{AppError, AppResult};

const DEFAULT_TEMPLATE: &str = r#"
{{persona}} Based ONLY on the following context, answer the user's question.
If the context does not contain the answer, say "{{refusal}}"
Do not use any information outside of the provided context.

Context:
---
{{context}}
---

User's Question: {{question}}
"#;

/// The built-in customer support prompt.
pub fn default_prompt() -> PromptDefinition {
    PromptDefinition {
        id: "support.answer.default".to_string(),
        title: "Customer support answer".to_string(),
        api_version: "1.0".to_string(),
        persona: "You are a helpful customer support chatbot.".to_string(),
        refusal: "I'm sorry, I don't have information on that. Please ask another question about our shipping, orders, or policies.".to_string(),
        no_context: "No relevant information found in the knowledge base.".to_string(),
        template: DEFAULT_TEMPLATE.to_string(),
        system: None,
    }
}

/// Load a prompt definition from a YAML file.
///
/// # Example
/// ```no_run
/// use supportbot_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("prompts/support.yml"))?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(path: &Path) -> AppResult<PromptDefinition> {
    tracing::debug!("Loading prompt from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Prompt(format!("Prompt file not found: {:?}", path)));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if def.system.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(AppError::Prompt(
            "Prompt system template cannot be blank".to_string(),
        ));
    }

    if def.refusal.trim().is_empty() {
        return Err(AppError::Prompt("Prompt refusal cannot be empty".to_string()));
    }

    // The question must reach the model, whatever else the template drops
    if !def.template.contains("{{question}}") {
        return Err(AppError::Prompt(format!(
            "Prompt template of '{}' must reference {{{{question}}}}",
            def.id
        )));
    }

    let valid_version = def
        .api_version
        .split_once('.')
        .map(|(major, minor)| {
            !major.is_empty()
                && !minor.is_empty()
                && major.chars().all(|c| c.is_ascii_digit())
                && minor.chars().all(|c| c.is_ascii_digit())
        })
        .unwrap_or(false);
    if !valid_version {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
