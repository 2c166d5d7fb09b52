//! Prompt builder for rendering templates and injecting context.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use std::collections::HashMap;
use supportbot_core::{AppError, AppResult};

/// Build the instruction string for one question.
///
/// `context` is the assembled knowledge base block; `None` substitutes the
/// definition's no-context placeholder so the model can decline in its own
/// words. Without a `system` template the whole instruction, persona
/// included, is a single user message.
///
/// # Example
/// ```no_run
/// use supportbot_prompt::{build_prompt, default_prompt};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let context = "Question: What is your return policy?\nAnswer: 30 days.";
/// let built = build_prompt(&default_prompt(), Some(context), "Can I return shoes?")?;
/// println!("{}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    context: Option<&str>,
    question: &str,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let context_included = context.is_some();
    let context_text = context.unwrap_or(&definition.no_context);

    let mut variables = HashMap::new();
    variables.insert("persona".to_string(), definition.persona.clone());
    variables.insert("refusal".to_string(), definition.refusal.clone());
    variables.insert("context".to_string(), context_text.to_string());
    variables.insert("question".to_string(), question.to_string());

    let user = render_template(&definition.template, &variables)?;
    let system = definition
        .system
        .as_deref()
        .map(|template| render_template(template, &variables))
        .transpose()?;

    Ok(BuiltPrompt::new(
        system,
        user,
        definition.id.clone(),
        context_included,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text prompt, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
