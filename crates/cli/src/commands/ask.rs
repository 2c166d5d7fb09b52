//! Ask command handler.
//!
//! Runs one question through the same pipeline as the chat endpoint.

use clap::Args;
use supportbot_core::{AppConfig, AppResult};
use supportbot_knowledge::Assistant;

/// Answer a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    #[arg(value_parser = non_blank)]
    pub question: String,

    /// Output as JSON (answer, sources, grounded)
    #[arg(long)]
    pub json: bool,
}

fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("Question is required.".to_string())
    } else {
        Ok(value.to_string())
    }
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        config.validate()?;
        let assistant = Assistant::from_config(config)?;

        let answer = assistant.answer(&self.question).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&answer)?);
        } else {
            println!("{}", answer.answer);
            if !answer.sources.is_empty() {
                tracing::debug!("Sources: {}", answer.sources.join(" | "));
            }
        }

        Ok(())
    }
}
