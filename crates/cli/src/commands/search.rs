//! Search command handler.
//!
//! Shows what the active ranker would put in the context, without any
//! credential or network access.

use clap::Args;
use supportbot_core::{AppConfig, AppResult};
use supportbot_knowledge::{create_ranker, KnowledgeBase};

/// Show ranked knowledge base matches
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// The query to rank entries against
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let knowledge = KnowledgeBase::load(&config.knowledge_path)?;
        let ranker = create_ranker(config.strategy);
        let matches = ranker.rank(&self.query, knowledge.entries());

        tracing::info!(
            "{} match(es) for {:?} using {} ranking",
            matches.len(),
            self.query,
            config.strategy
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&matches)?);
            return Ok(());
        }

        if matches.is_empty() {
            println!("No matching entries.");
            return Ok(());
        }

        for (rank, m) in matches.iter().enumerate() {
            println!("{}. [{:.3}] {}", rank + 1, m.score, m.entry.question);
            println!("   {}", m.entry.answer);
        }

        Ok(())
    }
}
