//! Supportbot CLI
//!
//! Main entry point for the supportbot command-line tool.
//! Serves the chat endpoint and answers or searches from the terminal.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, SearchCommand, ServeCommand};
use std::path::PathBuf;
use supportbot_core::config::{AppConfig, ConfigOverrides};
use supportbot_core::{logging, AppResult, RetrievalStrategy};

/// Supportbot - customer support answers grounded in a FAQ knowledge base
#[derive(Parser, Debug)]
#[command(name = "supportbot")]
#[command(about = "Customer support chatbot grounded in a FAQ knowledge base", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "SUPPORTBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Knowledge base file (JSON or YAML)
    #[arg(short, long, global = true)]
    knowledge: Option<PathBuf>,

    /// Retrieval strategy
    #[arg(short, long, global = true, value_enum)]
    strategy: Option<RetrievalStrategy>,

    /// Answer service provider (gemini, ollama, mock)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the chat endpoint over HTTP
    Serve(ServeCommand),

    /// Answer a single question
    Ask(AskCommand),

    /// Show ranked knowledge base matches without calling the answer service
    Search(SearchCommand),
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            knowledge_path: self.knowledge.clone(),
            strategy: self.strategy,
            provider: self.provider.clone(),
            model: self.model.clone(),
            log_level: self.log_level.clone(),
            verbose: self.verbose,
            no_color: self.no_color,
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // File and environment first, flags on top
    let config = AppConfig::load(cli.config.clone())?.with_overrides(cli.overrides());

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.json_logs)?;

    tracing::debug!("Configuration: {:?}", config);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Search(_) => "search",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config),
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {}", e);
    }

    result
}
