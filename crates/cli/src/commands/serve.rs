//! Serve command handler.

use clap::Args;
use supportbot_core::{AppConfig, AppResult};
use supportbot_knowledge::Assistant;

/// Serve the chat endpoint over HTTP
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    pub async fn execute(&self, mut config: AppConfig) -> AppResult<()> {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }

        config.validate()?;

        let assistant = Assistant::from_config(&config)?;
        supportbot_server::serve(&config, assistant).await
    }
}
