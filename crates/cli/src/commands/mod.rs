//! Command handlers for the supportbot CLI.

pub mod ask;
pub mod search;
pub mod serve;

pub use ask::AskCommand;
pub use search::SearchCommand;
pub use serve::ServeCommand;
