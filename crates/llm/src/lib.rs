//! Answer service integration for Supportbot.
//!
//! This crate provides a provider-agnostic abstraction over the generative
//! text model that turns an assembled prompt into an answer. The model is
//! treated as an opaque, failable text-completion service: one prompt in,
//! one answer out.
//!
//! # Providers
//! - **Gemini**: Google Generative Language API (default)
//! - **Ollama**: Local LLM runtime
//! - **Mock**: Deterministic offline provider for development and tests
//!
//! # Example
//! ```no_run
//! use supportbot_llm::{LlmClient, LlmRequest, providers::GeminiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new("api-key");
//! let request = LlmRequest::new("Hello, world!", "gemini-1.5-flash-latest");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GeminiClient, MockClient, OllamaClient};
pub use supportbot_core::ProviderType;
