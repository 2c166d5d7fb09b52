//! LLM provider factory.
//!
//! Builds the answer service client once at startup from the resolved
//! configuration. A provider that needs a credential and has none is a
//! startup error.

use crate::client::LlmClient;
use crate::providers::{
    gemini::DEFAULT_GEMINI_ENDPOINT, ollama::DEFAULT_OLLAMA_ENDPOINT, GeminiClient, MockClient,
    OllamaClient,
};
use std::sync::Arc;
use std::time::Duration;
use supportbot_core::{AppError, AppResult, ProviderType};

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini", "ollama", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required by Gemini)
/// * `timeout` - Optional per-request timeout
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or its credential
/// is missing, and `AppError::Llm` if the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Option<Duration>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    if provider_type.requires_api_key() && api_key.map_or(true, |k| k.trim().is_empty()) {
        return Err(AppError::Config(format!(
            "{} provider requires API key",
            provider_type.as_str()
        )));
    }

    tracing::debug!("Creating {} client", provider_type.as_str());

    match provider_type {
        ProviderType::Gemini => {
            let base_url = endpoint.unwrap_or(DEFAULT_GEMINI_ENDPOINT);
            let mut client = GeminiClient::with_base_url(base_url, api_key.unwrap_or_default());
            if let Some(timeout) = timeout {
                client = client.with_timeout(timeout)?;
            }
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_ENDPOINT);
            let mut client = OllamaClient::with_base_url(base_url);
            if let Some(timeout) = timeout {
                client = client.with_timeout(timeout)?;
            }
            Ok(Arc::new(client))
        }
        ProviderType::Mock => Ok(Arc::new(MockClient::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None, None, None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_gemini_with_key_and_timeout() {
        let client =
            create_client("gemini", None, Some("key"), Some(Duration::from_secs(5))).unwrap();
        assert_eq!(client.provider_name(), "gemini");
    }

    #[test]
    fn test_gemini_requires_api_key() {
        match create_client("gemini", None, None, None) {
            Err(err) => assert!(err.to_string().contains("requires API key")),
            Ok(_) => panic!("Expected error for Gemini without API key"),
        }
        assert!(create_client("gemini", None, Some("  "), None).is_err());
    }

    #[test]
    fn test_create_mock_client() {
        let client = create_client("mock", None, None, None).unwrap();
        assert_eq!(client.provider_name(), "mock");
    }

    #[test]
    fn test_google_alias_builds_gemini() {
        let client = create_client("google", None, Some("key"), None).unwrap();
        assert_eq!(client.provider_name(), "gemini");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None, None) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
