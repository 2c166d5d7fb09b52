//! Configuration management for Supportbot.
//!
//! This module handles loading and merging configuration from multiple sources,
//! lowest precedence first:
//! - Built-in defaults
//! - Config file (`supportbot.yaml`, or the path in `SUPPORTBOT_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Configuration is resolved once at startup. A configuration that fails
//! [`AppConfig::validate`] must stop the process before it serves anything.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "supportbot.yaml";

/// Answer service providers the factory knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Gemini,
    Ollama,
    Mock,
}

impl ProviderType {
    pub const ALL: [ProviderType; 3] = [Self::Gemini, Self::Ollama, Self::Mock];

    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "ollama" => Some(Self::Ollama),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }

    /// Whether the provider refuses to run without a credential.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Gemini)
    }
}

/// Which ranking algorithm selects knowledge base entries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RetrievalStrategy {
    /// Stopword-filtered exact keyword overlap.
    #[default]
    #[value(alias = "exact")]
    Keyword,
    /// Approximate string matching tolerant of typos.
    Fuzzy,
}

impl RetrievalStrategy {
    /// Parse a strategy name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyword" | "exact" => Some(Self::Keyword),
            "fuzzy" => Some(Self::Fuzzy),
            _ => None,
        }
    }

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for RetrievalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when no knowledge base entry qualifies for a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoMatchPolicy {
    /// Call the model anyway with a "no information found" context so it
    /// phrases the refusal itself.
    #[default]
    AskModel,
    /// Return the canned refusal directly, without calling the model.
    Refuse,
}

impl NoMatchPolicy {
    /// Parse a policy name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ask-model" | "ask" => Some(Self::AskModel),
            "refuse" => Some(Self::Refuse),
            _ => None,
        }
    }

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AskModel => "ask-model",
            Self::Refuse => "refuse",
        }
    }
}

/// Main application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file the values were read from, if any
    pub config_file: Option<PathBuf>,

    /// Address the HTTP listener binds to
    pub host: String,

    /// Port the HTTP listener binds to
    pub port: u16,

    /// Origins allowed to call the chat endpoint. Empty means any origin.
    pub allowed_origins: Vec<String>,

    /// Path to the knowledge base file (JSON or YAML)
    pub knowledge_path: PathBuf,

    /// Active ranking algorithm
    pub strategy: RetrievalStrategy,

    /// Behavior when nothing in the knowledge base matches
    pub no_match: NoMatchPolicy,

    /// Answer service provider (e.g., "gemini", "ollama", "mock")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom provider endpoint
    pub endpoint: Option<String>,

    /// Environment variable holding the provider credential
    pub api_key_env: String,

    /// Resolved provider credential
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Answer service request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Sampling temperature forwarded to the model
    pub temperature: Option<f32>,

    /// Maximum tokens the model may generate
    pub max_tokens: Option<u32>,

    /// Custom prompt definition file
    pub prompt_path: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("config_file", &self.config_file)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field("knowledge_path", &self.knowledge_path)
            .field("strategy", &self.strategy)
            .field("no_match", &self.no_match)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("prompt_path", &self.prompt_path)
            .field("log_level", &self.log_level)
            .field("verbose", &self.verbose)
            .field("no_color", &self.no_color)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    server: Option<ServerSection>,
    knowledge: Option<KnowledgeSection>,
    llm: Option<LlmSection>,
    prompt: Option<PromptSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KnowledgeSection {
    path: Option<PathBuf>,
    strategy: Option<RetrievalStrategy>,
    no_match: Option<NoMatchPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    api_key_env: Option<String>,
    timeout: Option<u64>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromptSection {
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            host: "0.0.0.0".to_string(),
            port: 5001,
            allowed_origins: Vec::new(),
            knowledge_path: PathBuf::from("data/faqs.json"),
            strategy: RetrievalStrategy::default(),
            no_match: NoMatchPolicy::default(),
            provider: "gemini".to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
            endpoint: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            timeout_secs: Some(60),
            temperature: None,
            max_tokens: None,
            prompt_path: None,
            log_level: None,
            verbose: false,
            no_color: false,
            json_logs: false,
        }
    }
}

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub knowledge_path: Option<PathBuf>,
    pub strategy: Option<RetrievalStrategy>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration from the config file and the process environment.
    ///
    /// Environment variables:
    /// - `SUPPORTBOT_CONFIG`: Path to config file (when `config_file` is `None`)
    /// - `PORT`, `SUPPORTBOT_HOST`: Listener address
    /// - `SUPPORTBOT_ALLOWED_ORIGINS`: Comma-separated CORS allow-list
    /// - `SUPPORTBOT_KNOWLEDGE`: Knowledge base file
    /// - `SUPPORTBOT_STRATEGY`: `keyword` or `fuzzy`
    /// - `SUPPORTBOT_NO_MATCH`: `ask-model` or `refuse`
    /// - `SUPPORTBOT_PROVIDER`, `SUPPORTBOT_MODEL`: Answer service selection
    /// - `SUPPORTBOT_API_KEY`, or the variable named by `llm.apiKeyEnv`
    ///   (default `GEMINI_API_KEY`): Provider credential
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use supportbot_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Serving on port {}", config.port);
    /// ```
    pub fn load(config_file: Option<PathBuf>) -> AppResult<Self> {
        Self::load_with(config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration reading environment variables through `env`.
    pub fn load_with<F>(config_file: Option<PathBuf>, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = config_file.or_else(|| env("SUPPORTBOT_CONFIG").map(PathBuf::from));
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config.merge_yaml(&path)?;
                config.config_file = Some(path);
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    config.merge_yaml(&path)?;
                    config.config_file = Some(path);
                }
            }
        }

        config.apply_env(&env)?;

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(server) = file.server {
            if let Some(host) = server.host {
                self.host = host;
            }
            if let Some(port) = server.port {
                self.port = port;
            }
            if let Some(origins) = server.allowed_origins {
                self.allowed_origins = origins;
            }
        }

        if let Some(knowledge) = file.knowledge {
            if let Some(path) = knowledge.path {
                self.knowledge_path = path;
            }
            if let Some(strategy) = knowledge.strategy {
                self.strategy = strategy;
            }
            if let Some(no_match) = knowledge.no_match {
                self.no_match = no_match;
            }
        }

        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                self.provider = provider;
            }
            if let Some(model) = llm.model {
                self.model = model;
            }
            if llm.endpoint.is_some() {
                self.endpoint = llm.endpoint;
            }
            if let Some(api_key_env) = llm.api_key_env {
                self.api_key_env = api_key_env;
            }
            if llm.timeout.is_some() {
                self.timeout_secs = llm.timeout;
            }
            if llm.temperature.is_some() {
                self.temperature = llm.temperature;
            }
            if llm.max_tokens.is_some() {
                self.max_tokens = llm.max_tokens;
            }
        }

        if let Some(prompt) = file.prompt {
            if prompt.path.is_some() {
                self.prompt_path = prompt.path;
            }
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
            if let Some(json) = logging.json {
                self.json_logs = json;
            }
        }

        Ok(())
    }

    /// Apply environment variable overrides.
    fn apply_env<F>(&mut self, env: &F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = env("SUPPORTBOT_HOST") {
            self.host = host;
        }

        if let Some(port) = env("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid PORT value: {}", port)))?;
        }

        if let Some(origins) = env("SUPPORTBOT_ALLOWED_ORIGINS") {
            self.allowed_origins = parse_origin_list(&origins);
        }

        if let Some(path) = env("SUPPORTBOT_KNOWLEDGE") {
            self.knowledge_path = PathBuf::from(path);
        }

        if let Some(strategy) = env("SUPPORTBOT_STRATEGY") {
            self.strategy = RetrievalStrategy::parse(&strategy).ok_or_else(|| {
                AppError::Config(format!(
                    "Unknown retrieval strategy: {}. Supported: keyword, fuzzy",
                    strategy
                ))
            })?;
        }

        if let Some(policy) = env("SUPPORTBOT_NO_MATCH") {
            self.no_match = NoMatchPolicy::parse(&policy).ok_or_else(|| {
                AppError::Config(format!(
                    "Unknown no-match policy: {}. Supported: ask-model, refuse",
                    policy
                ))
            })?;
        }

        if let Some(provider) = env("SUPPORTBOT_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = env("SUPPORTBOT_MODEL") {
            self.model = model;
        }

        // Explicit key first, then the provider-specific variable
        self.api_key = env("SUPPORTBOT_API_KEY")
            .or_else(|| env(&self.api_key_env))
            .filter(|key| !key.trim().is_empty());

        if let Some(level) = env("RUST_LOG") {
            self.log_level = Some(level);
        }

        if env("NO_COLOR").is_some() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the config file and the
    /// environment.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.knowledge_path {
            self.knowledge_path = path;
        }

        if let Some(strategy) = overrides.strategy {
            self.strategy = strategy;
        }

        if let Some(provider) = overrides.provider {
            self.provider = provider;
        }

        if let Some(model) = overrides.model {
            self.model = model;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        self
    }

    /// Whether the active provider cannot run without a credential.
    pub fn requires_api_key(&self) -> bool {
        ProviderType::parse(&self.provider).is_some_and(|p| p.requires_api_key())
    }

    /// Validate configuration before serving.
    pub fn validate(&self) -> AppResult<()> {
        if ProviderType::parse(&self.provider).is_none() {
            let supported: Vec<&str> = ProviderType::ALL.iter().map(|p| p.as_str()).collect();
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                supported.join(", ")
            )));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model identifier cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(AppError::Config("Port must be non-zero".to_string()));
        }

        if self.requires_api_key() && self.api_key.is_none() {
            return Err(AppError::Config(format!(
                "API key not found: set {} or SUPPORTBOT_API_KEY",
                self.api_key_env
            )));
        }

        Ok(())
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 5001);
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.strategy, RetrievalStrategy::Keyword);
        assert_eq!(config.no_match, NoMatchPolicy::AskModel);
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let env = env_of(&[
            ("PORT", "8080"),
            ("SUPPORTBOT_STRATEGY", "fuzzy"),
            ("SUPPORTBOT_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("GEMINI_API_KEY", "secret"),
        ]);
        let config = AppConfig::load_with(None, env).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.strategy, RetrievalStrategy::Fuzzy);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let env = env_of(&[("PORT", "not-a-port")]);
        assert!(AppConfig::load_with(None, env).is_err());
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let env = env_of(&[("SUPPORTBOT_STRATEGY", "semantic")]);
        assert!(AppConfig::load_with(None, env).is_err());
    }

    #[test]
    fn test_yaml_then_env_precedence() {
        let file = write_config(
            r#"
server:
  port: 7000
  allowedOrigins: ["https://shop.example"]
knowledge:
  path: faq.yaml
  strategy: fuzzy
  noMatch: refuse
llm:
  provider: ollama
  model: llama3.2
  apiKeyEnv: OTHER_KEY
logging:
  level: warn
  color: false
"#,
        );

        let env = env_of(&[("SUPPORTBOT_MODEL", "mistral"), ("OTHER_KEY", "k")]);
        let config = AppConfig::load_with(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.allowed_origins, vec!["https://shop.example"]);
        assert_eq!(config.knowledge_path, PathBuf::from("faq.yaml"));
        assert_eq!(config.strategy, RetrievalStrategy::Fuzzy);
        assert_eq!(config.no_match, NoMatchPolicy::Refuse);
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert!(config.no_color);
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let result = AppConfig::load_with(
            Some(PathBuf::from("/nonexistent/supportbot.yaml")),
            env_of(&[]),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(ConfigOverrides {
            strategy: Some(RetrievalStrategy::Fuzzy),
            provider: Some("mock".to_string()),
            verbose: true,
            ..Default::default()
        });

        assert_eq!(config.strategy, RetrievalStrategy::Fuzzy);
        assert_eq!(config.provider, "mock");
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_requires_gemini_key() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());

        let config = AppConfig {
            api_key: Some("key".to_string()),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_provider() {
        let config = AppConfig {
            provider: "unknown".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_google_alias_validates_like_gemini() {
        let without_key = AppConfig {
            provider: "Google".to_string(),
            ..AppConfig::default()
        };
        assert!(without_key.requires_api_key());
        assert!(matches!(without_key.validate(), Err(AppError::Config(_))));

        let with_key = AppConfig {
            api_key: Some("key".to_string()),
            ..without_key
        };
        assert!(with_key.validate().is_ok());
    }

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!(ProviderType::parse("gemini"), Some(ProviderType::Gemini));
        assert_eq!(ProviderType::parse("Google"), Some(ProviderType::Gemini));
        assert_eq!(ProviderType::parse("ollama"), Some(ProviderType::Ollama));
        assert_eq!(ProviderType::parse("mock"), Some(ProviderType::Mock));
        assert_eq!(ProviderType::parse("unknown"), None);
    }

    #[test]
    fn test_only_gemini_requires_key() {
        assert!(ProviderType::Gemini.requires_api_key());
        assert!(!ProviderType::Ollama.requires_api_key());
        assert!(!ProviderType::Mock.requires_api_key());
    }

    #[test]
    fn test_validate_mock_needs_no_key() {
        let config = AppConfig {
            provider: "mock".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("super-secret".to_string()),
            ..AppConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(RetrievalStrategy::parse("Keyword"), Some(RetrievalStrategy::Keyword));
        assert_eq!(RetrievalStrategy::parse("fuzzy"), Some(RetrievalStrategy::Fuzzy));
        assert_eq!(RetrievalStrategy::parse("vector"), None);
        assert_eq!(NoMatchPolicy::parse("refuse"), Some(NoMatchPolicy::Refuse));
    }
}
