//! Answer orchestration.
//!
//! Each question runs: rank → assemble context → build prompt → one call to
//! the answer service. The context is fully assembled before the call
//! starts, and nothing in ranking depends on the call's result.

use crate::context::assemble;
use crate::loader::KnowledgeBase;
use crate::rag::types::Answer;
use crate::rank::{create_ranker, Ranker};
use crate::types::ScoredMatch;
use std::sync::Arc;
use std::time::Duration;
use supportbot_core::{AppConfig, AppResult, NoMatchPolicy};
use supportbot_llm::{create_client, LlmClient, LlmRequest};
use supportbot_prompt::{build_prompt, default_prompt, load_prompt, PromptDefinition};

/// Immutable answering context shared by every request.
///
/// Built once at startup; handlers only borrow it.
#[derive(Clone)]
pub struct Assistant {
    knowledge: Arc<KnowledgeBase>,
    ranker: Arc<dyn Ranker>,
    client: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    no_match: NoMatchPolicy,
}

impl Assistant {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        ranker: Arc<dyn Ranker>,
        client: Arc<dyn LlmClient>,
        prompt: PromptDefinition,
        model: impl Into<String>,
    ) -> Self {
        Self {
            knowledge,
            ranker,
            client,
            prompt,
            model: model.into(),
            temperature: None,
            max_tokens: None,
            no_match: NoMatchPolicy::default(),
        }
    }

    /// Set the no-match policy.
    pub fn with_no_match(mut self, policy: NoMatchPolicy) -> Self {
        self.no_match = policy;
        self
    }

    /// Set sampling parameters forwarded to the answer service.
    pub fn with_generation(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Build the assistant from configuration.
    ///
    /// Loads the knowledge base and prompt and creates the answer service
    /// client. Every error here is startup-fatal.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let knowledge = Arc::new(KnowledgeBase::load(&config.knowledge_path)?);

        let prompt = match &config.prompt_path {
            Some(path) => load_prompt(path)?,
            None => default_prompt(),
        };

        let client = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            config.api_key.as_deref(),
            config.timeout_secs.map(Duration::from_secs),
        )?;

        let ranker = create_ranker(config.strategy);

        tracing::info!(
            "Assistant ready: {} entries, {} ranking, provider {} ({}), no-match policy {}",
            knowledge.len(),
            config.strategy,
            client.provider_name(),
            config.model,
            config.no_match.as_str()
        );

        Ok(Self::new(knowledge, ranker, client, prompt, &config.model)
            .with_no_match(config.no_match)
            .with_generation(config.temperature, config.max_tokens))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn ranker(&self) -> &dyn Ranker {
        self.ranker.as_ref()
    }

    pub fn no_match_policy(&self) -> NoMatchPolicy {
        self.no_match
    }

    /// Ranked matches for `question`, without calling the answer service.
    pub fn search(&self, question: &str) -> Vec<ScoredMatch<'_>> {
        self.ranker.rank(question, self.knowledge.entries())
    }

    /// Answer `question` from the knowledge base.
    ///
    /// # Errors
    /// Returns the answer service's error when the call fails. Callers
    /// facing end users must not forward its text.
    pub async fn answer(&self, question: &str) -> AppResult<Answer> {
        let matches = self.search(question);
        let context = assemble(&matches);
        let sources: Vec<String> = matches
            .iter()
            .take(context.entries())
            .map(|m| m.entry.question.clone())
            .collect();
        let top_score = matches.first().map(|m| m.score);

        tracing::info!(
            "Retrieved {} relevant entries ({} ranking)",
            context.entries(),
            self.ranker.strategy()
        );

        if context.is_empty() && self.no_match == NoMatchPolicy::Refuse {
            tracing::info!("No relevant entries, returning canned refusal");
            return Ok(Answer::refusal(&self.prompt.refusal));
        }

        let grounded = !context.is_empty();
        let built = build_prompt(&self.prompt, context.text(), question)?;
        let request = self.to_request(built.user, built.system);

        let response = self.client.complete(&request).await?;

        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.usage.total_tokens
        );

        Ok(Answer {
            answer: response.content,
            sources,
            grounded,
            generated: true,
            top_score,
        })
    }

    fn to_request(&self, prompt: String, system: Option<String>) -> LlmRequest {
        let mut request = LlmRequest::new(prompt, &self.model);

        if let Some(system) = system {
            request = request.with_system(system);
        }

        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        request
    }
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("entries", &self.knowledge.len())
            .field("ranker", &self.ranker)
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .field("no_match", &self.no_match)
            .finish()
    }
}
