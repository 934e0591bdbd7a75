//! Upstream model access for `POST /api/chat`.
//!
//! The [`LlmDriver`] trait is the seam between the service and whatever
//! answers the question. [`ChatCompletionsDriver`] talks to any
//! OpenAI-compatible `chat/completions` endpoint; tests substitute their own
//! driver.

pub mod chat_completions;

pub use chat_completions::ChatCompletionsDriver;

use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::LlmError;

/// LLM connection and sampling settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// Full URL of the chat completions endpoint.
    pub api_url: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    /// Total time allowed for one upstream call.
    pub timeout: Duration,
    /// Prompt sent ahead of every user message.
    pub system_prompt: String,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("top_p", &self.top_p)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl From<&LlmConfig> for LlmSettings {
    fn from(cfg: &LlmConfig) -> Self {
        Self {
            api_url: cfg.api_url.clone(),
            api_key: cfg.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            top_p: cfg.top_p,
            timeout: Duration::from_secs_f64(cfg.timeout_secs),
            system_prompt: cfg.system_prompt.clone(),
        }
    }
}

/// Answers one user message.
#[async_trait::async_trait]
pub trait LlmDriver: Send + Sync {
    /// Produce the assistant reply for `message`.
    async fn complete(&self, message: &str) -> Result<String, LlmError>;
}
