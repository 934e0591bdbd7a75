//! OpenAI Chat Completions driver.
//!
//! Sends a single non-streaming request per user message and returns the
//! first choice's content.

use serde::{Deserialize, Serialize};

use super::{LlmDriver, LlmSettings};
use crate::error::LlmError;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [PromptMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct PromptMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Driver for an OpenAI-compatible `chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatCompletionsDriver {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsDriver")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsDriver {
    /// Create a driver; the configured timeout applies to every call.
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(LlmError::Transport)?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl LlmDriver for ChatCompletionsDriver {
    async fn complete(&self, message: &str) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: &self.settings.model,
            messages: [
                PromptMessage {
                    role: "system",
                    content: &self.settings.system_prompt,
                },
                PromptMessage {
                    role: "user",
                    content: message,
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            top_p: self.settings.top_p,
        };

        let mut rb = self.http.post(&self.settings.api_url).json(&body);
        if let Some(k) = &self.settings.api_key {
            rb = rb.bearer_auth(k);
        }

        let resp = rb.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(
                name: "llm.upstream.rejected",
                status = status.as_u16(),
                "Upstream model returned an error status"
            );
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::from(e)
                } else {
                    LlmError::MalformedResponse(e.to_string())
                }
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .ok_or_else(|| LlmError::MalformedResponse("no choices in response".to_string()))
    }
}
