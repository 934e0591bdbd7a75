//! Shared fixtures for the service tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chat_news_widget::AppState;
use chat_news_widget::config::AppConfig;
use chat_news_widget::error::LlmError;
use chat_news_widget::llm::LlmDriver;
use chat_news_widget::news::NewsCatalog;

/// How the fake model answers.
#[derive(Debug, Clone)]
pub enum Reply {
    Echo,
    Timeout,
    Status(u16),
}

#[derive(Debug)]
pub struct FakeLlm {
    pub reply: Reply,
}

#[async_trait]
impl LlmDriver for FakeLlm {
    async fn complete(&self, message: &str) -> Result<String, LlmError> {
        match &self.reply {
            Reply::Echo => Ok(format!("You asked: {message}")),
            Reply::Timeout => Err(LlmError::Timeout),
            Reply::Status(status) => Err(LlmError::Status {
                status: *status,
                body: "upstream unavailable".to_string(),
            }),
        }
    }
}

pub fn state(reply: Reply) -> AppState {
    let config = AppConfig::load_from_args(["chat-news-widget"]).expect("default config");
    AppState {
        config: Arc::new(config),
        llm: Arc::new(FakeLlm { reply }),
        news: Arc::new(NewsCatalog::builtin()),
    }
}
