//! Chat + news-feed widget and the service behind it.
//!
//! A conversation panel that posts user messages to `POST /api/chat`, a news
//! panel that pages through `GET /api/news`, and the small axum service that
//! answers both.
//!
//! # Architecture
//!
//! - **Widget**: host-agnostic controller driven by `UiEvent`s, rendering
//!   through view-port traits
//! - **Client**: `reqwest` implementation of the widget's two backends
//! - **Server**: Axum router proxying chat to an OpenAI-compatible model and
//!   serving a news catalog
//!
//! # Modules
//!
//! - [`widget`]: the controller, its view ports and host implementations
//! - [`client`]: HTTP backends for the widget
//! - [`server`]: router and handlers
//! - [`llm`]: upstream model driver
//! - [`news`]: news catalog
//! - [`api`]: wire types
//! - [`config`]: layered configuration
//! - [`error`]: error types

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]
#![allow(clippy::cast_possible_truncation)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod llm;
pub mod news;
pub mod server;
pub mod widget;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::LlmDriver;
use crate::news::NewsCatalog;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Global Configuration
    pub config: Arc<AppConfig>,
    /// Answers chat messages.
    pub llm: Arc<dyn LlmDriver>,
    /// News served by `/api/news`.
    pub news: Arc<NewsCatalog>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("news", &self.news.len())
            .finish_non_exhaustive()
    }
}
