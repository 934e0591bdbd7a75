//! View ports and the values that flow through them.
//!
//! The controller never touches a page directly. A host (browser bindings,
//! the terminal, a test) implements these traits and hands them to
//! [`ChatWidget::new`](super::ChatWidget::new).

use std::sync::Arc;

use crate::api::{ChatResponse, NewsItem};
use crate::error::ClientError;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    System,
}

/// One rendered chat message. Append-only once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub content: String,
    pub author: Author,
    pub timestamp: String,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: Author::User,
            timestamp: timestamp.into(),
        }
    }

    pub fn system(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: Author::System,
            timestamp: timestamp.into(),
        }
    }
}

/// What the input area should look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// Editable, normal placeholder.
    Ready,
    /// Disabled while a reply is pending.
    Busy,
}

/// Prev/next pager state for the news panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerControls {
    pub current: usize,
    pub total: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    /// Hidden when everything fits on one page.
    pub visible: bool,
}

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
}

/// Conversation area.
pub trait ChatView: Send + Sync {
    fn append_message(&self, message: &Message);
    fn set_input_state(&self, state: InputState);
    fn clear_input(&self);
    fn focus_input(&self);
    fn scroll_to_bottom(&self);
    fn show_sample_questions(&self, questions: &[&str]);
    fn remove_sample_questions(&self);
}

/// News panel.
pub trait NewsView: Send + Sync {
    fn show_loading(&self);
    /// Replace the visible cards.
    fn show_news(&self, items: &[NewsItem]);
    fn show_pager(&self, controls: &PagerControls);
    /// Error panel with a retry affordance bound to `UiEvent::RetryNews`.
    fn show_news_error(&self);
    fn scroll_news_into_view(&self);
    fn open_link(&self, url: &str);
}

/// Page chrome: back-to-top button and toasts.
pub trait ChromeView: Send + Sync {
    fn set_back_to_top_visible(&self, visible: bool);
    fn scroll_to_top(&self);
    fn show_toast(&self, toast: &Toast);
    /// Start the exit animation.
    fn dismiss_toast(&self, id: ToastId);
    fn remove_toast(&self, id: ToastId);
}

/// The three view ports of one widget.
#[derive(Clone)]
pub struct WidgetPorts {
    pub chat: Arc<dyn ChatView>,
    pub news: Arc<dyn NewsView>,
    pub chrome: Arc<dyn ChromeView>,
}

impl std::fmt::Debug for WidgetPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetPorts").finish_non_exhaustive()
    }
}

/// Chat endpoint as seen by the widget.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_chat(&self, message: &str) -> Result<ChatResponse, ClientError>;
}

/// News endpoint as seen by the widget.
#[async_trait::async_trait]
pub trait NewsBackend: Send + Sync {
    async fn fetch_news(&self) -> Result<Vec<NewsItem>, ClientError>;
}
