//! Chat and news-feed widget controller.
//!
//! [`ChatWidget`] is built once per page with its view ports
//! ([`WidgetPorts`]) and its two backends. The host forwards user input as
//! [`UiEvent`] values to [`ChatWidget::dispatch`]; every event turns into at
//! most one network call followed by view updates.
//!
//! # Structure
//!
//! - [`conversation`]: chat turns, draft, sample questions
//! - [`pager`]: news loading and pagination
//! - [`chrome`]: back-to-top button and toasts
//! - [`view`]: view port and backend traits
//! - [`markup`]: HTML fragments and a view port that produces them
//! - [`console`]: view ports that print to a terminal
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chat_news_widget::client::HttpBackend;
//! use chat_news_widget::widget::{ChatWidget, UiEvent, WidgetSettings, markup::MarkupView};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let view = Arc::new(MarkupView::new());
//! let backend = Arc::new(HttpBackend::new("http://127.0.0.1:8000")?);
//! let mut widget = ChatWidget::new(
//!     view.ports(),
//!     backend.clone(),
//!     backend,
//!     WidgetSettings::default(),
//! );
//! widget.start().await;
//! widget.dispatch(UiEvent::Send("Hello".into())).await;
//! # Ok(())
//! # }
//! ```

pub mod chrome;
pub mod console;
pub mod conversation;
pub mod markup;
pub mod pager;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use crate::config::WidgetConfig;

pub use chrome::{BackToTop, Toaster};
pub use conversation::{
    Conversation, Key, KeyPress, RequestState, SAMPLE_QUESTIONS, SendOutcome,
};
pub use pager::{LoadState, NewsPager};
pub use view::{
    Author, ChatBackend, ChatView, ChromeView, InputState, Message, NewsBackend, NewsView,
    PagerControls, Toast, ToastId, ToastKind, WidgetPorts,
};

pub const OFFLINE_TOAST: &str = "Network connection lost. Please check your network settings.";

/// Tunables of one widget instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetSettings {
    pub page_size: usize,
    pub toast_display: Duration,
    pub toast_exit: Duration,
    pub back_to_top_threshold: f64,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            page_size: pager::DEFAULT_PAGE_SIZE,
            toast_display: chrome::DEFAULT_TOAST_DISPLAY,
            toast_exit: chrome::DEFAULT_TOAST_EXIT,
            back_to_top_threshold: chrome::DEFAULT_BACK_TO_TOP_THRESHOLD,
        }
    }
}

impl From<&WidgetConfig> for WidgetSettings {
    fn from(cfg: &WidgetConfig) -> Self {
        Self {
            page_size: cfg.page_size,
            toast_display: Duration::from_millis(cfg.toast_ms),
            toast_exit: Duration::from_millis(cfg.toast_exit_ms),
            back_to_top_threshold: cfg.back_to_top_threshold,
        }
    }
}

/// User input a host forwards to the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Send button; carries the input's current text.
    Send(String),
    InputChanged(String),
    Key(KeyPress),
    /// A sample question button, by index.
    AskSample(usize),
    PrevPage,
    NextPage,
    /// A news card on the current page, by index.
    OpenNews(usize),
    RetryNews,
    /// Page scrolled; vertical offset in pixels.
    Scrolled(f64),
    BackToTop,
    Online,
    Offline,
}

/// What a dispatched event led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Sent(SendOutcome),
    News(LoadState),
    PageChanged(bool),
    Handled,
    Ignored,
}

/// The widget controller.
pub struct ChatWidget {
    ports: WidgetPorts,
    conversation: Conversation,
    news: NewsPager,
    back_to_top: BackToTop,
    toaster: Arc<Toaster>,
}

impl std::fmt::Debug for ChatWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatWidget")
            .field("conversation", &self.conversation)
            .field("news", &self.news)
            .field("back_to_top", &self.back_to_top)
            .finish_non_exhaustive()
    }
}

impl ChatWidget {
    pub fn new(
        ports: WidgetPorts,
        chat: Arc<dyn ChatBackend>,
        news: Arc<dyn NewsBackend>,
        settings: WidgetSettings,
    ) -> Self {
        let toaster = Arc::new(Toaster::new(
            Arc::clone(&ports.chrome),
            settings.toast_display,
            settings.toast_exit,
        ));
        Self {
            conversation: Conversation::new(chat, Arc::clone(&ports.chat), Arc::clone(&toaster)),
            news: NewsPager::new(news, Arc::clone(&ports.news), settings.page_size),
            back_to_top: BackToTop::new(settings.back_to_top_threshold),
            toaster,
            ports,
        }
    }

    /// Show the sample questions and load the news feed.
    pub async fn start(&mut self) -> LoadState {
        self.conversation.show_sample_questions();
        self.news.load().await
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn news(&self) -> &NewsPager {
        &self.news
    }

    pub fn back_to_top(&self) -> &BackToTop {
        &self.back_to_top
    }

    /// Borrow the conversation and the pager separately so a chat turn and a
    /// news load can run at the same time.
    pub fn parts_mut(&mut self) -> (&mut Conversation, &mut NewsPager) {
        (&mut self.conversation, &mut self.news)
    }

    pub async fn dispatch(&mut self, event: UiEvent) -> Dispatched {
        match event {
            UiEvent::Send(text) => Dispatched::Sent(self.conversation.send(&text).await),
            UiEvent::InputChanged(text) => {
                self.conversation.set_draft(text);
                Dispatched::Handled
            }
            UiEvent::Key(press) => match self.conversation.on_key(press).await {
                Some(outcome) => Dispatched::Sent(outcome),
                None => Dispatched::Handled,
            },
            UiEvent::AskSample(index) => match SAMPLE_QUESTIONS.get(index) {
                Some(question) => Dispatched::Sent(self.conversation.ask(question).await),
                None => Dispatched::Ignored,
            },
            UiEvent::PrevPage => Dispatched::PageChanged(self.news.change_page(-1)),
            UiEvent::NextPage => Dispatched::PageChanged(self.news.change_page(1)),
            UiEvent::OpenNews(index) => {
                if self.news.open(index) {
                    Dispatched::Handled
                } else {
                    Dispatched::Ignored
                }
            }
            UiEvent::RetryNews => Dispatched::News(self.news.load().await),
            UiEvent::Scrolled(offset) => {
                self.back_to_top.on_scroll(offset, &*self.ports.chrome);
                Dispatched::Handled
            }
            UiEvent::BackToTop => {
                self.ports.chrome.scroll_to_top();
                Dispatched::Handled
            }
            UiEvent::Online => {
                tracing::info!(name: "widget.network.online", "Network connection restored");
                Dispatched::Handled
            }
            UiEvent::Offline => {
                tracing::warn!(name: "widget.network.offline", "Network connection lost");
                self.toaster.error(OFFLINE_TOAST);
                Dispatched::Handled
            }
        }
    }
}
