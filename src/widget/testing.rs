//! Recording view ports and scripted backends for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::api::{ChatResponse, NewsItem};
use crate::error::ClientError;

use super::view::{
    ChatBackend, ChatView, ChromeView, InputState, Message, NewsBackend, NewsView, PagerControls,
    Toast, ToastId, WidgetPorts,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Message(Message),
    Input(InputState),
    ClearInput,
    FocusInput,
    ScrollToBottom,
    SampleQuestions(usize),
    RemoveSampleQuestions,
    NewsLoading,
    News(Vec<String>),
    Pager(PagerControls),
    NewsError,
    NewsScrolledIntoView,
    OpenLink(String),
    BackToTopVisible(bool),
    ScrollToTop,
    ToastShown(ToastId, String),
    ToastDismissed(ToastId),
    ToastRemoved(ToastId),
    ChatRequested(String),
    NewsRequested,
}

#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<ViewEvent>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn ports(self: &Arc<Self>) -> WidgetPorts {
        WidgetPorts {
            chat: self.clone(),
            news: self.clone(),
            chrome: self.clone(),
        }
    }

    pub fn record(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn messages(&self) -> Vec<Message> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::ToastShown(_, msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    /// Toasts shown and not yet removed, in creation order.
    pub fn live_toasts(&self) -> Vec<ToastId> {
        let events = self.events();
        let removed: Vec<ToastId> = events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::ToastRemoved(id) => Some(*id),
                _ => None,
            })
            .collect();
        events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::ToastShown(id, _) if !removed.contains(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn last_input_state(&self) -> Option<InputState> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Input(s) => Some(s),
            _ => None,
        })
    }

    pub fn last_pager(&self) -> Option<PagerControls> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Pager(p) => Some(p),
            _ => None,
        })
    }

    pub fn last_news(&self) -> Option<Vec<String>> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::News(titles) => Some(titles),
            _ => None,
        })
    }
}

impl ChatView for Recorder {
    fn append_message(&self, message: &Message) {
        self.record(ViewEvent::Message(message.clone()));
    }
    fn set_input_state(&self, state: InputState) {
        self.record(ViewEvent::Input(state));
    }
    fn clear_input(&self) {
        self.record(ViewEvent::ClearInput);
    }
    fn focus_input(&self) {
        self.record(ViewEvent::FocusInput);
    }
    fn scroll_to_bottom(&self) {
        self.record(ViewEvent::ScrollToBottom);
    }
    fn show_sample_questions(&self, questions: &[&str]) {
        self.record(ViewEvent::SampleQuestions(questions.len()));
    }
    fn remove_sample_questions(&self) {
        self.record(ViewEvent::RemoveSampleQuestions);
    }
}

impl NewsView for Recorder {
    fn show_loading(&self) {
        self.record(ViewEvent::NewsLoading);
    }
    fn show_news(&self, items: &[NewsItem]) {
        self.record(ViewEvent::News(
            items.iter().map(|i| i.title.clone()).collect(),
        ));
    }
    fn show_pager(&self, controls: &PagerControls) {
        self.record(ViewEvent::Pager(*controls));
    }
    fn show_news_error(&self) {
        self.record(ViewEvent::NewsError);
    }
    fn scroll_news_into_view(&self) {
        self.record(ViewEvent::NewsScrolledIntoView);
    }
    fn open_link(&self, url: &str) {
        self.record(ViewEvent::OpenLink(url.to_string()));
    }
}

impl ChromeView for Recorder {
    fn set_back_to_top_visible(&self, visible: bool) {
        self.record(ViewEvent::BackToTopVisible(visible));
    }
    fn scroll_to_top(&self) {
        self.record(ViewEvent::ScrollToTop);
    }
    fn show_toast(&self, toast: &Toast) {
        self.record(ViewEvent::ToastShown(toast.id, toast.message.clone()));
    }
    fn dismiss_toast(&self, id: ToastId) {
        self.record(ViewEvent::ToastDismissed(id));
    }
    fn remove_toast(&self, id: ToastId) {
        self.record(ViewEvent::ToastRemoved(id));
    }
}

/// Chat backend answering from a script; `Err(status)` entries fail.
pub struct ScriptedChat {
    recorder: Arc<Recorder>,
    replies: Mutex<VecDeque<Result<ChatResponse, u16>>>,
}

impl ScriptedChat {
    pub fn new(recorder: &Arc<Recorder>, replies: Vec<Result<ChatResponse, u16>>) -> Arc<Self> {
        Arc::new(Self {
            recorder: Arc::clone(recorder),
            replies: Mutex::new(replies.into()),
        })
    }

    pub fn reply(text: &str) -> Result<ChatResponse, u16> {
        Ok(ChatResponse {
            response: text.to_string(),
            timestamp: "2025-05-01 10:00:00".to_string(),
        })
    }

    pub fn calls(&self) -> usize {
        self.recorder
            .events()
            .iter()
            .filter(|e| matches!(e, ViewEvent::ChatRequested(_)))
            .count()
    }
}

#[async_trait::async_trait]
impl ChatBackend for ScriptedChat {
    async fn send_chat(&self, message: &str) -> Result<ChatResponse, ClientError> {
        self.recorder
            .record(ViewEvent::ChatRequested(message.to_string()));
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(status)) => Err(ClientError::Status {
                status,
                message: "scripted failure".to_string(),
            }),
            None => Err(ClientError::Status {
                status: 503,
                message: "script exhausted".to_string(),
            }),
        }
    }
}

/// News backend answering from a script; `None` entries fail.
pub struct ScriptedNews {
    recorder: Arc<Recorder>,
    replies: Mutex<VecDeque<Option<Vec<NewsItem>>>>,
}

impl ScriptedNews {
    pub fn new(recorder: &Arc<Recorder>, replies: Vec<Option<Vec<NewsItem>>>) -> Arc<Self> {
        Arc::new(Self {
            recorder: Arc::clone(recorder),
            replies: Mutex::new(replies.into()),
        })
    }
}

#[async_trait::async_trait]
impl NewsBackend for ScriptedNews {
    async fn fetch_news(&self) -> Result<Vec<NewsItem>, ClientError> {
        self.recorder.record(ViewEvent::NewsRequested);
        match self.replies.lock().unwrap().pop_front() {
            Some(Some(items)) => Ok(items),
            _ => Err(ClientError::Status {
                status: 500,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

/// `n` items titled `news 1` .. `news n`.
pub fn sample_news(n: usize) -> Vec<NewsItem> {
    (1..=n)
        .map(|i| {
            NewsItem::new(
                format!("news {i}"),
                format!("description {i}"),
                format!("https://example.com/{i}"),
            )
        })
        .collect()
}
