//! HTML fragments for a browser host.
//!
//! The render functions produce the markup the page's stylesheet expects
//! (`.message`, `.news-item`, `.error-toast`, ...). [`MarkupView`] is a view
//! port that keeps the current fragment for every region of the page plus a
//! queue of imperative [`HostCommand`]s (focus, scroll, open) the host
//! applies after each dispatch.

use std::fmt::Write as _;
use std::sync::{Arc, LazyLock, Mutex};

use regex::Regex;

use crate::api::NewsItem;

use super::view::{
    Author, ChatView, ChromeView, InputState, Message, NewsView, PagerControls, Toast, ToastId,
    ToastKind, WidgetPorts,
};

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(https?://[^\s<]+)").unwrap());

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Light formatting of message text: `**bold**`, bare links, line breaks.
/// The input is escaped first, so model output cannot inject markup.
pub fn format_message(content: &str) -> String {
    let escaped = escape_html(content);
    let bolded = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    let linked = LINK.replace_all(
        &bolded,
        r#"<a href="$1" target="_blank" rel="noopener noreferrer">$1</a>"#,
    );
    linked.replace('\n', "<br>")
}

/// Human label for the site a news link points to.
pub fn source_name(url: &str) -> &'static str {
    if url.contains("bilibili.com") {
        "Bilibili video"
    } else if url.contains("cctv.com") {
        "CCTV"
    } else {
        "Official media"
    }
}

/// Icon shown next to a news source.
pub fn news_icon(url: &str) -> &'static str {
    if url.contains("bilibili.com") || url.contains("cctv.com") {
        "📺"
    } else {
        "📰"
    }
}

pub fn render_message(message: &Message) -> String {
    let (kind, avatar) = match message.author {
        Author::User => ("user", "👤"),
        Author::System => ("system", "🤖"),
    };
    format!(
        r#"<div class="message {kind}-message"><div class="message-content"><div class="message-avatar {kind}-avatar">{avatar}</div><div class="message-bubble {kind}-bubble">{body}<div class="message-time">{time}</div></div></div></div>"#,
        body = format_message(&message.content),
        time = escape_html(&message.timestamp),
    )
}

pub fn render_sample_questions(questions: &[&str]) -> String {
    let mut out = String::from(
        r#"<div class="sample-questions"><div class="questions-title">💡 You could ask:</div><div class="questions-grid">"#,
    );
    for (i, q) in questions.iter().enumerate() {
        let _ = write!(
            out,
            r#"<button class="question-btn" data-sample="{i}">{}</button>"#,
            escape_html(q)
        );
    }
    out.push_str("</div></div>");
    out
}

/// Cards for one page; `data-index` is what `UiEvent::OpenNews` carries.
pub fn render_news(items: &[NewsItem]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let delay = i as f64 * 0.2;
        let _ = write!(
            out,
            r#"<div class="news-item" data-index="{i}" style="animation-delay: {delay:.1}s"><div class="news-content"><h3 class="news-title">{title}</h3><p class="news-description">{description}</p><div class="news-meta"><span class="news-source">{icon} {source}</span></div></div></div>"#,
            title = escape_html(&item.title),
            description = escape_html(&item.description),
            icon = news_icon(&item.url),
            source = source_name(&item.url),
        );
    }
    out
}

pub fn render_news_loading() -> String {
    r#"<div class="news-loading">Loading news…</div>"#.to_string()
}

pub fn render_news_error() -> String {
    r#"<div class="news-error"><div class="error-icon">❌</div><p>News is unavailable right now, please try again later</p><button class="retry-btn" data-action="retry-news">Reload</button></div>"#.to_string()
}

/// Pager markup; empty when there is a single page.
pub fn render_pager(controls: &PagerControls) -> String {
    if !controls.visible {
        return String::new();
    }
    let disabled = |enabled: bool| if enabled { "" } else { " disabled" };
    format!(
        r#"<div class="news-pagination"><button id="prevBtn" data-action="prev-page"{prev}>‹</button><span><span id="currentPage">{current}</span> / <span id="totalPages">{total}</span></span><button id="nextBtn" data-action="next-page"{next}>›</button></div>"#,
        prev = disabled(controls.prev_enabled),
        next = disabled(controls.next_enabled),
        current = controls.current,
        total = controls.total,
    )
}

pub fn render_toast(toast: &Toast, leaving: bool) -> String {
    let kind = match toast.kind {
        ToastKind::Error => "error-toast",
    };
    let animation = if leaving {
        "toastSlideOut"
    } else {
        "toastSlideIn"
    };
    format!(
        r#"<div class="{kind}" data-toast="{id}" style="animation: {animation} 0.3s ease-out">{message}</div>"#,
        id = toast.id,
        message = escape_html(&toast.message),
    )
}

/// Imperative effects a host performs after a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    ClearInput,
    FocusInput,
    ScrollChatToBottom,
    ScrollNewsIntoView,
    ScrollToTop,
    OpenLink(String),
}

#[derive(Debug)]
struct MarkupState {
    messages: Vec<String>,
    sample_questions: Option<String>,
    input: InputState,
    news: String,
    pager: String,
    toasts: Vec<(Toast, bool)>,
    back_to_top_visible: bool,
    commands: Vec<HostCommand>,
}

/// View port that renders every region to HTML.
#[derive(Debug)]
pub struct MarkupView {
    state: Mutex<MarkupState>,
}

impl Default for MarkupView {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupView {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MarkupState {
                messages: Vec::new(),
                sample_questions: None,
                input: InputState::Ready,
                news: String::new(),
                pager: String::new(),
                toasts: Vec::new(),
                back_to_top_visible: false,
                commands: Vec::new(),
            }),
        }
    }

    pub fn ports(self: &Arc<Self>) -> WidgetPorts {
        WidgetPorts {
            chat: Arc::clone(self) as Arc<dyn ChatView>,
            news: Arc::clone(self) as Arc<dyn NewsView>,
            chrome: Arc::clone(self) as Arc<dyn ChromeView>,
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut MarkupState) -> R) -> R {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }

    /// Contents of the chat region: sample questions (if shown) then messages.
    pub fn chat_html(&self) -> String {
        self.with(|s| {
            let mut out = s.sample_questions.clone().unwrap_or_default();
            for m in &s.messages {
                out.push_str(m);
            }
            out
        })
    }

    pub fn message_count(&self) -> usize {
        self.with(|s| s.messages.len())
    }

    pub fn input_state(&self) -> InputState {
        self.with(|s| s.input)
    }

    pub fn news_html(&self) -> String {
        self.with(|s| s.news.clone())
    }

    pub fn pager_html(&self) -> String {
        self.with(|s| s.pager.clone())
    }

    pub fn toasts_html(&self) -> String {
        self.with(|s| {
            s.toasts
                .iter()
                .map(|(toast, leaving)| render_toast(toast, *leaving))
                .collect()
        })
    }

    pub fn toast_count(&self) -> usize {
        self.with(|s| s.toasts.len())
    }

    pub fn back_to_top_visible(&self) -> bool {
        self.with(|s| s.back_to_top_visible)
    }

    /// Drain the queued host commands.
    pub fn take_commands(&self) -> Vec<HostCommand> {
        self.with(|s| std::mem::take(&mut s.commands))
    }
}

impl ChatView for MarkupView {
    fn append_message(&self, message: &Message) {
        let html = render_message(message);
        self.with(|s| s.messages.push(html));
    }

    fn set_input_state(&self, state: InputState) {
        self.with(|s| s.input = state);
    }

    fn clear_input(&self) {
        self.with(|s| s.commands.push(HostCommand::ClearInput));
    }

    fn focus_input(&self) {
        self.with(|s| s.commands.push(HostCommand::FocusInput));
    }

    fn scroll_to_bottom(&self) {
        self.with(|s| s.commands.push(HostCommand::ScrollChatToBottom));
    }

    fn show_sample_questions(&self, questions: &[&str]) {
        let html = render_sample_questions(questions);
        self.with(|s| s.sample_questions = Some(html));
    }

    fn remove_sample_questions(&self) {
        self.with(|s| s.sample_questions = None);
    }
}

impl NewsView for MarkupView {
    fn show_loading(&self) {
        self.with(|s| s.news = render_news_loading());
    }

    fn show_news(&self, items: &[NewsItem]) {
        let html = render_news(items);
        self.with(|s| s.news = html);
    }

    fn show_pager(&self, controls: &PagerControls) {
        let html = render_pager(controls);
        self.with(|s| s.pager = html);
    }

    fn show_news_error(&self) {
        self.with(|s| {
            s.news = render_news_error();
            s.pager.clear();
        });
    }

    fn scroll_news_into_view(&self) {
        self.with(|s| s.commands.push(HostCommand::ScrollNewsIntoView));
    }

    fn open_link(&self, url: &str) {
        self.with(|s| s.commands.push(HostCommand::OpenLink(url.to_string())));
    }
}

impl ChromeView for MarkupView {
    fn set_back_to_top_visible(&self, visible: bool) {
        self.with(|s| s.back_to_top_visible = visible);
    }

    fn scroll_to_top(&self) {
        self.with(|s| s.commands.push(HostCommand::ScrollToTop));
    }

    fn show_toast(&self, toast: &Toast) {
        self.with(|s| s.toasts.push((toast.clone(), false)));
    }

    fn dismiss_toast(&self, id: ToastId) {
        self.with(|s| {
            if let Some(entry) = s.toasts.iter_mut().find(|(t, _)| t.id == id) {
                entry.1 = true;
            }
        });
    }

    fn remove_toast(&self, id: ToastId) {
        self.with(|s| s.toasts.retain(|(t, _)| t.id != id));
    }
}
