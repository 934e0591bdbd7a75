//! Terminal view ports used by the `ask` and `news` subcommands.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::api::NewsItem;

use super::markup::source_name;
use super::view::{
    Author, ChatView, ChromeView, InputState, Message, NewsView, PagerControls, Toast, ToastId,
    WidgetPorts,
};

/// Writes widget output as plain text lines.
pub struct ConsoleView {
    out: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleView").finish_non_exhaustive()
    }
}

impl ConsoleView {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn ports(self: &Arc<Self>) -> WidgetPorts {
        WidgetPorts {
            chat: Arc::clone(self) as Arc<dyn ChatView>,
            news: Arc::clone(self) as Arc<dyn NewsView>,
            chrome: Arc::clone(self) as Arc<dyn ChromeView>,
        }
    }

    fn line(&self, text: &str) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            tracing::debug!(error = %e, "Console write failed");
        }
    }
}

impl ChatView for ConsoleView {
    fn append_message(&self, message: &Message) {
        let who = match message.author {
            Author::User => "You",
            Author::System => "Assistant",
        };
        self.line(&format!("[{}] {who}:", message.timestamp));
        self.line(&message.content);
        self.line("");
    }

    fn set_input_state(&self, state: InputState) {
        if state == InputState::Busy {
            tracing::debug!("Waiting for the assistant");
        }
    }

    fn clear_input(&self) {}

    fn focus_input(&self) {}

    fn scroll_to_bottom(&self) {}

    fn show_sample_questions(&self, questions: &[&str]) {
        self.line("You could ask:");
        for q in questions {
            self.line(&format!("  - {q}"));
        }
    }

    fn remove_sample_questions(&self) {}
}

impl NewsView for ConsoleView {
    fn show_loading(&self) {}

    fn show_news(&self, items: &[NewsItem]) {
        for item in items {
            self.line(&format!("* {} ({})", item.title, source_name(&item.url)));
            self.line(&format!("  {}", item.description));
            self.line(&format!("  {}", item.url));
        }
    }

    fn show_pager(&self, controls: &PagerControls) {
        if controls.visible {
            self.line(&format!("Page {}/{}", controls.current, controls.total));
        }
    }

    fn show_news_error(&self) {
        self.line("News is unavailable right now, please try again later.");
    }

    fn scroll_news_into_view(&self) {}

    fn open_link(&self, url: &str) {
        self.line(&format!("Open: {url}"));
    }
}

impl ChromeView for ConsoleView {
    fn set_back_to_top_visible(&self, _visible: bool) {}

    fn scroll_to_top(&self) {}

    fn show_toast(&self, toast: &Toast) {
        self.line(&format!("! {}", toast.message));
    }

    fn dismiss_toast(&self, _id: ToastId) {}

    fn remove_toast(&self, _id: ToastId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_console_output() {
        let buf = Shared::default();
        let view = ConsoleView::new(Box::new(buf.clone()));

        view.append_message(&Message::system("hello", "2025-01-01 08:00:00"));
        view.show_news(&[NewsItem::new("Title", "Desc", "https://news.cctv.com/a")]);
        view.show_pager(&PagerControls {
            current: 2,
            total: 3,
            prev_enabled: true,
            next_enabled: true,
            visible: true,
        });

        let text = buf.text();
        assert!(text.contains("[2025-01-01 08:00:00] Assistant:\nhello\n"));
        assert!(text.contains("* Title (CCTV)"));
        assert!(text.contains("Page 2/3"));
    }
}
