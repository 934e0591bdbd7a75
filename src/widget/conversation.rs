//! Conversation controller: one chat turn per send, no retries.

use std::sync::Arc;

use crate::api::local_timestamp;

use super::chrome::Toaster;
use super::view::{ChatBackend, ChatView, InputState, Message};

/// Starter questions shown before the first message.
pub const SAMPLE_QUESTIONS: [&str; 4] = [
    "What is Chinese-style modernization?",
    "How does the digital economy drive high-quality development?",
    "What does a people-centred approach to development mean?",
    "What is the new development paradigm?",
];

pub const APOLOGY_MESSAGE: &str =
    "Sorry, the service is temporarily unavailable. Please try again later.";
pub const SEND_FAILED_TOAST: &str =
    "Failed to send. Please check your network connection and try again.";

/// Lifecycle of the current (or last) chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Result of one `send` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty or whitespace-only input; nothing happened.
    Rejected,
    Replied,
    Failed,
}

/// Keys the input area reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
        }
    }
}

/// Owns the message list and the draft, and runs chat turns.
pub struct Conversation {
    backend: Arc<dyn ChatBackend>,
    view: Arc<dyn ChatView>,
    toaster: Arc<Toaster>,
    messages: Vec<Message>,
    draft: String,
    state: RequestState,
    samples_shown: bool,
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("messages", &self.messages.len())
            .field("draft", &self.draft)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Conversation {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        view: Arc<dyn ChatView>,
        toaster: Arc<Toaster>,
    ) -> Self {
        Self {
            backend,
            view,
            toaster,
            messages: Vec::new(),
            draft: String::new(),
            state: RequestState::Idle,
            samples_shown: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Show the starter questions. Does nothing once a message exists.
    pub fn show_sample_questions(&mut self) {
        if self.samples_shown || !self.messages.is_empty() {
            return;
        }
        self.samples_shown = true;
        self.view.show_sample_questions(&SAMPLE_QUESTIONS);
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
        self.view.clear_input();
    }

    /// Send whatever is in the draft.
    pub async fn submit(&mut self) -> SendOutcome {
        let text = self.draft.clone();
        self.send(&text).await
    }

    /// Put `question` in the draft and send it.
    pub async fn ask(&mut self, question: &str) -> SendOutcome {
        self.set_draft(question);
        self.submit().await
    }

    /// Enter (without Shift) and Ctrl+Enter submit; Escape clears the draft.
    pub async fn on_key(&mut self, press: KeyPress) -> Option<SendOutcome> {
        match press.key {
            Key::Enter if press.ctrl || !press.shift => Some(self.submit().await),
            Key::Escape => {
                self.clear_draft();
                None
            }
            _ => None,
        }
    }

    /// Run one chat turn.
    ///
    /// Whitespace-only text is rejected without a request. Otherwise the
    /// user message is appended, the input is disabled for the single
    /// request, and a reply or an apology is appended. The input is enabled
    /// again on every path.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Rejected;
        }

        self.state = RequestState::Pending;
        self.view.set_input_state(InputState::Busy);
        self.push(Message::user(text, local_timestamp()));
        self.clear_draft();

        let outcome = match self.backend.send_chat(text).await {
            Ok(reply) => {
                tracing::debug!(chars = reply.response.len(), "Chat reply received");
                self.push(Message::system(reply.response, reply.timestamp));
                SendOutcome::Replied
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to send chat message");
                self.push(Message::system(APOLOGY_MESSAGE, local_timestamp()));
                self.toaster.error(SEND_FAILED_TOAST);
                SendOutcome::Failed
            }
        };

        self.state = match outcome {
            SendOutcome::Replied => RequestState::Succeeded,
            _ => RequestState::Failed,
        };
        self.view.set_input_state(InputState::Ready);
        self.view.focus_input();
        outcome
    }

    fn push(&mut self, message: Message) {
        self.view.append_message(&message);
        self.messages.push(message);
        self.view.scroll_to_bottom();
        if self.samples_shown {
            self.samples_shown = false;
            self.view.remove_sample_questions();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::chrome::{DEFAULT_TOAST_DISPLAY, DEFAULT_TOAST_EXIT};
    use crate::widget::testing::{Recorder, ScriptedChat, ViewEvent};
    use crate::widget::view::{Author, ChromeView};

    fn conversation(recorder: &Arc<Recorder>, chat: &Arc<ScriptedChat>) -> Conversation {
        let chrome: Arc<dyn ChromeView> = recorder.clone();
        let toaster = Arc::new(Toaster::new(
            chrome,
            DEFAULT_TOAST_DISPLAY,
            DEFAULT_TOAST_EXIT,
        ));
        Conversation::new(chat.clone(), recorder.clone(), toaster)
    }

    #[tokio::test]
    async fn test_whitespace_is_rejected() {
        let recorder = Recorder::new();
        let chat = ScriptedChat::new(&recorder, vec![ScriptedChat::reply("unused")]);
        let mut conv = conversation(&recorder, &chat);

        assert_eq!(conv.send("   \n\t ").await, SendOutcome::Rejected);
        assert_eq!(conv.send("").await, SendOutcome::Rejected);

        assert_eq!(chat.calls(), 0);
        assert!(conv.messages().is_empty());
        assert!(recorder.events().is_empty());
        assert_eq!(conv.state(), RequestState::Idle);
    }

    #[tokio::test]
    async fn test_successful_turn() {
        let recorder = Recorder::new();
        let chat = ScriptedChat::new(&recorder, vec![ScriptedChat::reply("**Answer**")]);
        let mut conv = conversation(&recorder, &chat);

        assert_eq!(conv.send("  question  ").await, SendOutcome::Replied);

        let messages = conv.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].author, Author::User);
        assert_eq!(messages[0].content, "question");
        assert_eq!(messages[1].author, Author::System);
        assert_eq!(messages[1].content, "**Answer**");
        assert_eq!(messages[1].timestamp, "2025-05-01 10:00:00");
        assert_eq!(recorder.messages(), messages);
        assert_eq!(conv.state(), RequestState::Succeeded);
        assert!(recorder.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_input_disabled_only_while_pending() {
        let recorder = Recorder::new();
        let chat = ScriptedChat::new(&recorder, vec![ScriptedChat::reply("ok")]);
        let mut conv = conversation(&recorder, &chat);

        conv.send("hi").await;

        let events = recorder.events();
        let busy = events
            .iter()
            .position(|e| *e == ViewEvent::Input(InputState::Busy))
            .unwrap();
        let request = events
            .iter()
            .position(|e| *e == ViewEvent::ChatRequested("hi".to_string()))
            .unwrap();
        let ready = events
            .iter()
            .position(|e| *e == ViewEvent::Input(InputState::Ready))
            .unwrap();
        assert!(busy < request && request < ready);
        assert_eq!(events.last(), Some(&ViewEvent::FocusInput));
    }

    #[tokio::test]
    async fn test_failed_turn_apologises_and_reenables() {
        let recorder = Recorder::new();
        let chat = ScriptedChat::new(&recorder, vec![Err(502)]);
        let mut conv = conversation(&recorder, &chat);

        assert_eq!(conv.send("hello").await, SendOutcome::Failed);

        let messages = conv.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].author, Author::User);
        assert_eq!(messages[1].author, Author::System);
        assert_eq!(messages[1].content, APOLOGY_MESSAGE);
        assert_eq!(recorder.last_input_state(), Some(InputState::Ready));
        assert_eq!(recorder.toasts(), vec![SEND_FAILED_TOAST.to_string()]);
        assert_eq!(conv.state(), RequestState::Failed);
        assert_eq!(chat.calls(), 1);
    }

    #[tokio::test]
    async fn test_keys() {
        let recorder = Recorder::new();
        let chat = ScriptedChat::new(
            &recorder,
            vec![ScriptedChat::reply("one"), ScriptedChat::reply("two")],
        );
        let mut conv = conversation(&recorder, &chat);

        conv.set_draft("line");
        let shift_enter = KeyPress {
            key: Key::Enter,
            shift: true,
            ctrl: false,
        };
        assert_eq!(conv.on_key(shift_enter).await, None);
        assert_eq!(chat.calls(), 0);

        assert_eq!(
            conv.on_key(KeyPress::plain(Key::Enter)).await,
            Some(SendOutcome::Replied)
        );
        assert_eq!(conv.draft(), "");

        conv.set_draft("again");
        let ctrl_enter = KeyPress {
            key: Key::Enter,
            shift: false,
            ctrl: true,
        };
        assert_eq!(conv.on_key(ctrl_enter).await, Some(SendOutcome::Replied));

        conv.set_draft("discard me");
        assert_eq!(conv.on_key(KeyPress::plain(Key::Escape)).await, None);
        assert_eq!(conv.draft(), "");
        assert_eq!(chat.calls(), 2);
    }

    #[tokio::test]
    async fn test_sample_questions_removed_after_first_message() {
        let recorder = Recorder::new();
        let chat = ScriptedChat::new(&recorder, vec![ScriptedChat::reply("a")]);
        let mut conv = conversation(&recorder, &chat);

        conv.show_sample_questions();
        conv.show_sample_questions();
        assert_eq!(conv.ask(SAMPLE_QUESTIONS[0]).await, SendOutcome::Replied);

        let events = recorder.events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, ViewEvent::SampleQuestions(4)))
                .count(),
            1
        );
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == ViewEvent::RemoveSampleQuestions)
                .count(),
            1
        );
        assert_eq!(conv.messages()[0].content, SAMPLE_QUESTIONS[0]);
    }
}
