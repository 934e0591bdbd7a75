//! Back-to-top button and self-dismissing toasts.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::view::{ChromeView, Toast, ToastId, ToastKind};

pub const DEFAULT_BACK_TO_TOP_THRESHOLD: f64 = 300.0;
pub const DEFAULT_TOAST_DISPLAY: Duration = Duration::from_millis(3000);
pub const DEFAULT_TOAST_EXIT: Duration = Duration::from_millis(300);

/// Shows the back-to-top button once the page is scrolled past a threshold.
#[derive(Debug)]
pub struct BackToTop {
    threshold: f64,
    visible: bool,
}

impl BackToTop {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Feed the current vertical scroll offset. Returns the new visibility
    /// when it changed.
    pub fn on_scroll(&mut self, offset: f64, view: &dyn ChromeView) -> Option<bool> {
        let visible = offset > self.threshold;
        if visible == self.visible {
            return None;
        }
        self.visible = visible;
        view.set_back_to_top_visible(visible);
        Some(visible)
    }
}

impl Default for BackToTop {
    fn default() -> Self {
        Self::new(DEFAULT_BACK_TO_TOP_THRESHOLD)
    }
}

/// Creates toasts and schedules their removal.
///
/// Each toast stays for `display`, then gets `dismiss_toast` (exit animation)
/// and `remove_toast` after a further `exit`. Must be used inside a tokio
/// runtime.
pub struct Toaster {
    view: Arc<dyn ChromeView>,
    next_id: AtomicU64,
    display: Duration,
    exit: Duration,
}

impl std::fmt::Debug for Toaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toaster")
            .field("display", &self.display)
            .field("exit", &self.exit)
            .finish_non_exhaustive()
    }
}

impl Toaster {
    pub fn new(view: Arc<dyn ChromeView>, display: Duration, exit: Duration) -> Self {
        Self {
            view,
            next_id: AtomicU64::new(1),
            display,
            exit,
        }
    }

    /// Total time a toast is on the page.
    pub fn lifetime(&self) -> Duration {
        self.display + self.exit
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Error, message)
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            kind,
            message: message.into(),
        };
        self.view.show_toast(&toast);

        let view = Arc::clone(&self.view);
        let (display, exit) = (self.display, self.exit);
        tokio::spawn(async move {
            tokio::time::sleep(display).await;
            view.dismiss_toast(id);
            tokio::time::sleep(exit).await;
            view.remove_toast(id);
        });

        id
    }
}
