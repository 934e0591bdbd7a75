//! News feed loading and pagination.
//!
//! Pagination is pure slicing over the in-memory list: [`total_pages`],
//! [`clamp_page`] and [`paginate`] never touch a view.

use std::sync::Arc;

use crate::api::NewsItem;

use super::view::{NewsBackend, NewsView, PagerControls};

pub const DEFAULT_PAGE_SIZE: usize = 2;

/// Number of pages needed for `count` items.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Clamp a 1-based page to `[1, total]`; an empty list stays on page 1.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Items shown on the 1-based `page`.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page = clamp_page(page, total_pages(items.len(), page_size));
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Pager control state for `page` of `total`.
pub fn controls(page: usize, total: usize) -> PagerControls {
    PagerControls {
        current: page,
        total,
        prev_enabled: page > 1,
        next_enabled: page < total,
        visible: total > 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Fetches the news list and shows one page of it at a time.
pub struct NewsPager {
    backend: Arc<dyn NewsBackend>,
    view: Arc<dyn NewsView>,
    items: Vec<NewsItem>,
    page: usize,
    page_size: usize,
    state: LoadState,
}

impl std::fmt::Debug for NewsPager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsPager")
            .field("items", &self.items.len())
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl NewsPager {
    pub fn new(backend: Arc<dyn NewsBackend>, view: Arc<dyn NewsView>, page_size: usize) -> Self {
        Self {
            backend,
            view,
            items: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.items.len(), self.page_size)
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    /// Items on the current page.
    pub fn visible(&self) -> &[NewsItem] {
        paginate(&self.items, self.page, self.page_size)
    }

    /// Fetch the whole list. On failure the view shows an error panel whose
    /// retry control calls this again.
    pub async fn load(&mut self) -> LoadState {
        self.load_at(self.page).await
    }

    /// Fetch the whole list, then show `page` (clamped).
    pub async fn load_at(&mut self, page: usize) -> LoadState {
        self.state = LoadState::Loading;
        self.view.show_loading();

        match self.backend.fetch_news().await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "News loaded");
                self.items = items;
                self.page = clamp_page(page, self.total_pages());
                self.state = LoadState::Loaded;
                self.render();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load news");
                self.state = LoadState::Failed;
                self.view.show_news_error();
            }
        }
        self.state
    }

    /// Show page `n`, clamped to the available range. Returns the page shown.
    pub fn set_page(&mut self, n: usize) -> usize {
        self.page = clamp_page(n, self.total_pages());
        self.render();
        self.page
    }

    /// Move `delta` pages from the current one. Returns whether the page
    /// changed; nothing moves unless a list is on screen.
    pub fn change_page(&mut self, delta: isize) -> bool {
        if self.state != LoadState::Loaded {
            return false;
        }
        let before = self.page;
        let target = self.page.saturating_add_signed(delta);
        if self.set_page(target) == before {
            return false;
        }
        self.view.scroll_news_into_view();
        true
    }

    /// Open the `index`-th card of the current page.
    pub fn open(&self, index: usize) -> bool {
        if self.state != LoadState::Loaded {
            return false;
        }
        match self.visible().get(index) {
            Some(item) => {
                self.view.open_link(&item.url);
                true
            }
            None => false,
        }
    }

    fn render(&self) {
        if self.state != LoadState::Loaded {
            return;
        }
        self.view.show_news(self.visible());
        self.view
            .show_pager(&controls(self.page, self.total_pages()));
    }
}
