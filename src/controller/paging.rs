//! Page slicing and the visible-page window state machine.
//!
//! The window is a run of at most [`LOT_SIZE`] page numbers. It only moves in
//! whole lots: forward from the previous window's last page, backward to end
//! just before the previous window's first page. After the view changes, or
//! when a page is shown directly, the window is rebuilt from page 1 and slid
//! forward until it holds the current page.

use std::rc::Rc;

use tracing::trace;

use super::model::{ListController, LOT_SIZE};
use super::types::{Entity, EntityId};

/// Which window to generate next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lot {
    First,
    Next,
    Previous,
}

impl<M: Entity> ListController<M> {
    /// Shows `page` of the current view.
    ///
    /// Page 0 is treated as page 1. The slice is `[(page-1)*size, page*size)`
    /// of the view, or the whole view when paging is disabled; its entities are
    /// materialized. An out-of-range page yields an empty slice, except that an
    /// empty page beyond the first steps back through [`previous`](Self::previous)
    /// instead of being committed.
    ///
    /// A committed page is brought into the visible-page window, which is
    /// rebuilt from the first lot and slid forward when needed. A custom page
    /// handler is then notified of the page.
    pub fn set_page(&mut self, page: usize) -> &mut Self {
        let page = page.max(1);
        let (start, end) = self.slice_bounds(page);
        self.current = self.view_ids()[start..end].to_vec();
        for position in 0..self.current.len() {
            let id = self.current[position];
            self.materialize(id);
        }

        if page > 1 && self.current.is_empty() {
            self.previous();
        } else {
            self.current_page = page;
            trace!(page, items = self.current.len(), "page committed");
            self.sync_window();
            self.notify_page(page);
        }
        self
    }

    /// Moves to the next page, sliding the window forward a lot when the current
    /// page is its last one. No-op on the last page.
    pub fn next(&mut self) {
        if self.current_page < self.total_page {
            if self.current_page == self.last_visible_page() {
                self.next_pages();
            } else {
                self.request_page(self.current_page + 1);
            }
        }
    }

    /// Moves to the previous page, sliding the window back a lot when the current
    /// page is its first one. No-op on page 1.
    pub fn previous(&mut self) {
        if self.current_page > 1 {
            if self.current_page == self.first_visible_page() {
                self.previous_pages();
            } else {
                self.request_page(self.current_page - 1);
            }
        }
    }

    /// Slides the window forward one lot and moves to its first page.
    pub fn next_pages(&mut self) {
        self.slide_forward(true);
    }

    /// Slides the window back one lot and moves to its last page.
    pub fn previous_pages(&mut self) {
        if self.first_visible_page() > 1 {
            self.generate_visible_pages(Lot::Previous);
            self.request_page(self.last_visible_page());
        }
    }

    /// Installs a new view and rebuilds page count, page slice and window.
    ///
    /// The current page is kept but clamped to the new page range.
    pub(super) fn update_list(&mut self, view: Option<Rc<[EntityId]>>) {
        self.view = view;
        self.visible_pages.clear();

        let len = self.view_ids().len();
        if len == 0 {
            self.current.clear();
            self.total_page = 0;
            return;
        }

        if self.page_size > 0 {
            self.total_page = len.div_ceil(self.page_size);
            self.current_page = self.current_page.clamp(1, self.total_page);
        } else {
            self.total_page = 1;
            self.current_page = 1;
        }

        self.generate_visible_pages(Lot::First);
        self.sync_window();
        self.set_page(self.current_page);
    }

    /// Moves the window so that it holds the current page: back to the first
    /// lot if the page lies before it, then forward lot by lot.
    fn sync_window(&mut self) {
        if self.visible_pages.is_empty() || self.visible_pages.contains(&self.current_page) {
            return;
        }
        if self.current_page < self.first_visible_page() {
            self.visible_pages.clear();
            self.generate_visible_pages(Lot::First);
        }
        while !self.visible_pages.contains(&self.current_page) {
            if !self.slide_forward(false) {
                break;
            }
        }
    }

    fn slice_bounds(&self, page: usize) -> (usize, usize) {
        let len = self.view_ids().len();
        if self.page_size == 0 {
            return (0, len);
        }
        let start = (page - 1).saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        (start, end)
    }

    fn slide_forward(&mut self, change_page: bool) -> bool {
        if self.last_visible_page() >= self.total_page {
            return false;
        }
        self.generate_visible_pages(Lot::Next);
        if change_page {
            self.request_page(self.first_visible_page());
        }
        true
    }

    fn generate_visible_pages(&mut self, lot: Lot) {
        if self.total_page < 1 {
            return;
        }

        let lot = if self.visible_pages.is_empty() {
            Lot::First
        } else {
            lot
        };

        let (min, max) = match lot {
            Lot::First => (1, LOT_SIZE.min(self.total_page)),
            Lot::Next => {
                let last = self.last_visible_page();
                (last + 1, (last + LOT_SIZE).min(self.total_page))
            }
            Lot::Previous => {
                let max = self
                    .last_visible_page()
                    .saturating_sub(self.visible_pages.len());
                (max.saturating_sub(LOT_SIZE - 1).max(1), max)
            }
        };

        self.visible_pages = (min..=max).collect();
        trace!(?lot, min, max, "visible pages generated");
    }
}
