//! Page-change and filter-request strategies.
//!
//! Navigation and filter requests are routed through a strategy chosen at
//! configuration time. `Builtin` runs the controller's own behavior; `Custom`
//! runs the caller's handler instead. A custom handler that also wants the
//! default must call it itself (`set_page`, `search`) on the controller it is
//! given.

use tracing::trace;

use super::model::ListController;
use super::types::{Criterion, Entity, MatchMode};
use crate::error::Result;

/// Handler type for page changes.
pub type PageCallback<M> = Box<dyn FnMut(&mut ListController<M>, usize)>;

/// Handler type for filter requests.
pub type FilterCallback<M> =
    Box<dyn FnMut(&mut ListController<M>, &mut Vec<Criterion<M>>) -> Result<()>>;

/// What happens when a page change is requested.
pub enum PageHandler<M: Entity> {
    /// Show the page with [`ListController::set_page`].
    Builtin,
    /// Record the page as current and call the handler. The handler is also
    /// told about every page [`ListController::set_page`] commits.
    Custom(PageCallback<M>),
}

impl<M: Entity> Default for PageHandler<M> {
    fn default() -> Self {
        PageHandler::Builtin
    }
}

/// What happens when a filter is requested.
pub enum FilterHandler<M: Entity> {
    /// Run [`ListController::search`] with [`MatchMode::All`].
    Builtin,
    /// Call the handler.
    Custom(FilterCallback<M>),
}

impl<M: Entity> Default for FilterHandler<M> {
    fn default() -> Self {
        FilterHandler::Builtin
    }
}

impl<M: Entity> ListController<M> {
    /// Routes page changes to `handler` (builder pattern).
    pub fn with_page_handler(
        mut self,
        handler: impl FnMut(&mut ListController<M>, usize) + 'static,
    ) -> Self {
        self.set_page_handler(PageHandler::Custom(Box::new(handler)));
        self
    }

    /// Routes filter requests to `handler` (builder pattern).
    pub fn with_filter_handler(
        mut self,
        handler: impl FnMut(&mut ListController<M>, &mut Vec<Criterion<M>>) -> Result<()> + 'static,
    ) -> Self {
        self.set_filter_handler(FilterHandler::Custom(Box::new(handler)));
        self
    }

    /// Replaces the page-change strategy.
    pub fn set_page_handler(&mut self, handler: PageHandler<M>) {
        self.page_handler = handler;
    }

    /// Replaces the filter-request strategy.
    pub fn set_filter_handler(&mut self, handler: FilterHandler<M>) {
        self.filter_handler = handler;
    }

    /// Requests a page change. `next`, `previous` and the lot slides all go
    /// through here.
    ///
    /// While a custom handler runs, the controller falls back to the builtin
    /// strategy, so navigation called from inside the handler shows pages
    /// directly instead of re-entering it. The same holds for the
    /// notification sent by [`set_page`](Self::set_page).
    pub fn request_page(&mut self, page: usize) {
        match std::mem::take(&mut self.page_handler) {
            PageHandler::Builtin => {
                self.set_page(page);
            }
            PageHandler::Custom(mut handler) => {
                trace!(page, "page change delegated");
                self.current_page = page;
                handler(self, page);
                if matches!(self.page_handler, PageHandler::Builtin) {
                    self.page_handler = PageHandler::Custom(handler);
                }
            }
        }
    }

    /// Tells a custom page handler that `page` was shown. Called by
    /// [`set_page`](Self::set_page) after it commits a page, so list
    /// assignment, search and removal are reported too.
    pub(super) fn notify_page(&mut self, page: usize) {
        if let PageHandler::Custom(mut handler) = std::mem::take(&mut self.page_handler) {
            trace!(page, "page change notified");
            handler(self, page);
            if matches!(self.page_handler, PageHandler::Builtin) {
                self.page_handler = PageHandler::Custom(handler);
            }
        }
    }

    /// Requests a filter.
    ///
    /// # Errors
    ///
    /// Whatever the search or the custom handler reports.
    pub fn request_filter(&mut self, criteria: &mut Vec<Criterion<M>>) -> Result<()> {
        match std::mem::take(&mut self.filter_handler) {
            FilterHandler::Builtin => self.search(criteria, MatchMode::All).map(|_| ()),
            FilterHandler::Custom(mut handler) => {
                trace!(criteria = criteria.len(), "filter delegated");
                let result = handler(self, criteria);
                if matches!(self.filter_handler, FilterHandler::Builtin) {
                    self.filter_handler = FilterHandler::Custom(handler);
                }
                result
            }
        }
    }
}
