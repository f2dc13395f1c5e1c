#![warn(missing_docs)]

//! # list-controller
//!
//! An in-memory list controller for terminal list views built with
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs). It owns a full
//! collection of entities and gives the view layer three things:
//!
//! - **Pagination**: a fixed page size (0 puts everything on one page) and a
//!   current page slice that is always materialized and ready to render.
//! - **Page windows**: a run of at most [`LOT_SIZE`] page numbers for a page
//!   selector, sliding forward and backward in whole lots.
//! - **Cached search**: multi-field, accent and case insensitive filtering whose
//!   results are cached per criteria signature for the lifetime of the list.
//!
//! ## Quick Start
//!
//! ```rust
//! use list_controller::prelude::*;
//! use serde_json::json;
//!
//! let mut list: ListController<serde_json::Value> =
//!     ListController::canonical().with_page_size(2);
//! list.set_raw_list(vec![
//!     json!({ "name": "José", "city": "Lisboa" }),
//!     json!({ "name": "Maria", "city": "Porto" }),
//!     json!({ "name": "Joana", "city": "Lisboa" }),
//! ]);
//!
//! assert_eq!(list.total_page(), 2);
//! assert_eq!(list.visible_pages(), &[1, 2]);
//!
//! let mut criteria = vec![Criterion::new("city", "lisboa")];
//! list.search(&mut criteria, MatchMode::All).unwrap();
//! assert!(list.is_filtered());
//! assert_eq!(list.total(), 2);
//! ```
//!
//! ## Entities
//!
//! Anything implementing [`Searchable`] and [`Entity`] can be listed. Records
//! may be handed over in a raw form ([`Entity::Raw`]); they are turned into
//! canonical entities by the controller's factory the first time they are
//! paged into view or scanned by a search, never before.
//!
//! ## Logging
//!
//! The controller emits `tracing` events (`debug` for list assignment, search
//! and removal, `trace` for page commits and window slides). Install any
//! subscriber to see them.

pub mod controller;
pub mod error;
pub mod key;

pub use controller::{
    normalize, Criterion, CriterionValue, Entity, EntityId, Field, FilterHandler,
    ListController, MatchMode, PageHandler, PagerKeyMap, Record, Searchable, Value,
    DEFAULT_PAGE_SIZE, LOT_SIZE,
};
pub use error::{Error, Result};
pub use key::Binding;

/// Commonly used types, importable in one line.
///
/// ```rust
/// use list_controller::prelude::*;
///
/// let list: ListController<serde_json::Value> = ListController::canonical();
/// assert_eq!(list.page_size(), DEFAULT_PAGE_SIZE);
/// ```
pub mod prelude {
    pub use crate::controller::{
        Criterion, CriterionValue, Entity, EntityId, Field, FilterHandler, ListController,
        MatchMode, PageHandler, PagerKeyMap, Record, Searchable, Value, DEFAULT_PAGE_SIZE,
        LOT_SIZE,
    };
    pub use crate::error::{Error, Result};
}
