//! List controller with pagination, lot-based page windows and cached search.
//!
//! This module exposes a generic `ListController<M: Entity>` plus its supporting
//! types:
//! - `Searchable` / `Entity`: implement for your record type
//! - `Criterion` / `MatchMode`: search conditions
//! - `PageHandler` / `FilterHandler`: navigation and filter strategies
//! - `PagerKeyMap`: key bindings for keyboard page navigation
//!
//! ## Architecture Overview
//!
//! ### Storage
//! Entities live in an index-addressed arena. Each cell holds the entity (raw
//! until first access, canonical afterwards), a memo of normalized property
//! values, and the filter cache signatures the entity belongs to. The original
//! list, the filtered views and the current page are lists of [`EntityId`]s
//! into that arena, so nothing is ever copied.
//!
//! ### Filtered views
//! A filtered view is an `Rc<[EntityId]>` shared with the filter cache. Running
//! the same search twice hands back the same `Rc`. Views are only dropped when
//! the list is replaced; `remove` prunes the entity out of every view that
//! contains it.
//!
//! ### Page window
//! The visible pages are never recomputed from the current page. They slide
//! from the previous window's edge in whole lots of [`LOT_SIZE`], which keeps a
//! page selector stable while guaranteeing the active page is always in it.

mod filtering;
mod hooks;
mod json;
mod keys;
mod model;
mod paging;
mod types;

#[cfg(test)]
mod tests;

pub use filtering::normalize;
pub use hooks::{FilterCallback, FilterHandler, PageCallback, PageHandler};
pub use keys::PagerKeyMap;
pub use model::{ListController, DEFAULT_PAGE_SIZE, LOT_SIZE};
pub use types::{
    Criterion, CriterionValue, Entity, EntityId, Field, MatchMode, Record, Searchable, Value,
};
