//! Search, the filter cache and removal.
//!
//! A search is reduced to a signature built from its normalized criteria. The
//! first search with a given signature scans the original list once and caches
//! the resulting view; every later search with the same signature gets that
//! exact view back. Cached views live until the list is replaced.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use super::model::{Cell, ListController, Slot};
use super::types::{Criterion, CriterionValue, Entity, EntityId, Field, MatchMode, Searchable, Value};
use crate::error::{Error, Result};

/// Separator between criteria in a cache signature.
const SIGNATURE_SEPARATOR: &str = "#|#";

/// Case-folds `s` and strips combining diacritical marks (U+0300..=U+036F).
///
/// ```rust
/// use list_controller::normalize;
///
/// assert_eq!(normalize("José"), "jose");
/// assert_eq!(normalize("ÇÃO"), "cao");
/// ```
pub fn normalize(s: &str) -> String {
    s.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_lowercase()
}

/// Resolves a dotted property path. A missing segment, or a segment that tries
/// to descend into a scalar, resolves to `None`.
fn resolve<'a>(root: &'a dyn Searchable, path: &str) -> Option<Field<'a>> {
    let mut segments = path.split('.');
    let mut field = root.field(segments.next()?)?;
    for segment in segments {
        field = match field {
            Field::Nested(inner) => inner.field(segment)?,
            Field::Value(_) => return None,
        };
    }
    Some(field)
}

fn signature<M>(criteria: &[Criterion<M>], mode: MatchMode) -> String {
    if criteria.is_empty() {
        return String::new();
    }
    let mut signature = String::new();
    for criterion in criteria {
        signature.push_str(&criterion.cache_key());
        signature.push_str(SIGNATURE_SEPARATOR);
    }
    signature.push_str(mode.tag());
    signature
}

/// Does `entity` satisfy `criterion`? Falsy or missing properties never do.
fn satisfies<M: Entity>(
    entity: &M,
    memo: &mut HashMap<String, Value>,
    criterion: &Criterion<M>,
) -> bool {
    let field = match resolve(entity, &criterion.property) {
        Some(field) if field.is_truthy() => field,
        _ => return false,
    };

    let needles = match &criterion.value {
        CriterionValue::Predicate(predicate) => return predicate(entity),
        CriterionValue::Scalar(value) => std::slice::from_ref(value),
        CriterionValue::List(values) => values.as_slice(),
    };

    let Field::Value(raw) = field else {
        return false;
    };
    let value = memo
        .entry(criterion.property.clone())
        .or_insert_with(|| raw.normalized());
    needles.iter().any(|needle| value.matches(needle))
}

impl<M: Entity> Cell<M> {
    fn count_matches(&mut self, criteria: &[Criterion<M>]) -> usize {
        let Cell {
            slot, normalized, ..
        } = self;
        let Slot::Canonical(entity) = slot else {
            return 0;
        };
        let entity: &M = entity;
        criteria
            .iter()
            .filter(|criterion| satisfies(entity, normalized, criterion))
            .count()
    }
}

impl<M: Entity> ListController<M> {
    /// Filters the original list by `criteria`.
    ///
    /// `criteria` is edited in place: vacuous criteria (null or empty values,
    /// empty lists, predicates with a blank cache name) are removed and text
    /// values are normalized. What remains is reduced to a cache signature; a
    /// cached view for that signature is reused as is, otherwise the original
    /// list is scanned once and the result cached.
    ///
    /// With [`MatchMode::All`] an entity must satisfy every criterion, with
    /// [`MatchMode::Any`] at least one. No criteria left means no filter.
    /// The view is shown from page 1 with a fresh window.
    ///
    /// # Errors
    ///
    /// [`Error::MissingCacheName`] if a predicate criterion has no cache name.
    /// Nothing is changed in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use list_controller::{Criterion, ListController, MatchMode};
    /// use serde_json::json;
    ///
    /// let mut list: ListController<serde_json::Value> = ListController::canonical();
    /// list.set_raw_list(vec![json!({ "name": "Ana" }), json!({ "name": "Bruno" })]);
    ///
    /// let mut criteria = vec![Criterion::new("name", "AN"), Criterion::new("city", "")];
    /// list.search(&mut criteria, MatchMode::All).unwrap();
    ///
    /// assert_eq!(criteria.len(), 1);
    /// assert_eq!(list.total(), 1);
    /// ```
    pub fn search(
        &mut self,
        criteria: &mut Vec<Criterion<M>>,
        mode: MatchMode,
    ) -> Result<&mut Self> {
        criteria.retain(|criterion| !criterion.is_vacuous());
        if let Some(criterion) = criteria.iter().find(|c| c.is_unnamed_predicate()) {
            return Err(Error::MissingCacheName {
                property: criterion.property.clone(),
            });
        }
        for criterion in criteria.iter_mut() {
            criterion.normalize_value();
        }

        let signature = signature(criteria.as_slice(), mode);
        let view = if signature.is_empty() {
            None
        } else if let Some(cached) = self.filter_cache.get(&signature) {
            debug!(%signature, total = cached.len(), "filter cache hit");
            Some(Rc::clone(cached))
        } else {
            let view = self.scan(criteria.as_slice(), mode, &signature);
            debug!(%signature, total = view.len(), "filter cache miss");
            self.filter_cache.insert(signature, Rc::clone(&view));
            Some(view)
        };

        self.total = view.as_ref().map_or(self.original.len(), |view| view.len());
        self.visible_pages.clear();
        self.current_page = 1;
        self.update_list(view);
        Ok(self)
    }

    /// Removes an entity from the list.
    ///
    /// Returns `false`, changing nothing, if the entity is not in the list.
    /// Otherwise the entity is pruned from every cached view containing it,
    /// and the unfiltered list is shown again at the current (clamped) page.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let Some(position) = self.original.iter().position(|&candidate| candidate == id) else {
            return false;
        };

        let refs = self
            .cell_mut(id)
            .map(|cell| std::mem::take(&mut cell.filter_refs))
            .unwrap_or_default();
        for signature in &refs {
            if let Some(view) = self.filter_cache.get_mut(signature) {
                *view = view.iter().copied().filter(|&other| other != id).collect();
            }
        }

        self.original.remove(position);
        self.vacate(id);
        self.total = self.original.len();
        debug!(%id, pruned = refs.len(), total = self.total, "entity removed");

        self.update_list(None);
        true
    }

    /// Scans the original list once, in order, materializing every entity.
    fn scan(
        &mut self,
        criteria: &[Criterion<M>],
        mode: MatchMode,
        signature: &str,
    ) -> Rc<[EntityId]> {
        let mut matched = Vec::new();
        for position in 0..self.original.len() {
            let id = self.original[position];
            self.materialize(id);
            let Some(cell) = self.cell_mut(id) else {
                continue;
            };
            let hits = cell.count_matches(criteria);
            if mode.accepts(hits, criteria.len()) {
                cell.filter_refs.push(signature.to_string());
                matched.push(id);
            }
        }
        matched.into()
    }
}
