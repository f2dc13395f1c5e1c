//! The `ListController` struct, construction, list assignment and accessors.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use super::hooks::{FilterHandler, PageHandler};
use super::keys::PagerKeyMap;
use super::types::{Entity, EntityId, Record, Value};

/// Number of page numbers in one visible-page window.
pub const LOT_SIZE: usize = 5;

/// Page size used unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub(super) enum Slot<M: Entity> {
    Raw(M::Raw),
    Canonical(M),
    Vacant,
}

/// Arena cell: the entity plus everything the controller remembers about it.
pub(super) struct Cell<M: Entity> {
    pub(super) slot: Slot<M>,
    /// Normalized property values, keyed by property path.
    pub(super) normalized: HashMap<String, Value>,
    /// Signatures of the cached views that contain this entity.
    pub(super) filter_refs: Vec<String>,
}

impl<M: Entity> Cell<M> {
    fn new(record: Record<M>) -> Self {
        let slot = match record {
            Record::Raw(raw) => Slot::Raw(raw),
            Record::Canonical(entity) => Slot::Canonical(entity),
        };
        Self {
            slot,
            normalized: HashMap::new(),
            filter_refs: Vec::new(),
        }
    }

    fn vacate(&mut self) {
        self.slot = Slot::Vacant;
        self.normalized.clear();
        self.filter_refs.clear();
    }

    pub(super) fn entity(&self) -> Option<&M> {
        match &self.slot {
            Slot::Canonical(entity) => Some(entity),
            _ => None,
        }
    }

    /// Turns a raw slot into a canonical entity. Canonical slots are left alone.
    fn materialize(&mut self, factory: &dyn Fn(M::Raw) -> M) -> bool {
        if let Slot::Raw(_) = self.slot {
            if let Slot::Raw(raw) = std::mem::replace(&mut self.slot, Slot::Vacant) {
                let mut entity = factory(raw);
                entity.on_init();
                self.slot = Slot::Canonical(entity);
                return true;
            }
        }
        false
    }
}

/// A paginated, searchable view over an in-memory collection of entities.
///
/// The controller owns the full ("original") list, the filtered view produced
/// by the most recent search, the current page slice, the visible-page window
/// and a filter cache keyed by normalized criteria.
///
/// # Examples
///
/// ```
/// use list_controller::{Entity, Field, ListController, Searchable};
///
/// struct Row(String);
///
/// impl Searchable for Row {
///     fn field(&self, name: &str) -> Option<Field<'_>> {
///         (name == "label").then(|| Field::value(self.0.as_str()))
///     }
/// }
///
/// impl Entity for Row {
///     type Raw = String;
/// }
///
/// let mut list = ListController::new(Row).with_page_size(5);
/// list.set_raw_list((1..=12).map(|i| format!("row {i}")));
///
/// assert_eq!(list.total(), 12);
/// assert_eq!(list.total_page(), 3);
/// assert_eq!(list.current_list().len(), 5);
///
/// list.next();
/// list.next();
/// assert_eq!(list.current_page(), 3);
/// assert_eq!(list.current_list().len(), 2);
/// ```
pub struct ListController<M: Entity> {
    pub(super) factory: Box<dyn Fn(M::Raw) -> M>,
    pub(super) page_size: usize,

    // Storage
    pub(super) generation: u64,
    pub(super) cells: Vec<Cell<M>>,
    pub(super) original: Vec<EntityId>,

    // Derived state
    pub(super) view: Option<Rc<[EntityId]>>,
    pub(super) current: Vec<EntityId>,
    pub(super) current_page: usize,
    pub(super) total_page: usize,
    pub(super) total: usize,
    pub(super) visible_pages: Vec<usize>,
    pub(super) filter_cache: HashMap<String, Rc<[EntityId]>>,

    // Hooks
    pub(super) page_handler: PageHandler<M>,
    pub(super) filter_handler: FilterHandler<M>,
    pub(super) keymap: PagerKeyMap,

    data: HashMap<String, Box<dyn Any>>,
}

impl<M: Entity> ListController<M> {
    /// Creates an empty controller that materializes raw records with `factory`.
    ///
    /// The page size defaults to [`DEFAULT_PAGE_SIZE`].
    pub fn new(factory: impl Fn(M::Raw) -> M + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            page_size: DEFAULT_PAGE_SIZE,
            generation: 0,
            cells: Vec::new(),
            original: Vec::new(),
            view: None,
            current: Vec::new(),
            current_page: 1,
            total_page: 0,
            total: 0,
            visible_pages: Vec::new(),
            filter_cache: HashMap::new(),
            page_handler: PageHandler::default(),
            filter_handler: FilterHandler::default(),
            keymap: PagerKeyMap::default(),
            data: HashMap::new(),
        }
    }

    /// Sets the page size (builder pattern). `0` puts every entity on a single page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the key bindings used by [`update`](Self::update) (builder pattern).
    pub fn with_keymap(mut self, keymap: PagerKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Replaces the full list.
    ///
    /// Clears the filter cache, drops any active filter, resets to page 1 and
    /// rebuilds the page slice and the visible-page window. Raw records are not
    /// materialized here; only the first page is.
    pub fn set_list<I>(&mut self, records: I) -> &mut Self
    where
        I: IntoIterator<Item = Record<M>>,
    {
        self.generation = self.generation.wrapping_add(1);
        self.cells.clear();
        self.original.clear();
        for (index, record) in records.into_iter().enumerate() {
            self.cells.push(Cell::new(record));
            self.original.push(EntityId::new(self.generation, index));
        }

        self.filter_cache.clear();
        self.current_page = 1;
        self.total = self.original.len();
        debug!(
            generation = self.generation,
            total = self.total,
            "list assigned"
        );

        self.update_list(None);
        self
    }

    /// Replaces the full list with raw records.
    pub fn set_raw_list<I>(&mut self, raws: I) -> &mut Self
    where
        I: IntoIterator<Item = M::Raw>,
    {
        self.set_list(raws.into_iter().map(Record::Raw))
    }

    /// Replaces the full list with canonical entities.
    pub fn set_entities<I>(&mut self, entities: I) -> &mut Self
    where
        I: IntoIterator<Item = M>,
    {
        self.set_list(entities.into_iter().map(Record::Canonical))
    }

    /// Empties the list and the filter cache.
    pub fn clean(&mut self) -> &mut Self {
        self.set_list(std::iter::empty());
        self.filter_cache.clear();
        self.total = 0;
        debug!("list cleaned");
        self
    }

    /// Entities of the current page, in view order.
    pub fn current_list(&self) -> Vec<&M> {
        self.current.iter().filter_map(|&id| self.get(id)).collect()
    }

    /// Ids of the current page, in view order.
    pub fn current_ids(&self) -> &[EntityId] {
        &self.current
    }

    /// Ids of the filtered view, or of the original list when no filter is active.
    pub fn view_ids(&self) -> &[EntityId] {
        match &self.view {
            Some(view) => view,
            None => &self.original,
        }
    }

    /// Ids of the full list, in assignment order.
    pub fn original_ids(&self) -> &[EntityId] {
        &self.original
    }

    /// The active filtered view, shared with the filter cache.
    ///
    /// `None` when the view is the original list.
    pub fn filtered_view(&self) -> Option<&Rc<[EntityId]>> {
        self.view.as_ref()
    }

    /// True when the view is the output of a search rather than the full list.
    pub fn is_filtered(&self) -> bool {
        self.view.is_some()
    }

    /// The current page, starting at 1.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages in the current view. 0 when the view is empty.
    pub fn total_page(&self) -> usize {
        self.total_page
    }

    /// Number of entities in the current view.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Configured page size. 0 means paging is disabled.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Page numbers to offer in a page selector.
    pub fn visible_pages(&self) -> &[usize] {
        &self.visible_pages
    }

    /// First page of the window, or 0 when there is none.
    pub fn first_visible_page(&self) -> usize {
        self.visible_pages.first().copied().unwrap_or(0)
    }

    /// Last page of the window, or 0 when there is none.
    pub fn last_visible_page(&self) -> usize {
        self.visible_pages.last().copied().unwrap_or(0)
    }

    /// Number of entities on the current page.
    pub fn items_on_page(&self) -> usize {
        self.current.len()
    }

    /// True on page 1.
    pub fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }

    /// True on the last page, or when there are no pages.
    pub fn on_last_page(&self) -> bool {
        self.current_page >= self.total_page
    }

    /// Looks up a materialized entity.
    ///
    /// Entities on the current page and entities scanned by a search are always
    /// materialized; others may not be yet, in which case this returns `None`.
    /// Use [`get_mut`](Self::get_mut) to force materialization.
    pub fn get(&self, id: EntityId) -> Option<&M> {
        self.cell(id)?.entity()
    }

    /// Materializes an entity if needed and returns it for mutation.
    ///
    /// The entity's memo of normalized values is cleared, so searches that are
    /// not served from the cache see the updated properties.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut M> {
        self.materialize(id);
        let cell = self.cell_mut(id)?;
        cell.normalized.clear();
        match &mut cell.slot {
            Slot::Canonical(entity) => Some(entity),
            _ => None,
        }
    }

    /// Stores a named auxiliary value, replacing any previous one.
    pub fn set_data<T: Any>(&mut self, name: impl Into<String>, value: T) {
        self.data.insert(name.into(), Box::new(value));
    }

    /// Returns a named auxiliary value if it exists and has type `T`.
    pub fn data<T: Any>(&self, name: &str) -> Option<&T> {
        self.data.get(name)?.downcast_ref()
    }

    /// Mutable access to a named auxiliary value of type `T`.
    pub fn data_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.data.get_mut(name)?.downcast_mut()
    }

    /// Removes a named auxiliary value. Returns whether one was stored.
    pub fn remove_data(&mut self, name: &str) -> bool {
        self.data.remove(name).is_some()
    }

    pub(super) fn cell(&self, id: EntityId) -> Option<&Cell<M>> {
        if id.generation != self.generation {
            return None;
        }
        self.cells
            .get(id.index)
            .filter(|cell| !matches!(cell.slot, Slot::Vacant))
    }

    pub(super) fn cell_mut(&mut self, id: EntityId) -> Option<&mut Cell<M>> {
        if id.generation != self.generation {
            return None;
        }
        self.cells
            .get_mut(id.index)
            .filter(|cell| !matches!(cell.slot, Slot::Vacant))
    }

    /// Frees an arena cell after its entity was removed from the list.
    pub(super) fn vacate(&mut self, id: EntityId) {
        if let Some(cell) = self.cell_mut(id) {
            cell.vacate();
        }
    }

    pub(super) fn materialize(&mut self, id: EntityId) {
        if id.generation != self.generation {
            return;
        }
        let factory = &self.factory;
        if let Some(cell) = self.cells.get_mut(id.index) {
            if cell.materialize(&**factory) {
                trace!(%id, "entity materialized");
            }
        }
    }
}

impl<M: Entity<Raw = M>> ListController<M> {
    /// A controller for entities whose raw form is the entity itself.
    ///
    /// Records handed over as raw still get their [`Entity::on_init`] hook run
    /// on first access.
    pub fn canonical() -> Self {
        Self::new(|raw| raw)
    }
}

impl<M: Entity<Raw = M>> Default for ListController<M> {
    fn default() -> Self {
        Self::canonical()
    }
}
