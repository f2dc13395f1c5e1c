//! Core types and traits for the list controller.
//!
//! This module contains the vocabulary shared by the controller's submodules:
//! - `Searchable` and `Entity` for the records being listed
//! - `Value` and `Field` for property lookups
//! - `Record` and `EntityId` for list assignment and identity
//! - `Criterion`, `CriterionValue` and `MatchMode` for search

use std::fmt;
use std::rc::Rc;

/// A scalar property value, as seen by the search engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent or null value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl Value {
    /// Returns false for `Null`, `false`, zero, `NaN` and the empty string.
    ///
    /// Properties whose value is not truthy are skipped by the search engine:
    /// they neither match nor block a match.
    ///
    /// ```rust
    /// use list_controller::Value;
    ///
    /// assert!(Value::from("a").is_truthy());
    /// assert!(!Value::from("").is_truthy());
    /// assert!(!Value::Int(0).is_truthy());
    /// assert!(!Value::Float(f64::NAN).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric reading of the value, used for loose equality.
    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse().ok()
                }
            }
        }
    }

    /// Equality across representations: `Int(5)`, `Float(5.0)` and `Text("5")`
    /// are all equal, `Bool(true)` equals `Int(1)`, and `Null` only equals `Null`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Returns the value with text case-folded and stripped of accents.
    pub fn normalized(&self) -> Value {
        match self {
            Value::Text(s) => Value::Text(super::normalize(s)),
            other => other.clone(),
        }
    }

    /// True if this (normalized) field value matches a (normalized) search
    /// value: text fields match on substring, everything else on loose equality.
    pub(crate) fn matches(&self, needle: &Value) -> bool {
        if let Value::Text(haystack) = self {
            let found = match needle {
                Value::Text(n) => haystack.contains(n.as_str()),
                other => haystack.contains(other.to_string().as_str()),
            };
            if found {
                return true;
            }
        }
        self.loose_eq(needle)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{}", *x as i64)
            }
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// The result of looking up one property on a [`Searchable`].
pub enum Field<'a> {
    /// A scalar value.
    Value(Value),
    /// A nested record that further path segments can descend into.
    Nested(&'a dyn Searchable),
}

impl<'a> Field<'a> {
    /// Shorthand for `Field::Value(value.into())`.
    pub fn value(value: impl Into<Value>) -> Self {
        Field::Value(value.into())
    }

    /// Nested records are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Field::Value(v) => v.is_truthy(),
            Field::Nested(_) => true,
        }
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Field::Nested(_) => f.write_str("Nested(..)"),
        }
    }
}

/// Property lookup by name, the only thing the search engine needs from a record.
///
/// # Examples
///
/// ```
/// use list_controller::{Field, Searchable};
///
/// struct Address {
///     city: String,
/// }
///
/// struct Customer {
///     name: String,
///     address: Address,
/// }
///
/// impl Searchable for Address {
///     fn field(&self, name: &str) -> Option<Field<'_>> {
///         match name {
///             "city" => Some(Field::value(self.city.as_str())),
///             _ => None,
///         }
///     }
/// }
///
/// impl Searchable for Customer {
///     fn field(&self, name: &str) -> Option<Field<'_>> {
///         match name {
///             "name" => Some(Field::value(self.name.as_str())),
///             "address" => Some(Field::Nested(&self.address)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Searchable {
    /// Returns the named property, or `None` when the record has no such property.
    fn field(&self, name: &str) -> Option<Field<'_>>;
}

/// A record type managed by a [`ListController`](super::ListController).
///
/// `Raw` is the form records arrive in (for instance freshly deserialized rows).
/// The controller's factory turns a raw record into the canonical entity the
/// first time it is needed, then calls [`on_init`](Entity::on_init) once.
pub trait Entity: Searchable + 'static {
    /// The not-yet-materialized form of the entity.
    type Raw;

    /// Initialization hook, run once right after materialization.
    fn on_init(&mut self) {}
}

/// One element handed to the list setter.
pub enum Record<M: Entity> {
    /// Raw data, materialized lazily.
    Raw(M::Raw),
    /// An entity already in canonical form, used as is.
    Canonical(M),
}

/// Identity of an entity within the controller's current list.
///
/// Ids carry the list generation, so an id taken from a list that has since
/// been replaced never refers to an entity of the new list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    pub(crate) generation: u64,
    pub(crate) index: usize,
}

impl EntityId {
    pub(crate) fn new(generation: u64, index: usize) -> Self {
        Self { generation, index }
    }

    /// Position of the entity in the list it was assigned with.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.generation, self.index)
    }
}

/// Whether a search keeps entities matching every criterion or any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Keep entities matching every criterion.
    #[default]
    All,
    /// Keep entities matching at least one criterion.
    Any,
}

impl MatchMode {
    pub(crate) fn accepts(self, hits: usize, criteria: usize) -> bool {
        match self {
            MatchMode::All => hits == criteria,
            MatchMode::Any => hits > 0,
        }
    }

    pub(crate) fn tag(self) -> &'static str {
        match self {
            MatchMode::All => "all",
            MatchMode::Any => "any",
        }
    }
}

/// What a criterion compares a property against.
pub enum CriterionValue<M> {
    /// Match on substring (text properties) or equality.
    Scalar(Value),
    /// Match if any element matches.
    List(Vec<Value>),
    /// Match if the predicate accepts the entity. Needs a cache name.
    Predicate(Rc<dyn Fn(&M) -> bool>),
}

impl<M> Clone for CriterionValue<M> {
    fn clone(&self) -> Self {
        match self {
            CriterionValue::Scalar(v) => CriterionValue::Scalar(v.clone()),
            CriterionValue::List(vs) => CriterionValue::List(vs.clone()),
            CriterionValue::Predicate(p) => CriterionValue::Predicate(Rc::clone(p)),
        }
    }
}

impl<M> fmt::Debug for CriterionValue<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionValue::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            CriterionValue::List(vs) => f.debug_tuple("List").field(vs).finish(),
            CriterionValue::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// One search condition: a dotted property path and what to look for there.
///
/// # Examples
///
/// ```
/// use list_controller::{Criterion, CriterionValue};
/// # struct Order { total: i64 }
///
/// let by_city: Criterion<Order> = Criterion::new("customer.address.city", "Porto");
/// let by_status: Criterion<Order> = Criterion::any_of("status", ["open", "pending"]);
/// let large: Criterion<Order> = Criterion::predicate("total", "large-orders", |o: &Order| o.total > 1000);
///
/// assert!(matches!(by_status.value, CriterionValue::List(_)));
/// assert_eq!(large.cache_name.as_deref(), Some("large-orders"));
/// ```
pub struct Criterion<M> {
    /// Dot separated property path, e.g. `"address.city"`.
    pub property: String,
    /// Value to compare against.
    pub value: CriterionValue<M>,
    /// Cache key for predicate criteria.
    pub cache_name: Option<String>,
}

impl<M> Criterion<M> {
    /// A scalar criterion.
    pub fn new(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            property: property.into(),
            value: CriterionValue::Scalar(value.into()),
            cache_name: None,
        }
    }

    /// A criterion matching any of the given values.
    pub fn any_of<V: Into<Value>>(
        property: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            property: property.into(),
            value: CriterionValue::List(values.into_iter().map(Into::into).collect()),
            cache_name: None,
        }
    }

    /// A predicate criterion identified in the filter cache by `cache_name`.
    ///
    /// The predicate only runs for entities whose `property` is truthy.
    pub fn predicate(
        property: impl Into<String>,
        cache_name: impl Into<String>,
        predicate: impl Fn(&M) -> bool + 'static,
    ) -> Self {
        Self {
            property: property.into(),
            value: CriterionValue::Predicate(Rc::new(predicate)),
            cache_name: Some(cache_name.into()),
        }
    }

    /// Sets the cache name.
    pub fn with_cache_name(mut self, cache_name: impl Into<String>) -> Self {
        self.cache_name = Some(cache_name.into());
        self
    }

    /// Criteria that cannot constrain anything and are dropped before a search.
    pub(crate) fn is_vacuous(&self) -> bool {
        match &self.value {
            CriterionValue::Scalar(Value::Null) => true,
            CriterionValue::Scalar(Value::Text(s)) => s.is_empty(),
            CriterionValue::Scalar(_) => false,
            CriterionValue::List(values) => values.is_empty(),
            CriterionValue::Predicate(_) => self
                .cache_name
                .as_deref()
                .is_some_and(|name| name.trim().is_empty()),
        }
    }

    pub(crate) fn is_unnamed_predicate(&self) -> bool {
        matches!(self.value, CriterionValue::Predicate(_)) && self.cache_name.is_none()
    }

    /// Normalizes text values in place.
    pub(crate) fn normalize_value(&mut self) {
        match &mut self.value {
            CriterionValue::Scalar(v) => *v = v.normalized(),
            CriterionValue::List(values) => {
                for v in values.iter_mut() {
                    *v = v.normalized();
                }
            }
            CriterionValue::Predicate(_) => {}
        }
    }

    /// The part of the cache signature contributed by this criterion.
    ///
    /// The property and the value are written in their `Debug` form, which
    /// quotes and escapes text, and the value kind is tagged (`s` scalar,
    /// `l` list, `p` predicate). Distinct criteria therefore never share a key,
    /// and no text can forge a separator.
    pub(crate) fn cache_key(&self) -> String {
        match &self.value {
            CriterionValue::Scalar(value) => format!("{:?}:s={value:?}", self.property),
            CriterionValue::List(values) => format!("{:?}:l={values:?}", self.property),
            CriterionValue::Predicate(_) => format!(
                "{:?}:p={:?}",
                self.property,
                self.cache_name.as_deref().unwrap_or_default()
            ),
        }
    }
}

impl<M> Clone for Criterion<M> {
    fn clone(&self) -> Self {
        Self {
            property: self.property.clone(),
            value: self.value.clone(),
            cache_name: self.cache_name.clone(),
        }
    }
}

impl<M> fmt::Debug for Criterion<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion")
            .field("property", &self.property)
            .field("value", &self.value)
            .field("cache_name", &self.cache_name)
            .finish()
    }
}
