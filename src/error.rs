//! Error type for list controller operations.

use thiserror::Error;

/// Errors reported by the list controller.
///
/// Most controller paths cannot fail: empty lists, empty criteria and cache
/// misses are handled silently, and removing an unknown entity reports `false`.
/// What remains are configuration mistakes made by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A predicate criterion was given without a cache name. Predicates have no
    /// value to derive a cache key from, so they must be named.
    #[error("criterion on '{property}' is a predicate and needs a cache name to identify its results")]
    MissingCacheName {
        /// Property path of the offending criterion.
        property: String,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
