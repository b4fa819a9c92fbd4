//! Error types for stashline

use std::error::Error as StdError;

/// Boxed error produced by a backing store
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type alias for stash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for stash operations
///
/// A miss is never an error: it is `Ok(None)` from `get`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A backing store failed (connectivity, timeout, full, ...)
    #[error("{store} backend error: {source}")]
    Backend {
        /// Label of the store that failed, e.g. `"redis"`
        store: &'static str,
        /// Underlying failure
        #[source]
        source: BoxError,
    },

    /// `merge` was called without any stash
    #[error("cannot merge an empty chain of stashes")]
    EmptyChain,
}

impl Error {
    /// Wrap a backing-store failure under the given store label
    pub fn backend<E>(store: &'static str, err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Backend {
            store,
            source: err.into(),
        }
    }

    /// Label of the store that produced this error, if any
    pub fn store(&self) -> Option<&'static str> {
        match self {
            Error::Backend { store, .. } => Some(*store),
            Error::EmptyChain => None,
        }
    }
}
