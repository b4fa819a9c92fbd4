//! # stashcache
//!
//! In-process backing store for stashline chains.
//!
//! ## Architecture
//! - **HashMap**: AHash for fast lookups (O(1))
//! - **LRU List**: index-linked list for eviction (O(1))
//! - **Expiry**: optional per-entry ttl, dropped lazily on read
//! - **Integration**: implements `Getter` and `Setter`, so an
//!   `Arc<LocalStore<V>>` plugs into any `KeyGenStash`

#![warn(missing_docs)]

mod config;
mod lru;
mod stats;
mod store;

pub use config::{LocalConfig, DEFAULT_CAPACITY};
pub use lru::LruCache;
pub use stats::CacheStats;
pub use store::LocalStore;
