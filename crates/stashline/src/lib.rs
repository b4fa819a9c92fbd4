//! # stashline
//!
//! Composable stashes: uniform get/set capabilities over heterogeneous
//! backing stores, chained into one read-through, write-through cache.
//!
//! ## Architecture
//! - **Stash**: async get/set over logical keys, `None` on a miss
//! - **KeyGenStash**: a backing store's getter and setter behind a key transform
//!   (identity, `name:key`, fingerprint, or `name:fingerprint`)
//! - **Combine**: read `primary`, fall back to `secondary`, promote hits forward
//! - **merge**: left fold of `Combine` over an ordered list of tiers
//!
//! ## Semantics
//! - Reads try tiers front to back and stop at the first hit
//! - A hit in tier `k` is written into tiers `1..k` before `get` returns
//! - Writes go to every tier in order and stop at the first failure
//! - Concurrent misses on one key are not deduplicated

#![warn(missing_docs)]

mod combine;
mod error;
mod key;
mod keygen;
mod merge;
mod stash;

#[cfg(test)]
mod testing;

pub use combine::{combine, Combine};
pub use error::{BoxError, Error, Result};
pub use key::{
    compose, fingerprint, hash, identity, namespace, prefix, Compose, Fingerprint, FnTransform,
    Hashed, Identity, KeyMaterial, KeyTransform, Namespace, ObjectHash, Prefix,
    NAMESPACE_SEPARATOR,
};
pub use keygen::{
    hashed_stash, keyed_stash, named_stash, named_stash_with, read_only, stash, KeyGenStash,
};
pub use merge::merge;
pub use stash::{
    getter_fn, setter_fn, BoxStash, FnGetter, FnSetter, Getter, NoSetter, Setter, Stash,
};

// Re-export async_trait so adapters can implement the traits without a direct dependency
pub use async_trait::async_trait;
