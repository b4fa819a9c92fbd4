//! Chains of stashes
//!
//! `merge([s1, s2, s3])` is `Combine(Combine(s1, s2), s3)`. Reads try the
//! tiers front to back and stop at the first hit; the hit is promoted into
//! every tier before it, because the promotion lands on the nested
//! `Combine(s1, s2)` whose `set` writes both. Writes go to every tier in order.

use crate::combine::Combine;
use crate::error::{Error, Result};
use crate::stash::BoxStash;

/// Left-fold an ordered list of stashes into one
///
/// Returns [`Error::EmptyChain`] for an empty list. A single stash is
/// returned as is.
pub fn merge<K, V, I>(stashes: I) -> Result<BoxStash<K, V>>
where
    K: ?Sized + Sync + 'static,
    V: Clone + Send + 'static,
    I: IntoIterator<Item = BoxStash<K, V>>,
{
    let mut stashes = stashes.into_iter();
    let first = stashes.next().ok_or(Error::EmptyChain)?;

    Ok(stashes.fold(first, |chain, next| {
        Box::new(Combine::new(chain, next)) as BoxStash<K, V>
    }))
}

/// Statically typed [`merge`](fn@crate::merge) for a fixed list of stashes
///
/// `merge!(a, b, c)` expands to `Combine::new(Combine::new(a, b), c)`.
#[macro_export]
macro_rules! merge {
    ($first:expr $(,)?) => {
        $first
    };
    ($first:expr, $second:expr $(, $rest:expr)* $(,)?) => {
        $crate::merge!($crate::Combine::new($first, $second) $(, $rest)*)
    };
}
