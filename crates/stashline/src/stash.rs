//! The stash contract and its getter/setter halves
//!
//! A backing store is exposed as a [`Getter`] and a [`Setter`] working on
//! physical string keys. A [`Stash`] is the logical view callers use: it takes
//! logical keys and is built from a getter, a setter and a key transform (see
//! [`KeyGenStash`](crate::KeyGenStash)), or by combining other stashes.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Read half of a backing store
///
/// Absence is `Ok(None)`. Implementations translate their own "not found"
/// signal (a nil reply, an expired entry, a missing file) into `None` and
/// decide whether connectivity failures become a miss or an error.
#[async_trait]
pub trait Getter<V: Send + 'static>: Send + Sync {
    /// Look up a physical key
    async fn get(&self, key: &str) -> Result<Option<V>>;
}

/// Write half of a backing store
#[async_trait]
pub trait Setter<V: Send + 'static>: Send + Sync {
    /// Store `value` under a physical key
    async fn set(&self, key: &str, value: V) -> Result<()>;
}

/// A get/set capability over logical keys
///
/// `get` resolves to `Ok(None)` for a miss and never fails because a key is
/// absent. `set` may fail when the backing store does.
#[async_trait]
pub trait Stash<K: ?Sized + Sync + 'static = str, V: Send + 'static = Vec<u8>>: Send + Sync {
    /// Look up `key`, `None` when absent
    async fn get(&self, key: &K) -> Result<Option<V>>;

    /// Store `value` under `key`
    async fn set(&self, key: &K, value: V) -> Result<()>;
}

/// Owned, type-erased stash
pub type BoxStash<K = str, V = Vec<u8>> = Box<dyn Stash<K, V>>;

/// Setter that accepts every write and stores nothing
///
/// Used for read-only tiers such as an origin loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSetter;

#[async_trait]
impl<V: Send + 'static> Setter<V> for NoSetter {
    async fn set(&self, _key: &str, _value: V) -> Result<()> {
        Ok(())
    }
}

/// Getter backed by an async closure, see [`getter_fn`]
#[derive(Clone)]
pub struct FnGetter<F>(F);

/// Turn an async closure into a [`Getter`]
///
/// ```ignore
/// let origin = getter_fn(|key: String| async move { Ok(load_from_db(&key).await) });
/// ```
pub fn getter_fn<F, Fut, V>(f: F) -> FnGetter<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<V>>> + Send + 'static,
    V: Send + 'static,
{
    FnGetter(f)
}

#[async_trait]
impl<F, Fut, V> Getter<V> for FnGetter<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<V>>> + Send + 'static,
    V: Send + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<V>> {
        (self.0)(key.to_owned()).await
    }
}

/// Setter backed by an async closure, see [`setter_fn`]
#[derive(Clone)]
pub struct FnSetter<F>(F);

/// Turn an async closure into a [`Setter`]
pub fn setter_fn<F, Fut, V>(f: F) -> FnSetter<F>
where
    F: Fn(String, V) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
    V: Send + 'static,
{
    FnSetter(f)
}

#[async_trait]
impl<F, Fut, V> Setter<V> for FnSetter<F>
where
    F: Fn(String, V) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
    V: Send + 'static,
{
    async fn set(&self, key: &str, value: V) -> Result<()> {
        (self.0)(key.to_owned(), value).await
    }
}

#[async_trait]
impl<V, T> Getter<V> for Arc<T>
where
    V: Send + 'static,
    T: Getter<V> + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<V>> {
        (**self).get(key).await
    }
}

#[async_trait]
impl<V, T> Setter<V> for Arc<T>
where
    V: Send + 'static,
    T: Setter<V> + ?Sized,
{
    async fn set(&self, key: &str, value: V) -> Result<()> {
        (**self).set(key, value).await
    }
}

#[async_trait]
impl<K, V, T> Stash<K, V> for Arc<T>
where
    K: ?Sized + Sync + 'static,
    V: Send + 'static,
    T: Stash<K, V> + ?Sized,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &K, value: V) -> Result<()> {
        (**self).set(key, value).await
    }
}

#[async_trait]
impl<K, V, T> Stash<K, V> for Box<T>
where
    K: ?Sized + Sync + 'static,
    V: Send + 'static,
    T: Stash<K, V> + ?Sized,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &K, value: V) -> Result<()> {
        (**self).set(key, value).await
    }
}
