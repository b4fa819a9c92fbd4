//! Key-derivation stash and the stock constructors built on it

use async_trait::async_trait;

use crate::error::Result;
use crate::key::{
    Compose, Fingerprint, Hashed, Identity, KeyTransform, Namespace, ObjectHash, Prefix,
};
use crate::stash::{Getter, NoSetter, Setter, Stash};

/// Stash over one backing store with a key transform in front of it
///
/// `get(key)` is `getter.get(transform(key))` and `set(key, value)` is
/// `setter.set(transform(key), value)`. This is the only way a backing store
/// becomes a [`Stash`].
#[derive(Debug, Clone)]
pub struct KeyGenStash<T, G, S> {
    transform: T,
    getter: G,
    setter: S,
}

impl<T, G, S> KeyGenStash<T, G, S> {
    /// Create a stash from a transform, a getter and a setter
    pub fn new(transform: T, getter: G, setter: S) -> Self {
        Self {
            transform,
            getter,
            setter,
        }
    }

    /// Physical key the backing store sees for `key`
    pub fn key_for<K: ?Sized>(&self, key: &K) -> String
    where
        T: KeyTransform<K>,
    {
        self.transform.derive(key)
    }

    /// Key transform in front of the store
    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Read half
    pub fn getter(&self) -> &G {
        &self.getter
    }

    /// Write half
    pub fn setter(&self) -> &S {
        &self.setter
    }
}

#[async_trait]
impl<K, V, T, G, S> Stash<K, V> for KeyGenStash<T, G, S>
where
    K: ?Sized + Sync + 'static,
    V: Send + 'static,
    T: KeyTransform<K>,
    G: Getter<V>,
    S: Setter<V>,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        let key = self.transform.derive(key);
        self.getter.get(&key).await
    }

    async fn set(&self, key: &K, value: V) -> Result<()> {
        let key = self.transform.derive(key);
        self.setter.set(&key, value).await
    }
}

/// Stash using keys as given
pub fn stash<G, S>(getter: G, setter: S) -> KeyGenStash<Identity, G, S> {
    KeyGenStash::new(Identity, getter, setter)
}

/// Stash that never writes, typically an origin loader at the end of a chain
pub fn read_only<G>(getter: G) -> KeyGenStash<Identity, G, NoSetter> {
    KeyGenStash::new(Identity, getter, NoSetter)
}

/// Stash keyed as `name:key`
pub fn keyed_stash<G, S>(
    name: impl Into<String>,
    getter: G,
    setter: S,
) -> KeyGenStash<Prefix, G, S> {
    KeyGenStash::new(Prefix::new(name), getter, setter)
}

/// Stash keyed by the fingerprint of the key
pub fn hashed_stash<G, S>(getter: G, setter: S) -> KeyGenStash<Hashed, G, S> {
    KeyGenStash::new(Hashed::default(), getter, setter)
}

/// Stash keyed as `name:fingerprint(key)`
pub fn named_stash<G, S>(
    name: impl Into<String>,
    getter: G,
    setter: S,
) -> KeyGenStash<Namespace, G, S> {
    named_stash_with(name, ObjectHash, getter, setter)
}

/// Like [`named_stash`] with a caller-supplied fingerprint
pub fn named_stash_with<F, G, S>(
    name: impl Into<String>,
    fingerprint: F,
    getter: G,
    setter: S,
) -> KeyGenStash<Namespace<F>, G, S>
where
    F: Fingerprint,
{
    KeyGenStash::new(
        Compose::new(Prefix::new(name), Hashed::new(fingerprint)),
        getter,
        setter,
    )
}
