//! Fallback-and-promote combinator

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::Result;
use crate::stash::Stash;

/// Two stashes read as one: `primary` first, `secondary` on a miss
///
/// A value found only in `secondary` is written into `primary` before `get`
/// returns it. `set` writes `primary` then `secondary` and stops at the
/// first failure.
///
/// `primary` may itself be a `Combine`, which is how longer chains are built
/// (see [`merge`](crate::merge())). A promotion into such a node runs its own
/// `set`, so every tier nested in it receives the value.
#[derive(Debug, Clone)]
pub struct Combine<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> Combine<P, S> {
    /// Chain `secondary` behind `primary`
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    /// Faster tier, consulted first
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Slower tier, consulted on a primary miss
    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    /// Split back into `(primary, secondary)`
    pub fn into_parts(self) -> (P, S) {
        (self.primary, self.secondary)
    }
}

/// `Combine::new(primary, secondary)`
pub fn combine<P, S>(primary: P, secondary: S) -> Combine<P, S> {
    Combine::new(primary, secondary)
}

#[async_trait]
impl<K, V, P, S> Stash<K, V> for Combine<P, S>
where
    K: ?Sized + Sync + 'static,
    V: Clone + Send + 'static,
    P: Stash<K, V>,
    S: Stash<K, V>,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        if let Some(value) = self.primary.get(key).await? {
            trace!("primary hit");
            return Ok(Some(value));
        }

        match self.secondary.get(key).await? {
            Some(value) => {
                debug!("secondary hit, promoting into primary");
                self.primary.set(key, value.clone()).await?;
                Ok(Some(value))
            }
            None => {
                trace!("miss in both tiers");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &K, value: V) -> Result<()> {
        self.primary.set(key, value.clone()).await?;
        self.secondary.set(key, value).await
    }
}
