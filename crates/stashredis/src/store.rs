//! RedisStore: remote backing store

use redis::aio::ConnectionManager;
use redis::Value;
use stashline::{async_trait, BoxError, Error, Getter, Result, Setter};
use tracing::{debug, warn};

use crate::client::KvClient;
use crate::config::{ErrorPolicy, RedisConfig};

/// Store label carried by errors from this adapter
pub const STORE: &str = "redis";

/// Redis-backed store for opaque blobs
///
/// A nil reply is a miss. Writes use `SETEX` with the configured ttl.
/// Failures are absorbed or returned according to [`ErrorPolicy`].
pub struct RedisStore<C = ConnectionManager> {
    client: C,
    config: RedisConfig,
}

impl RedisStore<ConnectionManager> {
    /// Connect to `url` (e.g. `redis://127.0.0.1:6379`)
    ///
    /// The connection manager reconnects on its own after a failure.
    pub async fn connect(url: &str, config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| Error::backend(STORE, e))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| Error::backend(STORE, e))?;
        debug!(url, "connected to redis");
        Ok(Self::new(conn, config))
    }
}

impl<C: KvClient> RedisStore<C> {
    /// Wrap an existing client
    pub fn new(client: C, config: RedisConfig) -> Self {
        Self { client, config }
    }

    /// Store configuration
    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    /// Underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    fn on_failure<T>(
        &self,
        op: &'static str,
        key: &str,
        err: impl Into<BoxError>,
        absorbed: T,
    ) -> Result<T> {
        let err = err.into();
        match self.config.on_error {
            ErrorPolicy::Absorb => {
                warn!(op, key, error = %err, "redis failure absorbed");
                Ok(absorbed)
            }
            ErrorPolicy::Propagate => Err(Error::Backend {
                store: STORE,
                source: err,
            }),
        }
    }
}

/// Translate a `GET` reply into a stash result, `Nil` being a miss
fn normalize(reply: Value) -> std::result::Result<Option<Vec<u8>>, String> {
    match reply {
        Value::Nil => Ok(None),
        Value::Data(bytes) => Ok(Some(bytes)),
        Value::Status(status) => Ok(Some(status.into_bytes())),
        other => Err(format!("unexpected reply to GET: {:?}", other)),
    }
}

#[async_trait]
impl<C: KvClient> Getter<Vec<u8>> for RedisStore<C> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let reply = match self.client.get(key).await {
            Ok(reply) => reply,
            Err(err) => return self.on_failure("get", key, err, None),
        };

        match normalize(reply) {
            Ok(value) => Ok(value),
            Err(msg) => self.on_failure("get", key, msg, None),
        }
    }
}

#[async_trait]
impl<C: KvClient> Setter<Vec<u8>> for RedisStore<C> {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        match self.client.set_ex(key, &value, self.config.ttl_secs()).await {
            Ok(()) => Ok(()),
            Err(err) => self.on_failure("set", key, err, ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use redis::{ErrorKind, RedisError, RedisResult};
    use stashcache::LocalStore;
    use stashline::{merge, named_stash, stash, BoxStash, Stash};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeKv {
        entries: Mutex<HashMap<String, (Vec<u8>, u64)>>,
        reply: Option<Value>,
        down: bool,
    }

    impl FakeKv {
        fn down() -> Self {
            Self {
                down: true,
                ..Self::default()
            }
        }

        fn replying(reply: Value) -> Self {
            Self {
                reply: Some(reply),
                ..Self::default()
            }
        }

        fn entry(&self, key: &str) -> Option<(Vec<u8>, u64)> {
            self.entries.lock().get(key).cloned()
        }
    }

    fn refused() -> RedisError {
        RedisError::from((ErrorKind::IoError, "connection refused"))
    }

    #[async_trait]
    impl KvClient for FakeKv {
        async fn get(&self, key: &str) -> RedisResult<Value> {
            if self.down {
                return Err(refused());
            }
            if let Some(reply) = &self.reply {
                return Ok(reply.clone());
            }
            Ok(match self.entries.lock().get(key) {
                Some((bytes, _)) => Value::Data(bytes.clone()),
                None => Value::Nil,
            })
        }

        async fn set_ex(&self, key: &str, value: &[u8], ttl_secs: u64) -> RedisResult<()> {
            if self.down {
                return Err(refused());
            }
            self.entries
                .lock()
                .insert(key.to_string(), (value.to_vec(), ttl_secs));
            Ok(())
        }
    }

    fn propagating() -> RedisConfig {
        RedisConfig::new().with_error_policy(ErrorPolicy::Propagate)
    }

    #[tokio::test]
    async fn test_nil_is_a_miss() {
        let store = Arc::new(RedisStore::new(FakeKv::default(), RedisConfig::new()));
        let stash = named_stash("myapp", store.clone(), store.clone());

        let value: Option<Vec<u8>> = stash.get("tim").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_set_uses_ttl_and_derived_key() {
        let store = Arc::new(RedisStore::new(
            FakeKv::default(),
            RedisConfig::new().with_ttl(Duration::from_secs(300)),
        ));
        let stash = named_stash("myapp", store.clone(), store.clone());

        stash.set("tim", b"val".to_vec()).await.unwrap();

        let key = "myapp:0545e9b8dfadca14cf06d163e2d2514c161d5d17";
        assert_eq!(store.client().entry(key), Some((b"val".to_vec(), 300)));
        let value: Option<Vec<u8>> = stash.get("tim").await.unwrap();
        assert_eq!(value, Some(b"val".to_vec()));
    }

    #[tokio::test]
    async fn test_empty_blob_is_a_hit() {
        let store = RedisStore::new(FakeKv::replying(Value::Data(Vec::new())), propagating());
        assert_eq!(store.get("key").await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_status_reply() {
        let store = RedisStore::new(
            FakeKv::replying(Value::Status("PONG".into())),
            propagating(),
        );
        assert_eq!(store.get("key").await.unwrap(), Some(b"PONG".to_vec()));
    }

    #[tokio::test]
    async fn test_okay_reply_is_unexpected() {
        let store = RedisStore::new(FakeKv::replying(Value::Okay), propagating());
        let err = store.get("key").await.unwrap_err();
        assert!(err.to_string().contains("unexpected reply"));
    }

    #[tokio::test]
    async fn test_unexpected_reply() {
        let store = RedisStore::new(FakeKv::replying(Value::Int(7)), propagating());
        let err = store.get("key").await.unwrap_err();
        assert_eq!(err.store(), Some(STORE));

        let lenient = RedisStore::new(FakeKv::replying(Value::Int(7)), RedisConfig::new());
        assert_eq!(lenient.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_absorb_turns_failures_into_misses() {
        let store = RedisStore::new(FakeKv::down(), RedisConfig::new());

        assert_eq!(store.get("key").await.unwrap(), None);
        store.set("key", b"val".to_vec()).await.unwrap();
    }

    #[tokio::test]
    async fn test_propagate_returns_failures() {
        let store = RedisStore::new(FakeKv::down(), propagating());

        let err = store.get("key").await.unwrap_err();
        assert_eq!(err.store(), Some(STORE));
        assert!(err.to_string().contains("connection refused"));
        assert!(store.set("key", b"val".to_vec()).await.is_err());
    }

    #[tokio::test]
    async fn test_local_in_front_of_redis() {
        let local = Arc::new(LocalStore::<Vec<u8>>::with_capacity(100));
        let remote = Arc::new(RedisStore::new(FakeKv::default(), RedisConfig::new()));
        remote.set("myapp:tim", b"shared".to_vec()).await.unwrap();

        let chain = merge([
            Box::new(stash(local.clone(), local.clone())) as BoxStash,
            Box::new(stashline::keyed_stash("myapp", remote.clone(), remote.clone())) as BoxStash,
        ])
        .unwrap();

        assert_eq!(chain.get("tim").await.unwrap(), Some(b"shared".to_vec()));
        assert_eq!(local.lookup("tim"), Some(b"shared".to_vec()));
    }

    #[tokio::test]
    async fn test_failing_remote_fails_chain_set() {
        let local = Arc::new(LocalStore::<Vec<u8>>::with_capacity(100));
        let remote = Arc::new(RedisStore::new(FakeKv::down(), propagating()));
        let chain = merge([
            Box::new(stash(local.clone(), local.clone())) as BoxStash,
            Box::new(stash(remote.clone(), remote.clone())) as BoxStash,
        ])
        .unwrap();

        assert!(chain.set("key", b"val".to_vec()).await.is_err());
        // the faster tier already took the write
        assert_eq!(local.lookup("key"), Some(b"val".to_vec()));
    }
}
