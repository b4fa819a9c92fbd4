//! Minimal key-value client seam over Redis

use redis::aio::ConnectionManager;
use redis::{RedisResult, Value};
use stashline::async_trait;

/// The two commands a [`RedisStore`](crate::RedisStore) needs
///
/// Implemented for [`ConnectionManager`]; tests plug in an in-memory fake.
#[async_trait]
pub trait KvClient: Send + Sync {
    /// `GET key`, returning the raw reply (`Nil` when absent)
    async fn get(&self, key: &str) -> RedisResult<Value>;

    /// `SETEX key ttl_secs value`
    async fn set_ex(&self, key: &str, value: &[u8], ttl_secs: u64) -> RedisResult<()>;
}

#[async_trait]
impl KvClient for ConnectionManager {
    async fn get(&self, key: &str) -> RedisResult<Value> {
        let mut conn = self.clone();
        let reply: Value = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(reply)
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl_secs: u64) -> RedisResult<()> {
        let mut conn = self.clone();
        redis::cmd("SETEX")
            .arg(key)
            .arg(ttl_secs)
            .arg(value)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}
