//! Redis store configuration

use std::time::Duration;

/// Default expiry of entries written through `set`
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// What the store does when Redis fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// A failed read is a miss and a failed write is dropped, both logged
    #[default]
    Absorb,
    /// Failures are returned to the caller
    Propagate,
}

/// Configuration for a [`RedisStore`](crate::RedisStore)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// Expiry of entries written through `set`, rounded down to whole
    /// seconds and never below one
    pub ttl: Duration,
    /// Failure handling
    pub on_error: ErrorPolicy,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            on_error: ErrorPolicy::default(),
        }
    }
}

impl RedisConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry ttl
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the failure policy
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }

    /// Ttl in whole seconds as sent with `SETEX`
    pub fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs().max(1)
    }
}
