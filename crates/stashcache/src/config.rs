//! Local store configuration

use std::time::Duration;

/// Default number of entries kept in memory
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Configuration for a [`LocalStore`](crate::LocalStore)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalConfig {
    /// Maximum number of entries before the least recently used is evicted
    pub capacity: usize,
    /// Lifetime of an entry written through `set`, `None` keeps it until evicted
    pub ttl: Option<Duration>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl: None,
        }
    }
}

impl LocalConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the entry ttl
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Keep entries until evicted
    pub fn without_ttl(mut self) -> Self {
        self.ttl = None;
        self
    }
}
