//! # stashredis
//!
//! Redis backing store for stashline chains.
//!
//! Entries are written with `SETEX`, so expiry is owned by Redis. A nil reply
//! becomes a miss before it reaches the chain. By default a Redis failure is
//! logged and treated as a miss (reads) or a no-op (writes), so a chain keeps
//! serving from its other tiers while Redis is down.

#![warn(missing_docs)]

mod client;
mod config;
mod store;

pub use client::KvClient;
pub use config::{ErrorPolicy, RedisConfig, DEFAULT_TTL};
pub use store::{RedisStore, STORE};
