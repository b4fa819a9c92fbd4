//! Chain wiring: `[local] -> [redis namespace] -> [file origin]`

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use stashcache::{LocalConfig, LocalStore};
use stashline::{merge, named_stash, read_only, stash, BoxStash, Stash};
use stashredis::{ErrorPolicy, RedisConfig, RedisStore};
use tracing::info;

use crate::origin::FileOrigin;
use crate::Args;

/// The merged chain plus a handle on its in-process tier
pub struct Chain {
    stash: BoxStash,
    local: Arc<LocalStore<Vec<u8>>>,
    tiers: Vec<&'static str>,
}

impl Chain {
    /// Build the chain described by the command line
    ///
    /// The local tier is always present; redis and the origin are added
    /// when `--redis` and `--origin-dir` are given.
    pub async fn build(args: &Args) -> Result<Self> {
        let mut local_config = LocalConfig::new().with_capacity(args.local_capacity);
        if let Some(secs) = args.local_ttl {
            local_config = local_config.with_ttl(Duration::from_secs(secs));
        }
        let local = Arc::new(LocalStore::new(local_config));
        let mut stashes: Vec<BoxStash> = vec![Box::new(stash(local.clone(), local.clone()))];
        let mut tiers = vec!["local"];

        if let Some(url) = &args.redis {
            let policy = if args.strict {
                ErrorPolicy::Propagate
            } else {
                ErrorPolicy::Absorb
            };
            let config = RedisConfig::new()
                .with_ttl(Duration::from_secs(args.ttl))
                .with_error_policy(policy);
            let remote = Arc::new(
                RedisStore::connect(url, config)
                    .await
                    .with_context(|| format!("Failed to connect to {}", url))?,
            );
            stashes.push(Box::new(named_stash(
                args.namespace.clone(),
                remote.clone(),
                remote,
            )));
            tiers.push("redis");
        }

        if let Some(dir) = &args.origin_dir {
            let origin = FileOrigin::new(dir);
            info!(root = %origin.root().display(), "serving origin from directory");
            stashes.push(Box::new(read_only(origin)));
            tiers.push("origin");
        }

        let chain = Self {
            stash: merge(stashes)?,
            local,
            tiers,
        };
        info!(tiers = ?chain.tiers(), "chain ready");
        Ok(chain)
    }

    /// Read through the chain
    pub async fn get(&self, key: &str) -> stashline::Result<Option<Vec<u8>>> {
        self.stash.get(key).await
    }

    /// Write into every writable tier
    pub async fn set(&self, key: &str, value: Vec<u8>) -> stashline::Result<()> {
        self.stash.set(key, value).await
    }

    /// In-process tier
    pub fn local(&self) -> &LocalStore<Vec<u8>> {
        &self.local
    }

    /// Tier names, fastest first
    pub fn tiers(&self) -> &[&'static str] {
        &self.tiers
    }
}
