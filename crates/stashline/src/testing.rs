//! Recording in-memory backing store shared by the unit tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::stash::{Getter, Setter};

/// Ordered log of `tier.get` / `tier.set` events across several tiers
pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) struct Tier {
    name: &'static str,
    values: Mutex<HashMap<String, String>>,
    fixed: Option<String>,
    fail_get: bool,
    fail_set: bool,
    gets: Mutex<Vec<String>>,
    sets: Mutex<Vec<(String, String)>>,
    journal: Option<Journal>,
}

impl Tier {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            values: Mutex::new(HashMap::new()),
            fixed: None,
            fail_get: false,
            fail_set: false,
            gets: Mutex::new(Vec::new()),
            sets: Mutex::new(Vec::new()),
            journal: None,
        }
    }

    /// Answer every get with `value`
    pub(crate) fn with_fixed(mut self, value: &str) -> Self {
        self.fixed = Some(value.to_string());
        self
    }

    pub(crate) fn with_value(self, key: &str, value: &str) -> Self {
        self.values.lock().insert(key.to_string(), value.to_string());
        self
    }

    pub(crate) fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    pub(crate) fn failing_set(mut self) -> Self {
        self.fail_set = true;
        self
    }

    pub(crate) fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = Some(journal.clone());
        self
    }

    pub(crate) fn get_count(&self) -> usize {
        self.gets.lock().len()
    }

    pub(crate) fn set_count(&self) -> usize {
        self.sets.lock().len()
    }

    pub(crate) fn get_keys(&self) -> Vec<String> {
        self.gets.lock().clone()
    }

    pub(crate) fn sets(&self) -> Vec<(String, String)> {
        self.sets.lock().clone()
    }

    pub(crate) fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn log(&self, op: &str) {
        if let Some(journal) = &self.journal {
            journal.lock().push(format!("{}.{}", self.name, op));
        }
    }
}

#[async_trait]
impl Getter<String> for Tier {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.gets.lock().push(key.to_string());
        self.log("get");
        if self.fail_get {
            return Err(Error::backend(self.name, "get failed"));
        }
        if let Some(fixed) = &self.fixed {
            return Ok(Some(fixed.clone()));
        }
        Ok(self.values.lock().get(key).cloned())
    }
}

#[async_trait]
impl Setter<String> for Tier {
    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.sets.lock().push((key.to_string(), value.clone()));
        self.log("set");
        if self.fail_set {
            return Err(Error::backend(self.name, "set failed"));
        }
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}
