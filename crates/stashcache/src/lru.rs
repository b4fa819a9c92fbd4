//! LRU (Least Recently Used) map
//!
//! Nodes live in a slab and are linked by index, so touching, inserting and
//! evicting are all O(1).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Fixed-capacity map evicting the least recently used entry
pub struct LruCache<K, V> {
    index: HashMap<K, usize, RandomState>,
    slab: Vec<Option<Node<K, V>>>,
    vacant: Vec<usize>,
    // most recently used
    head: Option<usize>,
    // least recently used
    tail: Option<usize>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty map holding at most `capacity` entries (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            index: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            slab: Vec::with_capacity(capacity),
            vacant: Vec::new(),
            head: None,
            tail: None,
            capacity,
        }
    }

    /// Look up `key` and mark it as most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.detach(idx);
        self.push_front(idx);
        self.slab[idx].as_ref().map(|node| &node.value)
    }

    /// Look up `key` without touching its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.slab[idx].as_ref().map(|node| &node.value)
    }

    /// Insert or overwrite `key`
    ///
    /// Returns the entry evicted to make room, if any.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.index.get(&key) {
            if let Some(node) = self.slab[idx].as_mut() {
                node.value = value;
            }
            self.detach(idx);
            self.push_front(idx);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.pop_back()
        } else {
            None
        };

        let idx = match self.vacant.pop() {
            Some(idx) => idx,
            None => {
                self.slab.push(None);
                self.slab.len() - 1
            }
        };
        self.slab[idx] = Some(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.push_front(idx);
        self.index.insert(key, idx);

        evicted
    }

    /// Remove `key`, returning its value
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.release(idx).map(|(_, value)| value)
    }

    /// Remove every entry for which `keep` returns false, returning how many went
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &V) -> bool) -> usize {
        let doomed: Vec<K> = self
            .slab
            .iter()
            .flatten()
            .filter(|node| !keep(&node.key, &node.value))
            .map(|node| node.key.clone())
            .collect();

        for key in &doomed {
            self.remove(key);
        }
        doomed.len()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when there are no entries
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.index.clear();
        self.slab.clear();
        self.vacant.clear();
        self.head = None;
        self.tail = None;
    }

    fn pop_back(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        let (key, value) = self.release(idx)?;
        self.index.remove(&key);
        Some((key, value))
    }

    fn release(&mut self, idx: usize) -> Option<(K, V)> {
        self.detach(idx);
        let node = self.slab[idx].take()?;
        self.vacant.push(idx);
        Some((node.key, node.value))
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.slab[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(head) = old_head.and_then(|h| self.slab[h].as_mut()) {
            head.prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn detach(&mut self, idx: usize) {
        let Some((prev, next)) = self.slab[idx].as_ref().map(|n| (n.prev, n.next)) else {
            return;
        };

        match prev.and_then(|p| self.slab[p].as_mut()) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.slab[n].as_mut()) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        if let Some(node) = self.slab[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }
}
