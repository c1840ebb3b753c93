//! In-process store implementations.
//!
//! Used by the server binary when no external store is wired in, and by the
//! test suites. Both stores can be switched into an "unavailable" state in
//! which every call fails, to exercise the error paths of the clients above.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use super::{KeyValueStore, ListOp, ListStore, StoreError, StoreResult};

/// Shared failure switch.
#[derive(Debug, Default)]
struct Availability(AtomicBool);

impl Availability {
    fn check(&self) -> StoreResult<()> {
        if self.0.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn set(&self, unavailable: bool) {
        self.0.store(unavailable, Ordering::SeqCst);
    }
}

/// A memcached-like store backed by a concurrent map.
///
/// Clones share the same underlying data.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    inner: Arc<DashMap<String, Bytes>>,
    down: Arc<Availability>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.down.set(unavailable);
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>> {
        self.down.check()?;
        Ok(self.inner.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: Bytes) -> StoreResult<()> {
        self.down.check()?;
        self.inner.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.down.check()?;
        self.inner.remove(key);
        Ok(())
    }

    async fn flush_all(&self) -> StoreResult<()> {
        self.down.check()?;
        self.inner.clear();
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Value {
    Plain(Bytes),
    List(VecDeque<String>),
}

/// A redis-like store with plain and list values.
///
/// Clones share the same underlying data.
#[derive(Clone, Default)]
pub struct MemoryListStore {
    inner: Arc<DashMap<String, Value>>,
    down: Arc<Availability>,
}

impl MemoryListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.down.set(unavailable);
    }

    /// Whether `key` is present, whatever its type.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    fn is_plain(&self, key: &str) -> bool {
        matches!(self.inner.get(key).as_deref(), Some(Value::Plain(_)))
    }

    /// Reject the batch up front if any push would hit a plain value.
    fn check_batch(&self, ops: &[ListOp]) -> StoreResult<()> {
        let mut cleared: HashSet<&str> = HashSet::new();
        for op in ops {
            match op {
                ListOp::Del(key) => {
                    cleared.insert(key.as_str());
                }
                ListOp::PushFront(key, _) => {
                    if !cleared.contains(key.as_str()) && self.is_plain(key) {
                        return Err(StoreError::WrongType { key: key.clone() });
                    }
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ListStore for MemoryListStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>> {
        self.down.check()?;
        match self.inner.get(key).as_deref() {
            None => Ok(None),
            Some(Value::Plain(v)) => Ok(Some(v.clone())),
            Some(Value::List(_)) => Err(StoreError::WrongType { key: key.to_string() }),
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> StoreResult<()> {
        self.down.check()?;
        self.inner.insert(key.to_string(), Value::Plain(value));
        Ok(())
    }

    async fn del(&self, keys: &[&str]) -> StoreResult<()> {
        self.down.check()?;
        for key in keys {
            self.inner.remove(*key);
        }
        Ok(())
    }

    async fn lrange(&self, key: &str) -> StoreResult<Vec<String>> {
        self.down.check()?;
        match self.inner.get(key).as_deref() {
            None => Ok(Vec::new()),
            Some(Value::List(items)) => Ok(items.iter().cloned().collect()),
            Some(Value::Plain(_)) => Err(StoreError::WrongType { key: key.to_string() }),
        }
    }

    async fn exec(&self, ops: Vec<ListOp>) -> StoreResult<()> {
        self.down.check()?;
        self.check_batch(&ops)?;

        for op in ops {
            match op {
                ListOp::Del(key) => {
                    self.inner.remove(&key);
                }
                ListOp::PushFront(key, item) => {
                    let mut entry = self
                        .inner
                        .entry(key)
                        .or_insert_with(|| Value::List(VecDeque::new()));
                    if let Value::List(items) = entry.value_mut() {
                        items.push_front(item);
                    }
                }
            }
        }
        Ok(())
    }
}
