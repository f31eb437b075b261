//! In-memory key-value store.
//!
//! Used where durability isn't wanted (tests, previews); also counts writes so
//! callers can check that a mutation was persisted.

use async_trait::async_trait;
use pqa_core::error::Result;
use pqa_core::storage::KeyValueStore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, Value>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one key.
    pub fn with_value(key: impl Into<String>, value: Value) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value);
        Self {
            values: Arc::new(RwLock::new(values)),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.values.write().await.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
