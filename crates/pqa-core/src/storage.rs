//! Key-value persistence boundary.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Durable key-value store backing one file of application state.
///
/// Flush policy belongs to the implementation.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}
