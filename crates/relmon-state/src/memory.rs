//! In-memory correlation cache
//!
//! Backed by a `HashMap` behind a `Mutex`. Suitable for a single process
//! and for tests; entries vanish when the process exits.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::storage_traits::{CorrelationCache, StorageResult};

/// Process-local correlation cache.
#[derive(Debug, Default)]
pub struct MemoryCorrelationCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCorrelationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored correlations.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Backend("correlation cache lock poisoned".to_string())
}

#[async_trait]
impl CorrelationCache for MemoryCorrelationCache {
    async fn insert(&self, key: &str, value: &str) -> StorageResult<Option<String>> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.insert(key.to_string(), value.to_string()))
    }

    async fn retrieve(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }
}
