use std::sync::Arc;

use async_trait::async_trait;

use crate::storage_traits::{CorrelationCache, StorageResult};
use crate::SurrealHandle;

/// SurrealDB-backed implementation of the CorrelationCache trait.
#[derive(Clone)]
pub struct SurrealCorrelationCache {
    handle: Arc<SurrealHandle>,
}

impl SurrealCorrelationCache {
    pub fn new(handle: Arc<SurrealHandle>) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl CorrelationCache for SurrealCorrelationCache {
    async fn insert(&self, key: &str, value: &str) -> StorageResult<Option<String>> {
        self.handle.correlation_insert(key, value).await
    }

    async fn retrieve(&self, key: &str) -> StorageResult<Option<String>> {
        self.handle.correlation_retrieve(key).await
    }
}
