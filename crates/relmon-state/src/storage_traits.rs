//! Storage trait definitions for relmon
//!
//! `CorrelationCache` maps a build identifier to the identifier of the
//! ticket that requested the build. The trait is async and
//! backend-agnostic; several workers may share one cache, so every
//! implementation must tolerate concurrent reads and inserts.

use async_trait::async_trait;

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Key/value store correlating build identifiers with ticket identifiers.
///
/// Guarantees:
/// - `insert(key, value)` returns the value previously stored under `key`,
///   or `None` when the key was absent.
/// - `retrieve(key)` returns the current value, or `None` when absent.
/// - Entries are never deleted by the caller; expiry is a backend concern.
#[async_trait]
pub trait CorrelationCache: Send + Sync {
    /// Store `value` under `key`, returning the previous value if any.
    async fn insert(&self, key: &str, value: &str) -> StorageResult<Option<String>>;

    /// Look up the value stored under `key`.
    async fn retrieve(&self, key: &str) -> StorageResult<Option<String>>;
}
