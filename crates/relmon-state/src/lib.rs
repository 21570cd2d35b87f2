//! relmon-state: correlation cache for relmon
//!
//! When a scratch build is started for a ticket, the build identifier is
//! recorded against the ticket identifier. A later build-completion event
//! looks the build up again to find the ticket it belongs to.
//!
//! ## Key Components
//!
//! - `CorrelationCache`: async key/value contract shared by all backends
//! - `MemoryCorrelationCache`: process-local map behind a mutex
//! - `SurrealCorrelationCache`: SurrealDB-backed store shared by workers
//! - `SurrealHandle`: connection management (in-memory, URL or cloud)

mod error;
mod handle;
pub mod memory;
pub mod storage_traits;
pub mod surreal_cache;

pub use error::StorageError;
pub use handle::{CloudConfig, SurrealHandle};
pub use memory::MemoryCorrelationCache;
pub use storage_traits::{CorrelationCache, StorageResult};
pub use surreal_cache::SurrealCorrelationCache;
