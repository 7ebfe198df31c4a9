use async_trait::async_trait;

use crate::error::Result;
use crate::models::{HistoryRecord, PersistedLocation};

/// Durable key -> last-known-location mapping, keyed by device id.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Insert or replace the last-known location for a device.
    async fn upsert_location(&self, location: &PersistedLocation) -> Result<()>;
    async fn get_location(&self, device_id: &str) -> Result<Option<PersistedLocation>>;
}

/// Append-only log of timestamped user interactions.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append_history(&self, record: &HistoryRecord) -> Result<()>;
    /// Records for a user, newest first. `page` is 1-based; the result
    /// skips `(page - 1) * limit` records and returns at most `limit`.
    async fn list_history(&self, user_id: &str, page: u32, limit: u32)
        -> Result<Vec<HistoryRecord>>;
    async fn count_history(&self, user_id: &str) -> Result<u64>;
}

/// Combined persistence backend consumed by the core.
pub trait DatabaseBackend: LocationStore + HistoryStore {}

impl<T: LocationStore + HistoryStore> DatabaseBackend for T {}
