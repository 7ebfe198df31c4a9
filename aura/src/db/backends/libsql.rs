use async_trait::async_trait;

use crate::db::connection::Database;
use crate::db::repository::{HistoryRepository, LocationRepository};
use crate::db::traits::{HistoryStore, LocationStore};
use crate::error::Result;
use crate::models::{HistoryRecord, PersistedLocation};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocationStore for LibSqlBackend {
    async fn upsert_location(&self, location: &PersistedLocation) -> Result<()> {
        let conn = self.db.connect()?;
        LocationRepository::upsert(&conn, location).await
    }

    async fn get_location(&self, device_id: &str) -> Result<Option<PersistedLocation>> {
        let conn = self.db.connect()?;
        LocationRepository::get_by_device_id(&conn, device_id).await
    }
}

#[async_trait]
impl HistoryStore for LibSqlBackend {
    async fn append_history(&self, record: &HistoryRecord) -> Result<()> {
        let conn = self.db.connect()?;
        HistoryRepository::append(&conn, record).await
    }

    async fn list_history(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<HistoryRecord>> {
        let conn = self.db.connect()?;
        HistoryRepository::list_by_user(&conn, user_id, page, limit).await
    }

    async fn count_history(&self, user_id: &str) -> Result<u64> {
        let conn = self.db.connect()?;
        HistoryRepository::count_by_user(&conn, user_id).await
    }
}
