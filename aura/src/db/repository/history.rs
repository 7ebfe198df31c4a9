use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row};

use crate::error::{AuraError, Result};
use crate::models::{Coordinates, HistoryRecord};

pub struct HistoryRepository;

impl HistoryRepository {
    pub async fn append(conn: &Connection, record: &HistoryRecord) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO history (id, user_id, record_type, content, lat, lng, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.id.clone(),
                record.user_id.clone(),
                record.record_type.to_string(),
                record.content.clone(),
                record.location.map(|c| c.lat),
                record.location.map(|c| c.lng),
                record.timestamp.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    /// Newest-first page of a user's history. `page` is 1-based.
    pub async fn list_by_user(
        conn: &Connection,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<HistoryRecord>> {
        let page = page.max(1);
        let offset = u64::from(page - 1) * u64::from(limit);

        let mut rows = conn
            .query(
                r#"
                SELECT id, user_id, record_type, content, lat, lng, timestamp
                FROM history
                WHERE user_id = ?1
                ORDER BY timestamp DESC
                LIMIT ?2 OFFSET ?3
                "#,
                params![user_id, limit as i64, offset as i64],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(Self::row_to_record(&row)?);
        }
        Ok(records)
    }

    pub async fn count_by_user(conn: &Connection, user_id: &str) -> Result<u64> {
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM history WHERE user_id = ?1",
                params![user_id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            let count: i64 = row.get(0)?;
            Ok(count as u64)
        } else {
            Ok(0)
        }
    }

    fn row_to_record(row: &Row) -> Result<HistoryRecord> {
        let record_type: String = row.get(2)?;
        let lat: Option<f64> = row.get(4)?;
        let lng: Option<f64> = row.get(5)?;
        let timestamp: String = row.get(6)?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| AuraError::Internal(format!("Invalid timestamp in store: {e}")))?
            .with_timezone(&Utc);

        Ok(HistoryRecord {
            id: row.get(0)?,
            user_id: row.get(1)?,
            record_type: record_type.parse()?,
            content: row.get(3)?,
            location: match (lat, lng) {
                (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
                _ => None,
            },
            timestamp,
        })
    }
}
