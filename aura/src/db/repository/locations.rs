use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row};

use crate::error::{AuraError, Result};
use crate::models::PersistedLocation;

pub struct LocationRepository;

impl LocationRepository {
    pub async fn upsert(conn: &Connection, location: &PersistedLocation) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO device_locations (device_id, lat, lng, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(device_id) DO UPDATE SET
                lat = excluded.lat,
                lng = excluded.lng,
                updated_at = excluded.updated_at
            "#,
            params![
                location.device_id.clone(),
                location.lat,
                location.lng,
                location.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_device_id(
        conn: &Connection,
        device_id: &str,
    ) -> Result<Option<PersistedLocation>> {
        let mut rows = conn
            .query(
                "SELECT device_id, lat, lng, updated_at FROM device_locations WHERE device_id = ?1",
                params![device_id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_location(&row)?))
        } else {
            Ok(None)
        }
    }

    fn row_to_location(row: &Row) -> Result<PersistedLocation> {
        let updated_at: String = row.get(3)?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| AuraError::Internal(format!("Invalid updated_at in store: {e}")))?
            .with_timezone(&Utc);

        Ok(PersistedLocation {
            device_id: row.get(0)?,
            lat: row.get(1)?,
            lng: row.get(2)?,
            updated_at,
        })
    }
}
