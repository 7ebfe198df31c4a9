use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Durable last-known location per user device. Mutated only by the
        -- reconciler; last write wins.
        CREATE TABLE IF NOT EXISTS device_locations (
            device_id TEXT PRIMARY KEY,
            lat REAL NOT NULL,
            lng REAL NOT NULL,
            updated_at TEXT NOT NULL
        );

        -- Append-only interaction log, queried newest-first per user.
        CREATE TABLE IF NOT EXISTS history (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            record_type TEXT NOT NULL DEFAULT 'VOICE',
            content TEXT NOT NULL,
            lat REAL,
            lng REAL,
            timestamp TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_history_user_timestamp
            ON history(user_id, timestamp);
        "#,
    )
    .await?;

    Ok(())
}
