use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{HistoryRecord, HistoryType};

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    15
}

/// Query string for `GET /api/v1/history/{userId}`.
///
/// Page numbering is 1-based. `limit` defaults to 15 and is clamped to
/// `1..=100`; `page` values below 1 are treated as 1.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ListHistoryQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for ListHistoryQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl ListHistoryQuery {
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.limit = self.limit.clamp(1, 100);
        self
    }
}

/// One history entry on the wire.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecordResponse {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub record_type: HistoryType,
    /// For voice queries this is the user's question, not the answer.
    pub content: String,
    pub lat: f64,
    pub lng: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<HistoryRecord> for HistoryRecordResponse {
    fn from(record: HistoryRecord) -> Self {
        let (lat, lng) = record
            .location
            .map(|c| (c.lat, c.lng))
            .unwrap_or((0.0, 0.0));
        Self {
            id: record.id,
            user_id: record.user_id,
            record_type: record.record_type,
            content: record.content,
            lat,
            lng,
            timestamp: record.timestamp,
        }
    }
}

/// `GET /api/v1/history/{userId}` response payload.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ListHistoryResponse {
    pub records: Vec<HistoryRecordResponse>,
}
