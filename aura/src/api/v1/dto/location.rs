use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{LocationSample, Origin};

/// `GET /api/v1/location/{deviceId}` response payload.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub device_id: String,
    pub lat: f64,
    pub lng: f64,
    /// `LIVE` when seen over the relay this session, `PERSISTED` otherwise
    /// (including the fixed fallback coordinate).
    pub origin: Origin,
    pub captured_at: DateTime<Utc>,
}

impl From<LocationSample> for LocationResponse {
    fn from(sample: LocationSample) -> Self {
        Self {
            device_id: sample.device_id,
            lat: sample.coords.lat,
            lng: sample.coords.lng,
            origin: sample.origin,
            captured_at: sample.captured_at,
        }
    }
}
