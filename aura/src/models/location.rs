use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuraError, Result};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Reject coordinates outside the valid WGS84 ranges. Out-of-range
    /// samples are dropped before they reach the live map or the store.
    pub fn validated(lat: f64, lng: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) || !lat.is_finite() {
            return Err(AuraError::Validation(format!(
                "Latitude {lat} out of range [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&lng) || !lng.is_finite() {
            return Err(AuraError::Validation(format!(
                "Longitude {lng} out of range [-180, 180]"
            )));
        }
        Ok(Self { lat, lng })
    }
}

/// Where a location sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Origin {
    /// Received over the relay during the current process lifetime.
    Live,
    /// Read back from the durable store (or the fixed fallback).
    Persisted,
}

/// The position reported for a device. A `Live` sample always supersedes
/// a `Persisted` one for the same device once received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSample {
    pub device_id: String,
    pub coords: Coordinates,
    pub captured_at: DateTime<Utc>,
    pub origin: Origin,
}

impl LocationSample {
    pub fn live(device_id: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            device_id: device_id.into(),
            coords,
            captured_at: Utc::now(),
            origin: Origin::Live,
        }
    }

    pub fn persisted(device_id: impl Into<String>, coords: Coordinates, at: DateTime<Utc>) -> Self {
        Self {
            device_id: device_id.into(),
            coords,
            captured_at: at,
            origin: Origin::Persisted,
        }
    }
}

/// Durable last-known location, keyed by device id. Last write wins.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedLocation {
    pub device_id: String,
    pub lat: f64,
    pub lng: f64,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_in_range_are_accepted() {
        let coords = Coordinates::validated(13.0827, 80.2707).expect("valid");
        assert_eq!(coords.lat, 13.0827);
        assert_eq!(coords.lng, 80.2707);

        assert!(Coordinates::validated(-90.0, -180.0).is_ok());
        assert!(Coordinates::validated(90.0, 180.0).is_ok());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert!(Coordinates::validated(90.1, 0.0).is_err());
        assert!(Coordinates::validated(-91.0, 0.0).is_err());
        assert!(Coordinates::validated(0.0, 180.5).is_err());
        assert!(Coordinates::validated(0.0, -181.0).is_err());
        assert!(Coordinates::validated(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn origin_serializes_uppercase() {
        assert_eq!(serde_json::to_value(Origin::Live).unwrap(), "LIVE");
        assert_eq!(serde_json::to_value(Origin::Persisted).unwrap(), "PERSISTED");
    }
}
