use serde::{Deserialize, Serialize};

use crate::assist::SubmitQuery;
use crate::models::Coordinates;

fn default_language() -> String {
    "EN".to_string()
}

/// `POST /api/v1/describe` request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DescribeRequest {
    /// Device issuing the query. Single-flight admission is keyed on this.
    pub device_id: String,
    /// User to log the query against. History is skipped when absent.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Camera frame, bare base64 or a full data URL.
    pub image_base64: String,
    /// The spoken question. Defaults to a generic describe instruction.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Reply language hint. `"TG"` selects Tanglish, anything else English.
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl DescribeRequest {
    pub fn into_query(self) -> SubmitQuery {
        // Out-of-range pairs are dropped rather than stored: the history row
        // then carries the (0, 0) sentinel, same as a query with no fix.
        let coords = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Coordinates::validated(lat, lng).ok(),
            _ => None,
        };
        SubmitQuery {
            device_id: self.device_id,
            user_id: self.user_id,
            prompt: self.prompt.unwrap_or_default(),
            language: self.language,
            image_base64: self.image_base64,
            coords,
        }
    }
}

/// `POST /api/v1/describe` response payload.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DescribeResponse {
    /// The collaborator's spoken-style answer.
    pub description: String,
}
