//! v1 location handler.

use axum::extract::{Path, State};

use crate::api::v1::dto::LocationResponse;
use crate::api::v1::response::ApiResponse;
use crate::api::AppState;

/// `GET /api/v1/location/{deviceId}`
///
/// Always succeeds: resolution falls through live state, the durable
/// store, and finally the fixed fallback coordinate.
#[utoipa::path(
    get,
    path = "/api/v1/location/{deviceId}",
    tag = "location",
    operation_id = "location.get",
    params(("deviceId" = String, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Best-known device location", body = LocationResponse),
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> ApiResponse<LocationResponse> {
    let sample = state.reconciler.resolve_display_location(&device_id).await;
    ApiResponse::success(LocationResponse::from(sample))
}
