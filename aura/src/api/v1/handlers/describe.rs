//! v1 describe handler: one camera frame in, one spoken-style answer out.

use axum::extract::State;

use crate::api::v1::dto::{DescribeRequest, DescribeResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;

/// `POST /api/v1/ai/describe`
#[utoipa::path(
    post,
    path = "/api/v1/ai/describe",
    tag = "describe",
    operation_id = "describe",
    request_body = DescribeRequest,
    responses(
        (status = 200, description = "Description generated", body = DescribeResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "A query is already in flight for this device", body = ApiError),
        (status = 501, description = "No vision collaborator configured", body = ApiError),
        (status = 502, description = "Vision collaborator failed", body = ApiError),
    )
)]
pub async fn describe(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<DescribeRequest>,
) -> ApiResponse<DescribeResponse> {
    if req.device_id.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Device id cannot be empty");
    }
    if req.image_base64.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Image cannot be empty");
    }
    // Data URLs pass through untouched; only bare payloads are checked.
    if !req.image_base64.starts_with("data:")
        && base64::Engine::decode(
            &base64::engine::general_purpose::STANDARD,
            req.image_base64.as_bytes(),
        )
        .is_err()
    {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Image is not valid base64");
    }
    if !state.vision.is_available() {
        return ApiResponse::error(
            ErrorCode::NotImplemented,
            "No vision collaborator is configured (set VISION_MODEL)",
        );
    }

    match state.assist.submit_query(req.into_query()).await {
        Ok(description) => ApiResponse::success(DescribeResponse { description }),
        Err(e) => e.into(),
    }
}
