use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aura API",
        version = "1.0.0",
        description = "Assistive vision backend: real-time relay, location reconciliation, and scene description for visually impaired users and their guides.",
    ),
    paths(
        handlers::health::health_check,
        handlers::describe::describe,
        handlers::location::get_location,
        handlers::history::list_history,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Describe
        dto::describe::DescribeRequest,
        dto::describe::DescribeResponse,
        // Location
        dto::location::LocationResponse,
        models::Origin,
        // History
        dto::history::ListHistoryQuery,
        dto::history::HistoryRecordResponse,
        dto::history::ListHistoryResponse,
        models::HistoryType,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::VisionStatus,
        handlers::health::RelayStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "describe", description = "Assistive scene description"),
        (name = "location", description = "Best-known device location"),
        (name = "history", description = "Query history, newest first"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
