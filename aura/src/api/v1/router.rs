use axum::routing::{get, post};
use axum::Router;

use crate::api::state::AppState;

use super::handlers;

pub fn v1_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ai/describe", post(handlers::describe::describe))
        .route("/location/{deviceId}", get(handlers::location::get_location))
        .route("/history/{userId}", get(handlers::history::list_history))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
}
