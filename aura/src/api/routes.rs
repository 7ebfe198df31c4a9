use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::relay::socket::ws_handler;

use super::v1;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Base64 camera frames arrive as JSON bodies, so the limit is well
    // above axum's 2 MB default.
    let body_limit = RequestBodyLimitLayer::new(state.config.relay.max_body_bytes);

    let v1 = v1::router::v1_router();

    Router::new()
        .nest("/api/v1", v1)
        .route("/ws", get(ws_handler))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
