use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;
use crate::db::HistoryStore;
use crate::vision::VisionBackend;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub vision: VisionStatus,
    pub relay: RelayStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct VisionStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct RelayStatus {
    pub connected_peers: usize,
}

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let db_status = match state.db.count_history("__health__").await {
        Ok(_) => DatabaseStatus {
            status: "ok".to_string(),
        },
        Err(_) => DatabaseStatus {
            status: "error".to_string(),
        },
    };

    let vision_status = if state.vision.is_available() {
        let provider = match state.vision.backend() {
            VisionBackend::OpenAI => "openai",
            VisionBackend::OpenRouter => "openrouter",
            VisionBackend::Ollama => "ollama",
            VisionBackend::LmStudio => "lmstudio",
            VisionBackend::OpenAICompatible { .. } => "openai-compatible",
            VisionBackend::Unavailable { .. } => "unavailable",
        };
        let model = state.vision.config().map(|c| c.model.clone());
        VisionStatus {
            status: "available".to_string(),
            provider: Some(provider.to_string()),
            model,
        }
    } else {
        VisionStatus {
            status: "unavailable".to_string(),
            provider: None,
            model: None,
        }
    };

    let relay_status = RelayStatus {
        connected_peers: state.registry.connected_peers().await,
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        vision: vision_status,
        relay: relay_status,
    })
}
