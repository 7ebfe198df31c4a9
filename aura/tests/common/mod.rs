//! Shared harness: a real server on an ephemeral port, a temp-file
//! database, and an OpenAI-compatible mock for the vision collaborator.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aura::api::{create_router, AppState};
use aura::config::{
    Config, DatabaseConfig, LocationConfig, RelayConfig, ServerConfig, VisionConfig,
};
use aura::db::{Database, DatabaseBackend, LibSqlBackend};
use aura::vision::VisionProvider;

pub struct TestApp {
    pub addr: SocketAddr,
    pub db: Arc<dyn DatabaseBackend>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

pub fn test_config(db_url: String, vision_base_url: Option<String>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: db_url,
            auth_token: None,
            local_path: None,
        },
        relay: RelayConfig {
            channel_capacity: 32,
            max_body_bytes: 50 * 1024 * 1024,
            idle_timeout_secs: 300,
        },
        location: LocationConfig {
            fallback_lat: 13.0827,
            fallback_lng: 80.2707,
        },
        vision: vision_base_url.map(|base_url| VisionConfig {
            model: "openai/gpt-4o-mini".to_string(),
            api_key: Some("test-key".to_string()),
            base_url: Some(base_url),
            timeout_secs: 5,
            max_retries: 0,
            max_tokens: 150,
        }),
    }
}

/// Spin up the full app. `vision_base_url` should point at a wiremock
/// server when describe endpoints are under test.
pub async fn spawn_app(vision_base_url: Option<String>) -> TestApp {
    spawn_app_with(vision_base_url, |_| {}).await
}

/// Like [`spawn_app`], with a short relay idle window so disconnect
/// behavior is observable within a test run.
pub async fn spawn_app_with_idle_timeout(idle_timeout_secs: u64) -> TestApp {
    spawn_app_with(None, |config| {
        config.relay.idle_timeout_secs = idle_timeout_secs;
    })
    .await
}

async fn spawn_app_with(
    vision_base_url: Option<String>,
    adjust: impl FnOnce(&mut Config),
) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("aura_test.db");
    let db_url = format!("file:{}", db_path.to_str().unwrap());

    let mut config = test_config(db_url, vision_base_url);
    adjust(&mut config);

    let raw_db = Database::new(&config.database)
        .await
        .expect("Failed to create database");
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    let vision = VisionProvider::new(config.vision.as_ref());
    let state = AppState::new(config, db.clone(), vision);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        db,
        _temp_dir: temp_dir,
    }
}

pub fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-4o-mini",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 1,
            "completion_tokens": 1,
            "total_tokens": 2
        }
    })
}

/// Mount the standard successful describe completion on a mock server.
pub async fn mount_completion(mock_server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(mock_server)
        .await;
}
