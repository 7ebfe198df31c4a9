use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aura::api::{create_router, AppState};
use aura::config::Config;
use aura::db::{Database, DatabaseBackend, LibSqlBackend};
use aura::vision::VisionProvider;

#[derive(Parser)]
#[command(name = "aura")]
#[command(about = "Assistive vision backend: device relay, location tracking, and scene description")]
struct Args {
    /// Override the listen port (takes precedence over AURA_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aura=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    if let Some(vision_config) = &config.vision {
        tracing::info!("Initializing vision collaborator: {}...", vision_config.model);
    }
    let vision = VisionProvider::new(config.vision.as_ref());
    if !vision.is_available() {
        tracing::warn!(
            "Vision collaborator unavailable - describe queries will be rejected. Set VISION_MODEL to enable."
        );
    }

    let state = AppState::new(config.clone(), db, vision);
    let app = create_router(state);

    let cancel_token = CancellationToken::new();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Aura starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  Relay socket: ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
    cancel_token.cancel();
}
