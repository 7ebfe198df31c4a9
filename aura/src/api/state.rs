use std::sync::Arc;
use std::time::Duration;

use crate::assist::QueryCoordinator;
use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::location::LocationReconciler;
use crate::models::Coordinates;
use crate::relay::SessionRegistry;
use crate::vision::VisionProvider;

/// Margin added on top of the collaborator's own request timeout so the
/// coordinator deadline fires only when the HTTP layer has already given up.
const DESCRIBE_TIMEOUT_MARGIN_SECS: u64 = 5;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub vision: VisionProvider,
    pub registry: Arc<SessionRegistry>,
    pub reconciler: LocationReconciler,
    pub assist: QueryCoordinator,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn DatabaseBackend>, vision: VisionProvider) -> Self {
        let config = Arc::new(config);
        let registry = Arc::new(SessionRegistry::new(config.relay.channel_capacity));
        let fallback = Coordinates::new(
            config.location.fallback_lat,
            config.location.fallback_lng,
        );
        let reconciler = LocationReconciler::new(db.clone(), fallback);

        let vision_timeout = config
            .vision
            .as_ref()
            .map(|v| v.timeout_secs)
            .unwrap_or(30);
        let assist = QueryCoordinator::new(
            Arc::new(vision.clone()),
            db.clone(),
            Duration::from_secs(vision_timeout + DESCRIBE_TIMEOUT_MARGIN_SECS),
        );

        Self {
            config,
            db,
            vision,
            registry,
            reconciler,
            assist,
        }
    }
}
