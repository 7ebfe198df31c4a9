//! Reconciliation of live GPS fixes with the durable last-known location.
//!
//! Live data always wins over stored data once observed: the GPS stream is
//! the ground truth, and the store only bridges the gap before the first
//! live fix of a session.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::db::{DatabaseBackend, LocationStore};
use crate::error::Result;
use crate::models::{Coordinates, LocationSample, PersistedLocation};

#[derive(Clone)]
pub struct LocationReconciler {
    inner: Arc<Inner>,
}

struct Inner {
    /// Most recent live sample per device, for this process lifetime only.
    live: RwLock<HashMap<String, LocationSample>>,
    store: Arc<dyn DatabaseBackend>,
    fallback: Coordinates,
}

impl LocationReconciler {
    pub fn new(store: Arc<dyn DatabaseBackend>, fallback: Coordinates) -> Self {
        Self {
            inner: Arc::new(Inner {
                live: RwLock::new(HashMap::new()),
                store,
                fallback,
            }),
        }
    }

    /// Record a live fix for a device. Invalid coordinates are dropped
    /// before any state changes. The durable upsert runs as a detached
    /// task so the caller (the relay fan-out path) is never delayed by
    /// store latency, and an upsert failure only logs.
    pub async fn observe_live(&self, device_id: &str, lat: f64, lng: f64) -> Result<LocationSample> {
        let coords = Coordinates::validated(lat, lng)?;
        let sample = LocationSample::live(device_id, coords);

        self.inner
            .live
            .write()
            .await
            .insert(device_id.to_string(), sample.clone());

        let store = self.inner.store.clone();
        let persisted = PersistedLocation {
            device_id: device_id.to_string(),
            lat: coords.lat,
            lng: coords.lng,
            updated_at: sample.captured_at,
        };
        tokio::spawn(async move {
            if let Err(error) = store.upsert_location(&persisted).await {
                tracing::warn!(
                    %error,
                    device_id = %persisted.device_id,
                    "Failed to persist live location"
                );
            }
        });

        Ok(sample)
    }

    /// The position to show for a device: the latest live sample if one
    /// arrived this session, else the persisted record, else the fixed
    /// fallback. Never an error — observers always get a coordinate.
    pub async fn resolve_display_location(&self, device_id: &str) -> LocationSample {
        if let Some(sample) = self.inner.live.read().await.get(device_id) {
            return sample.clone();
        }

        match self.inner.store.get_location(device_id).await {
            Ok(Some(persisted)) => LocationSample::persisted(
                device_id,
                Coordinates::new(persisted.lat, persisted.lng),
                persisted.updated_at,
            ),
            Ok(None) => self.fallback_sample(device_id),
            Err(error) => {
                tracing::warn!(%error, device_id, "Location store read failed, using fallback");
                self.fallback_sample(device_id)
            }
        }
    }

    fn fallback_sample(&self, device_id: &str) -> LocationSample {
        LocationSample::persisted(device_id, self.inner.fallback, chrono::Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{HistoryStore, LocationStore};
    use crate::error::AuraError;
    use crate::models::{HistoryRecord, Origin};
    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct StubStore {
        upserts: Mutex<Vec<PersistedLocation>>,
        stored: Mutex<HashMap<String, PersistedLocation>>,
        fail_reads: bool,
    }

    #[async_trait]
    impl LocationStore for StubStore {
        async fn upsert_location(&self, location: &PersistedLocation) -> Result<()> {
            self.upserts.lock().await.push(location.clone());
            self.stored
                .lock()
                .await
                .insert(location.device_id.clone(), location.clone());
            Ok(())
        }

        async fn get_location(&self, device_id: &str) -> Result<Option<PersistedLocation>> {
            if self.fail_reads {
                return Err(AuraError::Internal("store down".to_string()));
            }
            Ok(self.stored.lock().await.get(device_id).cloned())
        }
    }

    #[async_trait]
    impl HistoryStore for StubStore {
        async fn append_history(&self, _record: &HistoryRecord) -> Result<()> {
            Ok(())
        }
        async fn list_history(&self, _: &str, _: u32, _: u32) -> Result<Vec<HistoryRecord>> {
            Ok(Vec::new())
        }
        async fn count_history(&self, _: &str) -> Result<u64> {
            Ok(0)
        }
    }

    const FALLBACK: Coordinates = Coordinates {
        lat: 13.0827,
        lng: 80.2707,
    };

    async fn drain_spawned_tasks() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn unknown_device_resolves_to_fallback() {
        let reconciler = LocationReconciler::new(Arc::new(StubStore::default()), FALLBACK);
        let sample = reconciler.resolve_display_location("nobody").await;
        assert_eq!(sample.coords, FALLBACK);
        assert_eq!(sample.origin, Origin::Persisted);
    }

    #[tokio::test]
    async fn live_sample_wins_and_is_persisted() {
        let store = Arc::new(StubStore::default());
        let reconciler = LocationReconciler::new(store.clone(), FALLBACK);

        reconciler
            .observe_live("D1", 13.08, 80.27)
            .await
            .expect("valid sample");
        drain_spawned_tasks().await;

        let sample = reconciler.resolve_display_location("D1").await;
        assert_eq!(sample.origin, Origin::Live);
        assert_eq!(sample.coords, Coordinates::new(13.08, 80.27));

        let upserts = store.upserts.lock().await;
        assert_eq!(upserts.len(), 1);
        assert_eq!(upserts[0].device_id, "D1");
    }

    #[tokio::test]
    async fn latest_seen_sample_replaces_earlier_ones() {
        let reconciler = LocationReconciler::new(Arc::new(StubStore::default()), FALLBACK);

        reconciler.observe_live("D1", 1.0, 1.0).await.unwrap();
        reconciler.observe_live("D1", 2.0, 2.0).await.unwrap();

        let sample = reconciler.resolve_display_location("D1").await;
        assert_eq!(sample.coords, Coordinates::new(2.0, 2.0));
    }

    #[tokio::test]
    async fn invalid_sample_is_dropped_without_state_change() {
        let store = Arc::new(StubStore::default());
        let reconciler = LocationReconciler::new(store.clone(), FALLBACK);

        let result = reconciler.observe_live("D1", 95.0, 80.27).await;
        assert!(matches!(result, Err(AuraError::Validation(_))));
        drain_spawned_tasks().await;

        assert!(store.upserts.lock().await.is_empty());
        let sample = reconciler.resolve_display_location("D1").await;
        assert_eq!(sample.coords, FALLBACK);
    }

    #[tokio::test]
    async fn persisted_record_bridges_until_first_live_fix() {
        let store = Arc::new(StubStore::default());
        store
            .stored
            .lock()
            .await
            .insert(
                "D1".to_string(),
                PersistedLocation {
                    device_id: "D1".to_string(),
                    lat: 9.9,
                    lng: 78.1,
                    updated_at: Utc::now(),
                },
            );
        let reconciler = LocationReconciler::new(store, FALLBACK);

        let sample = reconciler.resolve_display_location("D1").await;
        assert_eq!(sample.origin, Origin::Persisted);
        assert_eq!(sample.coords, Coordinates::new(9.9, 78.1));

        reconciler.observe_live("D1", 10.0, 78.2).await.unwrap();
        let sample = reconciler.resolve_display_location("D1").await;
        assert_eq!(sample.origin, Origin::Live);
    }

    #[tokio::test]
    async fn store_read_failure_still_returns_a_coordinate() {
        let store = Arc::new(StubStore {
            fail_reads: true,
            ..Default::default()
        });
        let reconciler = LocationReconciler::new(store, FALLBACK);

        let sample = reconciler.resolve_display_location("D1").await;
        assert_eq!(sample.coords, FALLBACK);
    }
}
