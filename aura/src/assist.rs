//! Single-flight coordination of describe queries.
//!
//! Each user device runs at most one capture -> describe -> persist cycle
//! at a time: the described image and the response text must correspond
//! 1:1, and the client narrates responses sequentially. A second query
//! while one is outstanding is rejected, never queued.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::db::{DatabaseBackend, HistoryStore};
use crate::error::{AuraError, Result};
use crate::models::{Coordinates, HistoryRecord};
use crate::vision::DescribeCollaborator;

/// Content recorded when the client sends an empty prompt.
const FALLBACK_QUERY_CONTENT: &str = "Visual Query";

/// Per-device query lifecycle. `Failed` is a resting state: it admits the
/// next query just like `Idle`, so a failed call never wedges a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Capturing,
    AwaitingDescription,
    Failed,
}

impl QueryState {
    fn in_flight(self) -> bool {
        matches!(self, Self::Capturing | Self::AwaitingDescription)
    }
}

/// One describe request from a user device.
#[derive(Debug, Clone)]
pub struct SubmitQuery {
    pub device_id: String,
    pub user_id: Option<String>,
    pub prompt: String,
    pub language: String,
    pub image_base64: String,
    pub coords: Option<Coordinates>,
}

#[derive(Clone)]
pub struct QueryCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    states: Mutex<HashMap<String, QueryState>>,
    vision: Arc<dyn DescribeCollaborator>,
    store: Arc<dyn DatabaseBackend>,
    timeout: Duration,
}

impl QueryCoordinator {
    pub fn new(
        vision: Arc<dyn DescribeCollaborator>,
        store: Arc<dyn DatabaseBackend>,
        timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                states: Mutex::new(HashMap::new()),
                vision,
                store,
                timeout,
            }),
        }
    }

    pub fn state_of(&self, device_id: &str) -> QueryState {
        self.inner
            .states
            .lock()
            .expect("query state lock poisoned")
            .get(device_id)
            .copied()
            .unwrap_or(QueryState::Idle)
    }

    /// Run one capture -> describe -> persist cycle. Exactly one
    /// collaborator call per accepted query; zero or one history append.
    /// The call is bounded by the configured timeout so the device's
    /// single-flight slot always frees.
    pub async fn submit_query(&self, query: SubmitQuery) -> Result<String> {
        if query.image_base64.trim().is_empty() {
            return Err(AuraError::Validation("Image cannot be empty".to_string()));
        }

        let guard = self.begin(&query.device_id)?;
        guard.set(QueryState::AwaitingDescription);

        let described = tokio::time::timeout(
            self.inner.timeout,
            self.inner
                .vision
                .describe(&query.image_base64, &query.prompt, &query.language),
        )
        .await;

        let description = match described {
            Ok(Ok(description)) => description,
            Ok(Err(error)) => {
                guard.finish(false);
                return Err(error);
            }
            Err(_) => {
                guard.finish(false);
                return Err(AuraError::Vision(format!(
                    "Describe call timed out after {}s",
                    self.inner.timeout.as_secs()
                )));
            }
        };

        guard.finish(true);

        // Best-effort history logging: the user still gets their
        // description even if the append fails.
        if let Some(user_id) = &query.user_id {
            let content = if query.prompt.trim().is_empty() {
                FALLBACK_QUERY_CONTENT.to_string()
            } else {
                query.prompt.clone()
            };
            let location = query.coords.unwrap_or(Coordinates::new(0.0, 0.0));
            let record = HistoryRecord::voice(user_id, content, Some(location));

            if let Err(error) = self.inner.store.append_history(&record).await {
                tracing::warn!(%error, user_id, "Failed to append history record");
            }
        }

        Ok(description)
    }

    /// Claim the device's single-flight slot, or reject with the busy
    /// condition. The returned guard resolves the state to `Failed` on
    /// drop, covering cancellation of the request future mid-call.
    fn begin(&self, device_id: &str) -> Result<FlightGuard> {
        let mut states = self
            .inner
            .states
            .lock()
            .expect("query state lock poisoned");

        let current = states.get(device_id).copied().unwrap_or(QueryState::Idle);
        if current.in_flight() {
            return Err(AuraError::QueryInFlight(device_id.to_string()));
        }

        states.insert(device_id.to_string(), QueryState::Capturing);
        Ok(FlightGuard {
            inner: self.inner.clone(),
            device_id: device_id.to_string(),
            armed: true,
        })
    }
}

struct FlightGuard {
    inner: Arc<Inner>,
    device_id: String,
    armed: bool,
}

impl FlightGuard {
    fn set(&self, state: QueryState) {
        self.inner
            .states
            .lock()
            .expect("query state lock poisoned")
            .insert(self.device_id.clone(), state);
    }

    fn finish(mut self, success: bool) {
        self.set(if success {
            QueryState::Idle
        } else {
            QueryState::Failed
        });
        self.armed = false;
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if self.armed {
            self.set(QueryState::Failed);
        }
    }
}
