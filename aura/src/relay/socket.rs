use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use uuid::Uuid;

use crate::api::AppState;
use crate::relay::events::{ClientEvent, ServerEvent};

/// `GET /ws` — upgrade to the real-time relay channel.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (id, mut outbound) = state.registry.register().await;
    tracing::info!(connection = %id, "Peer connected");

    // Millis since `started`, refreshed by traffic in either direction.
    // Observers may never send a frame; delivery to them counts as
    // activity, so a guide watching a stream is not dropped as idle.
    let started = Instant::now();
    let last_activity = Arc::new(AtomicU64::new(0));

    // Writer task: drains this peer's queue onto the socket. A send error
    // means the peer is gone; the read loop notices on its next message.
    let writer_activity = Arc::clone(&last_activity);
    let writer = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(error) => {
                    tracing::error!(%error, "Failed to encode relay event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
            writer_activity.store(started.elapsed().as_millis() as u64, Ordering::Relaxed);
        }
    });

    let idle_timeout = Duration::from_secs(state.config.relay.idle_timeout_secs);
    loop {
        let idle = Duration::from_millis(
            (started.elapsed().as_millis() as u64)
                .saturating_sub(last_activity.load(Ordering::Relaxed)),
        );
        let Some(remaining) = idle_timeout.checked_sub(idle) else {
            tracing::debug!(connection = %id, "Idle timeout, closing connection");
            break;
        };

        let message = match tokio::time::timeout(remaining, stream.next()).await {
            // The writer may have refreshed the timer while the read side
            // waited; loop back and re-check before closing.
            Err(_) => continue,
            Ok(None) | Ok(Some(Err(_))) => break,
            Ok(Some(Ok(message))) => message,
        };
        last_activity.store(started.elapsed().as_millis() as u64, Ordering::Relaxed);

        match message {
            Message::Text(text) => handle_event(&state, id, text.as_str()).await,
            Message::Close(_) => break,
            // Binary frames and ping/pong are not part of the protocol.
            _ => {}
        }
    }

    state.registry.unregister(id).await;
    writer.abort();
    tracing::info!(connection = %id, "Peer disconnected");
}

/// Events within one connection are handled in arrival order. Malformed
/// frames are dropped silently: the continuous stream supersedes any
/// single lost message.
async fn handle_event(state: &AppState, id: Uuid, text: &str) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(error) => {
            tracing::debug!(connection = %id, %error, "Dropping malformed event");
            return;
        }
    };

    match event {
        ClientEvent::Hello(hello) => {
            tracing::debug!(connection = %id, role = ?hello.role, "Peer declared role");
            state.registry.declare(id, hello).await;
        }
        ClientEvent::SendVideoFrame(frame) => {
            state
                .registry
                .broadcast_from(id, ServerEvent::ReceiveVideoFrame(frame))
                .await;
        }
        ClientEvent::SendLocation(location) => {
            // Broadcast first; the durable upsert runs as its own task and
            // must never delay fan-out.
            state
                .registry
                .broadcast_from(id, ServerEvent::ReceiveLocation(location.clone()))
                .await;

            if let Some(device_id) = location.device_id {
                let reconciler = state.reconciler.clone();
                tokio::spawn(async move {
                    if let Err(error) = reconciler
                        .observe_live(&device_id, location.lat, location.lng)
                        .await
                    {
                        tracing::debug!(%error, device_id, "Dropping invalid location sample");
                    }
                });
            }
        }
    }
}
