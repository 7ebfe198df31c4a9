//! Wire protocol for the `/ws` channel. Messages are JSON objects tagged
//! by `event` with the payload under `data`; payloads are forwarded to
//! observers byte-for-byte as received.

use serde::{Deserialize, Serialize};

use crate::models::Role;

/// Handshake payload declaring who a peer is. Sent once after connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hello {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// A single encoded camera frame. Never persisted; only the most recent
/// frame per source matters to an observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramePayload {
    pub image: String,
}

/// A GPS fix from a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// Events a peer may send to the relay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    Hello(Hello),
    SendVideoFrame(FramePayload),
    SendLocation(LocationPayload),
}

/// Events the relay fans out to every other peer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    ReceiveVideoFrame(FramePayload),
    ReceiveLocation(LocationPayload),
}
