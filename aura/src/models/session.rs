use serde::{Deserialize, Serialize};

/// Declared role of a connected peer. Set by the `hello` handshake event
/// rather than inferred from which events the peer happens to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The visually-impaired user's device: originates video, location
    /// and describe queries.
    Source,
    /// A guide/monitor device: consumes broadcast events.
    Observer,
}
