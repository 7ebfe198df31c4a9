use thiserror::Error;

// HTTP mapping lives in `api::v1::response`: handlers return `ApiResponse`
// and convert through `From<AuraError>`, which keeps internal detail out of
// client-facing messages.

#[derive(Error, Debug)]
pub enum AuraError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Vision error: {0}")]
    Vision(String),

    #[error("Vision unavailable: {0}")]
    VisionUnavailable(String),

    #[error("Vision rate limit exceeded, retry after {retry_after:?} seconds")]
    VisionRateLimit { retry_after: Option<u64> },

    #[error("A describe query is already in flight for device {0}")]
    QueryInFlight(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuraError>;
