use thiserror::Error;

/// Errors emitted while handing batches to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("invalid sink configuration: {0}")]
    Config(String),
}

/// Result type for sink operations.
pub type SinkResult<T> = std::result::Result<T, SinkError>;
