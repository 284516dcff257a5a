use thiserror::Error;

/// Errors surfaced to callers. Path lookups never fail; misses are `None`.
#[derive(Debug, Error)]
pub enum ReqcapError {
    /// An `--assert` expression without `=` or `!=`.
    #[error("invalid assert expression (no = or !=): {0}")]
    InvalidExpression(String),

    #[error("snapshot '{0}' not found")]
    SnapshotNotFound(String),

    #[error("snapshot '{name}' could not be decoded: {source}")]
    InvalidSnapshot {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

// Type alias for results that use `ReqcapError` as the error type
pub type Result<T> = std::result::Result<T, ReqcapError>;
