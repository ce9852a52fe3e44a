use thiserror::Error;

/// Core error type shared across partsynth crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A file handed to the loader has an unrecognized type or layout.
    #[error("invalid input format: {0}")]
    InvalidInputFormat(String),
    /// No class in the class-info table lists the component.
    #[error("unknown component: {0}")]
    UnknownComponent(String),
    /// A value flagged numeric carries no parseable digit sequence.
    #[error("malformed numeric value for '{attribute}': {value:?}")]
    MalformedNumericValue { attribute: String, value: String },
    /// A pool that must hold at least one candidate is empty.
    #[error("empty pool: {0}")]
    EmptyPool(String),
    /// A table parsed but its content violates an invariant.
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by partsynth crates.
pub type Result<T> = std::result::Result<T, Error>;
