use thiserror::Error;

/// Unified error type for svckit.
#[derive(Error, Debug)]
pub enum SvcError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
