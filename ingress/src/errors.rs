use thiserror::Error;

/// Result type alias for ingress operations
pub type Result<T, E = IngressError> = std::result::Result<T, E>;

/// Errors that can occur while serving alert submissions
#[derive(Error, Debug)]
pub enum IngressError {
    #[error("Failed to read request body: {0}")]
    RequestBodyError(String),

    #[error("Failed to build response: {0}")]
    ResponseBuildError(String),

    #[error("Response serialization error: {0}")]
    ResponseSerializationError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] crate::config::ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
