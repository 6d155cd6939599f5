use super::{GraphError, TemporalError};

/// Top-level error type for timeline reconstruction.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum HeartError {
    #[error("graph error: {0}")]
    GraphError(#[from] GraphError),

    #[error("temporal error: {0}")]
    TemporalError(#[from] TemporalError),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl HeartError {
    /// Only a circular qualitative-relation graph can be degraded around.
    /// Everything else aborts processing of the document.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HeartError::TemporalError(TemporalError::CircularDependency { .. })
        )
    }
}

/// Convenience type alias.
pub type HeartResult<T> = Result<T, HeartError>;
