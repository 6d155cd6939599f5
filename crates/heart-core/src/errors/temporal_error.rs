use crate::models::EntityId;

/// Temporal subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum TemporalError {
    #[error("time container holds no temporal expression: {members:?}")]
    EmptyContainer { members: Vec<EntityId> },

    #[error("circular dependency: {detail}")]
    CircularDependency { detail: String },

    #[error("normalization of T{id} failed: {reason}")]
    NormalizationFailed { id: EntityId, reason: String },

    #[error("invalid date value: {value}")]
    InvalidDate { value: String },
}
