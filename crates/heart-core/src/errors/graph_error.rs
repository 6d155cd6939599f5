use crate::models::{EntityId, RelationType};

/// Lookup and consistency errors raised by the annotation graph.
///
/// Every variant signals corrupted input. None of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("entity not found: T{id}")]
    EntityNotFound { id: EntityId },

    #[error("non-unique entity identity T{id} ({count} matches)")]
    DuplicateEntity { id: EntityId, count: usize },

    #[error("relation {relation} refers to missing entity T{id}")]
    DanglingRelation { relation: RelationType, id: EntityId },

    #[error("attribute {attribute} refers to missing entity T{id}")]
    DanglingAttribute { attribute: String, id: EntityId },
}
