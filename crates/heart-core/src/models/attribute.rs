//! Key/value attributes attached to entities.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Attribute names read by the timeline core.
pub mod attr {
    pub const CERTAINTY: &str = "certainty";
    pub const STATE: &str = "state";
    /// Semantic type of a temporal expression (DATE, TIME, DURATION, SET).
    pub const TIMEX_TYPE: &str = "type";
    /// Normalized value of a temporal expression.
    pub const VALUE: &str = "value";
    /// Relation of the entity to the document creation time.
    pub const DCT_REL: &str = "DCT-Rel";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub id: u32,
    pub name: String,
    pub target: EntityId,
    pub value: String,
}

impl Attribute {
    pub fn new(id: u32, name: impl Into<String>, target: EntityId, value: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            target,
            value: value.into(),
        }
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.target == other.target && self.value == other.value
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (&self.name, self.target, &self.value).hash(state);
    }
}
