//! Flat, serializable form of a document.

use serde::{Deserialize, Serialize};

use crate::errors::HeartResult;

use super::{Attribute, Entity, Relation};

/// The flat entity/relation/attribute lists exchanged with the annotation
/// file collaborators, plus the companion source text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub text: String,
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl DocumentSnapshot {
    pub fn from_json(json: &str) -> HeartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> HeartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
