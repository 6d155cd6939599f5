//! Serializable timeline document.

use std::collections::BTreeMap;

use serde::Serialize;

use heart_core::models::{EntityId, RelationType, Tag};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineDocument {
    pub entities: Vec<EmbeddedEntity>,
    pub times: Vec<TimeEntry>,
    pub anatomy: Vec<AnatomyNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garbage: Option<Vec<GarbageEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl TimelineDocument {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One resolved time container, keyed by its head expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntry {
    pub id: EntityId,
    pub text: String,
    /// Head value when it starts with a calendar date, else empty.
    pub value: String,
    #[serde(rename = "type")]
    pub timex_type: String,
}

/// `[start, end]` as head identities of time containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timespan(pub EntityId, pub EntityId);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddedEntity {
    pub id: EntityId,
    pub tag: Tag,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certainty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anatomy: Option<EntityId>,
    pub time: Option<Timespan>,
    pub feature: Vec<String>,
    pub change: Vec<ChangeNode>,
    pub region: BTreeMap<String, Vec<RegionNode>>,
    pub value: Vec<EmbeddedEntity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeNode {
    pub text: String,
    /// Head of the time container the change is compared against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegionNode {
    Entity(EmbeddedEntity),
    Anatomy(AnatomyNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnatomyNode {
    pub id: EntityId,
    pub text: String,
    pub feature: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<Vec<ChangeNode>>,
    /// Anatomical sub-regions.
    pub contain: Vec<EntityId>,
}

/// An entity that could not be placed, with its raw adjacency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GarbageEntry {
    pub id: EntityId,
    pub tag: Tag,
    pub text: String,
    pub rels_to: BTreeMap<RelationType, Vec<RelatedEntity>>,
    pub rels_from: BTreeMap<RelationType, Vec<RelatedEntity>>,
}

/// `[id, tag, text]` of a related entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedEntity(pub EntityId, pub Tag, pub String);
