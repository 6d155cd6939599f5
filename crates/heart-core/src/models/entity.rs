//! Entity types: EntityId, Span, Entity.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Tag;

/// Annotator-assigned entity identity, unique within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    /// Reserved identity of the implicit document-creation-time entity.
    pub const DCT: EntityId = EntityId(-1);

    pub fn is_sentinel(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId(value)
    }
}

/// Half-open character span `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    /// Out-of-range span carried by sentinel and synthesized entities.
    pub const SENTINEL: Span = Span { start: -2, end: -1 };

    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_sentinel(&self) -> bool {
        self.start < 0
    }
}

/// An annotated text span. Attributes and relations are owned by the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub tag: Tag,
    pub span: Span,
    pub text: String,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, tag: Tag, span: Span, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag,
            span,
            text: text.into(),
        }
    }

    /// The document-creation-time sentinel entity.
    pub fn dct() -> Self {
        Self::new(EntityId::DCT, Tag::Timex3, Span::SENTINEL, "DCT")
    }
}
