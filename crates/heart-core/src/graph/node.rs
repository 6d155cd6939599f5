//! Borrowed view of one entity with its attributes and adjacency.

use crate::models::{attr, Entity, EntityId, RelationType, Span, Tag, TimexType};

use super::{Adjacency, AnnotationGraph};

#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'g> {
    graph: &'g AnnotationGraph,
    entity: &'g Entity,
}

impl<'g> NodeRef<'g> {
    pub(super) fn new(graph: &'g AnnotationGraph, entity: &'g Entity) -> Self {
        Self { graph, entity }
    }

    pub fn entity(&self) -> &'g Entity {
        self.entity
    }

    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    pub fn tag(&self) -> Tag {
        self.entity.tag
    }

    pub fn span(&self) -> Span {
        self.entity.span
    }

    pub fn text(&self) -> &'g str {
        &self.entity.text
    }

    pub fn attr(&self, name: &str) -> Option<&'g str> {
        self.graph.attribute(self.entity.id, name)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&'g str, &'g str)> + 'g {
        self.graph.attribute_pairs(self.entity.id)
    }

    pub fn certainty(&self) -> Option<&'g str> {
        self.attr(attr::CERTAINTY)
    }

    pub fn state(&self) -> Option<&'g str> {
        self.attr(attr::STATE)
    }

    pub fn timex_type(&self) -> Option<TimexType> {
        self.attr(attr::TIMEX_TYPE).and_then(TimexType::from_str_name)
    }

    /// Normalized value; empty when the expression has none.
    pub fn value(&self) -> &'g str {
        self.attr(attr::VALUE).unwrap_or("")
    }

    pub fn targets(&self, rel_type: RelationType) -> impl Iterator<Item = EntityId> + 'g {
        self.graph.targets(self.entity.id, rel_type)
    }

    pub fn sources(&self, rel_type: RelationType) -> impl Iterator<Item = EntityId> + 'g {
        self.graph.sources(self.entity.id, rel_type)
    }

    pub fn has_targets(&self, rel_type: RelationType) -> bool {
        self.targets(rel_type).next().is_some()
    }

    pub fn has_sources(&self, rel_type: RelationType) -> bool {
        self.sources(rel_type).next().is_some()
    }

    pub fn outgoing(&self) -> Option<&'g Adjacency> {
        self.graph.outgoing(self.entity.id)
    }

    pub fn incoming(&self) -> Option<&'g Adjacency> {
        self.graph.incoming(self.entity.id)
    }

    /// Whether any outgoing or incoming relation is a qualitative temporal one.
    pub fn has_qualitative_relation(&self) -> bool {
        [self.outgoing(), self.incoming()]
            .into_iter()
            .flatten()
            .any(|adj| adj.iter().any(|(ty, ids)| ty.is_qualitative() && !ids.is_empty()))
    }
}
