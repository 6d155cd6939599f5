//! Annotation graph: an arena of entities addressed by identity, plus an
//! edge table indexed by (type, source) and (type, target).
//!
//! The edge table and per-entity attribute maps are the only source of truth.
//! Flat relation/attribute lists are read-only projections of them.

mod dct;
mod node;
mod render;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::errors::{GraphError, HeartResult};
use crate::models::{Attribute, DocumentSnapshot, Entity, EntityId, Relation, RelationType, Tag};

pub use node::NodeRef;

/// Relation type → ordered set of partner identities.
pub type Adjacency = BTreeMap<RelationType, BTreeSet<EntityId>>;

#[derive(Debug, Clone)]
struct AttributeSlot {
    id: u32,
    value: String,
}

/// Running maximum identities used to mint new relations and attributes.
#[derive(Debug, Clone, Copy, Default)]
struct IdCounters {
    entity: i64,
    relation: u32,
    attribute: u32,
}

/// The owning aggregate of one document's entities, relations and attributes.
#[derive(Debug, Clone, Default)]
pub struct AnnotationGraph {
    text: String,
    entities: Vec<Entity>,
    positions: HashMap<EntityId, usize>,
    attributes: HashMap<EntityId, BTreeMap<String, AttributeSlot>>,
    relations: Vec<Relation>,
    outgoing: HashMap<EntityId, Adjacency>,
    incoming: HashMap<EntityId, Adjacency>,
    counters: IdCounters,
}

impl AnnotationGraph {
    /// Create an empty graph over the given source text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Build a graph from the flat lists produced by the annotation parser.
    ///
    /// Duplicate identities and dangling relation/attribute targets are
    /// rejected. Equal relations collapse into the first occurrence.
    pub fn from_snapshot(snapshot: DocumentSnapshot) -> HeartResult<Self> {
        let mut graph = Self::new(snapshot.text);

        for entity in snapshot.entities {
            graph.add_entity(entity)?;
        }

        for attribute in snapshot.attributes {
            if !graph.contains(attribute.target) {
                return Err(GraphError::DanglingAttribute {
                    attribute: attribute.name,
                    id: attribute.target,
                }
                .into());
            }
            graph.counters.attribute = graph.counters.attribute.max(attribute.id);
            graph
                .attributes
                .entry(attribute.target)
                .or_default()
                .insert(
                    attribute.name,
                    AttributeSlot {
                        id: attribute.id,
                        value: attribute.value,
                    },
                );
        }

        for relation in snapshot.relations {
            for endpoint in [relation.source, relation.target] {
                if !graph.contains(endpoint) {
                    return Err(GraphError::DanglingRelation {
                        relation: relation.rel_type,
                        id: endpoint,
                    }
                    .into());
                }
            }
            graph.counters.relation = graph.counters.relation.max(relation.id);
            graph.insert_edge(relation);
        }

        Ok(graph)
    }

    /// Project the graph back into flat lists, entities in identity order.
    pub fn to_snapshot(&self) -> DocumentSnapshot {
        let mut entities = self.entities.clone();
        entities.sort_by_key(|e| e.id);
        DocumentSnapshot {
            text: self.text.clone(),
            entities,
            relations: self.relations(),
            attributes: self.attributes(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Entities in the current view order (insertion, span, or identity).
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Identities in the current view order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    pub fn max_entity_id(&self) -> EntityId {
        EntityId(self.counters.entity)
    }

    /// Add an entity. A second entity with the same identity is corruption.
    pub fn add_entity(&mut self, entity: Entity) -> HeartResult<()> {
        if self.contains(entity.id) {
            return Err(GraphError::DuplicateEntity {
                id: entity.id,
                count: 2,
            }
            .into());
        }
        self.counters.entity = self.counters.entity.max(entity.id.0);
        self.positions.insert(entity.id, self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    /// Insert an entity at the front of the view order.
    pub(crate) fn prepend_entity(&mut self, entity: Entity) -> HeartResult<()> {
        if self.contains(entity.id) {
            return Err(GraphError::DuplicateEntity {
                id: entity.id,
                count: 2,
            }
            .into());
        }
        self.counters.entity = self.counters.entity.max(entity.id.0);
        self.entities.insert(0, entity);
        self.reindex();
        Ok(())
    }

    /// Look up an entity by identity.
    pub fn entity(&self, id: EntityId) -> HeartResult<&Entity> {
        self.positions
            .get(&id)
            .map(|&pos| &self.entities[pos])
            .ok_or_else(|| GraphError::EntityNotFound { id }.into())
    }

    /// Look up an entity together with its attributes and adjacency.
    pub fn node(&self, id: EntityId) -> HeartResult<NodeRef<'_>> {
        let entity = self.entity(id)?;
        Ok(NodeRef::new(self, entity))
    }

    /// Iterate over all entities as nodes, in view order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.entities.iter().map(move |e| NodeRef::new(self, e))
    }

    /// Entities carrying the given tag, in view order.
    pub fn ids_with_tag(&self, tag: Tag) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.tag == tag)
            .map(|e| e.id)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------------

    /// Upsert an attribute keyed by (name, target). Returns the previous value.
    pub fn set_attribute(
        &mut self,
        id: EntityId,
        name: &str,
        value: impl Into<String>,
    ) -> HeartResult<Option<String>> {
        if !self.contains(id) {
            return Err(GraphError::EntityNotFound { id }.into());
        }
        let value = value.into();
        let slots = self.attributes.entry(id).or_default();
        if let Some(slot) = slots.get_mut(name) {
            return Ok(Some(std::mem::replace(&mut slot.value, value)));
        }
        self.counters.attribute += 1;
        slots.insert(
            name.to_string(),
            AttributeSlot {
                id: self.counters.attribute,
                value,
            },
        );
        Ok(None)
    }

    pub fn attribute(&self, id: EntityId, name: &str) -> Option<&str> {
        self.attributes
            .get(&id)
            .and_then(|slots| slots.get(name))
            .map(|slot| slot.value.as_str())
    }

    pub(crate) fn attribute_pairs(&self, id: EntityId) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes
            .get(&id)
            .into_iter()
            .flat_map(|slots| slots.iter().map(|(k, s)| (k.as_str(), s.value.as_str())))
    }

    /// Flat attribute list, ordered by identity.
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attributes: Vec<Attribute> = self
            .attributes
            .iter()
            .flat_map(|(target, slots)| {
                slots.iter().map(move |(name, slot)| {
                    Attribute::new(slot.id, name.clone(), *target, slot.value.clone())
                })
            })
            .collect();
        attributes.sort_by_key(|a| a.id);
        attributes
    }

    // -----------------------------------------------------------------------
    // Relations
    // -----------------------------------------------------------------------

    /// Add a relation, installing both adjacency directions.
    ///
    /// Returns `false` without minting an identity when an equal relation
    /// (same type, source and target) already exists.
    pub fn add_relation(
        &mut self,
        rel_type: RelationType,
        source: EntityId,
        target: EntityId,
    ) -> HeartResult<bool> {
        for id in [source, target] {
            if !self.contains(id) {
                return Err(GraphError::EntityNotFound { id }.into());
            }
        }
        if self.has_edge(rel_type, source, target) {
            return Ok(false);
        }
        self.counters.relation += 1;
        let relation = Relation::new(self.counters.relation, rel_type, source, target);
        Ok(self.insert_edge(relation))
    }

    pub fn has_edge(&self, rel_type: RelationType, source: EntityId, target: EntityId) -> bool {
        self.outgoing
            .get(&source)
            .and_then(|adj| adj.get(&rel_type))
            .is_some_and(|targets| targets.contains(&target))
    }

    fn insert_edge(&mut self, relation: Relation) -> bool {
        let (rel_type, source, target) = relation.key();
        let inserted = self
            .outgoing
            .entry(source)
            .or_default()
            .entry(rel_type)
            .or_default()
            .insert(target);
        if !inserted {
            return false;
        }
        self.incoming
            .entry(target)
            .or_default()
            .entry(rel_type)
            .or_default()
            .insert(source);
        self.relations.push(relation);
        true
    }

    /// Outgoing adjacency of an entity (this entity is the source).
    pub fn outgoing(&self, id: EntityId) -> Option<&Adjacency> {
        self.outgoing.get(&id)
    }

    /// Incoming adjacency of an entity (this entity is the target).
    pub fn incoming(&self, id: EntityId) -> Option<&Adjacency> {
        self.incoming.get(&id)
    }

    /// Targets of `id`'s outgoing relations of the given type.
    pub fn targets(&self, id: EntityId, rel_type: RelationType) -> impl Iterator<Item = EntityId> + '_ {
        self.outgoing
            .get(&id)
            .and_then(|adj| adj.get(&rel_type))
            .into_iter()
            .flatten()
            .copied()
    }

    /// Sources of `id`'s incoming relations of the given type.
    pub fn sources(&self, id: EntityId, rel_type: RelationType) -> impl Iterator<Item = EntityId> + '_ {
        self.incoming
            .get(&id)
            .and_then(|adj| adj.get(&rel_type))
            .into_iter()
            .flatten()
            .copied()
    }

    /// Flat relation list, ordered by identity.
    pub fn relations(&self) -> Vec<Relation> {
        let mut relations = self.relations.clone();
        relations.sort_by_key(|r| r.id);
        relations
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    // -----------------------------------------------------------------------
    // View order
    // -----------------------------------------------------------------------

    /// Re-sort entities into text order (stable on equal span starts).
    pub fn sort_by_span(&mut self) {
        self.entities.sort_by_key(|e| e.span.start);
        self.reindex();
    }

    pub fn sort_by_id(&mut self) {
        self.entities.sort_by_key(|e| e.id);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.positions = self
            .entities
            .iter()
            .enumerate()
            .map(|(pos, e)| (e.id, pos))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HeartError;
    use crate::models::Span;

    fn sample() -> AnnotationGraph {
        let mut graph = AnnotationGraph::new("fever since yesterday");
        graph
            .add_entity(Entity::new(2, Tag::Timex3, Span::new(12, 21), "yesterday"))
            .unwrap();
        graph
            .add_entity(Entity::new(1, Tag::Disease, Span::new(0, 5), "fever"))
            .unwrap();
        graph
    }

    #[test]
    fn lookup_of_unknown_identity_fails() {
        let graph = sample();
        let err = graph.entity(EntityId(42)).unwrap_err();
        assert!(matches!(
            err,
            HeartError::GraphError(GraphError::EntityNotFound { id: EntityId(42) })
        ));
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let mut graph = sample();
        let err = graph
            .add_entity(Entity::new(1, Tag::Remedy, Span::new(0, 1), "x"))
            .unwrap_err();
        assert!(matches!(
            err,
            HeartError::GraphError(GraphError::DuplicateEntity { .. })
        ));
    }

    #[test]
    fn adding_equal_relation_twice_keeps_one_edge() {
        let mut graph = sample();
        assert!(graph.add_relation(RelationType::On, EntityId(1), EntityId(2)).unwrap());
        assert!(!graph.add_relation(RelationType::On, EntityId(1), EntityId(2)).unwrap());
        assert_eq!(graph.relation_count(), 1);
        assert_eq!(graph.relations()[0].id, 1);
    }

    #[test]
    fn both_adjacency_directions_are_installed() {
        let mut graph = sample();
        graph.add_relation(RelationType::On, EntityId(1), EntityId(2)).unwrap();
        assert_eq!(
            graph.targets(EntityId(1), RelationType::On).collect::<Vec<_>>(),
            vec![EntityId(2)]
        );
        assert_eq!(
            graph.sources(EntityId(2), RelationType::On).collect::<Vec<_>>(),
            vec![EntityId(1)]
        );
        assert_eq!(graph.targets(EntityId(2), RelationType::On).count(), 0);
    }

    #[test]
    fn attribute_write_is_an_upsert() {
        let mut graph = sample();
        assert_eq!(graph.set_attribute(EntityId(1), "certainty", "positive").unwrap(), None);
        assert_eq!(
            graph.set_attribute(EntityId(1), "certainty", "negative").unwrap(),
            Some("positive".to_string())
        );
        let attrs = graph.attributes();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value, "negative");
        assert_eq!(attrs[0].id, 1);
    }

    #[test]
    fn sort_by_span_reorders_view_and_keeps_lookup() {
        let mut graph = sample();
        graph.sort_by_span();
        assert_eq!(graph.ids(), vec![EntityId(1), EntityId(2)]);
        assert_eq!(graph.entity(EntityId(2)).unwrap().text, "yesterday");
        graph.sort_by_id();
        assert_eq!(graph.ids(), vec![EntityId(1), EntityId(2)]);
    }

    #[test]
    fn snapshot_with_dangling_relation_is_rejected() {
        let snapshot = DocumentSnapshot {
            text: String::new(),
            entities: vec![Entity::new(1, Tag::Disease, Span::new(0, 1), "a")],
            relations: vec![Relation::new(1, RelationType::On, EntityId(1), EntityId(7))],
            attributes: vec![],
        };
        let err = AnnotationGraph::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(
            err,
            HeartError::GraphError(GraphError::DanglingRelation { id: EntityId(7), .. })
        ));
    }

    #[test]
    fn minted_identities_continue_after_snapshot_maximum() {
        let snapshot = DocumentSnapshot {
            text: String::new(),
            entities: vec![
                Entity::new(1, Tag::Disease, Span::new(0, 1), "a"),
                Entity::new(2, Tag::Timex3, Span::new(2, 3), "b"),
            ],
            relations: vec![Relation::new(7, RelationType::Before, EntityId(1), EntityId(2))],
            attributes: vec![Attribute::new(4, "type", EntityId(2), "DATE")],
        };
        let mut graph = AnnotationGraph::from_snapshot(snapshot).unwrap();
        graph.add_relation(RelationType::On, EntityId(1), EntityId(2)).unwrap();
        graph.set_attribute(EntityId(1), "certainty", "positive").unwrap();

        let rel_ids: Vec<u32> = graph.relations().iter().map(|r| r.id).collect();
        assert_eq!(rel_ids, vec![7, 8]);
        let attr_ids: Vec<u32> = graph.attributes().iter().map(|a| a.id).collect();
        assert_eq!(attr_ids, vec![4, 5]);
    }
}
