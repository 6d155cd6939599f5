//! Property tests for the annotation graph: edge idempotence, adjacency
//! mirroring, and lookup failures.

use proptest::prelude::*;

use heart_core::errors::{GraphError, HeartError};
use heart_core::models::{Entity, EntityId, RelationType, Span, Tag};
use heart_core::AnnotationGraph;

const REL_TYPES: [RelationType; 6] = [
    RelationType::On,
    RelationType::Before,
    RelationType::After,
    RelationType::Value,
    RelationType::Region,
    RelationType::Change,
];

fn graph_with(n: i64) -> AnnotationGraph {
    let mut graph = AnnotationGraph::new("");
    for id in 1..=n {
        graph
            .add_entity(Entity::new(id, Tag::Disease, Span::new(id * 10, id * 10 + 5), format!("e{id}")))
            .unwrap();
    }
    graph
}

fn edge_strategy() -> impl Strategy<Value = Vec<(usize, i64, i64)>> {
    prop::collection::vec((0usize..REL_TYPES.len(), 1i64..=8, 1i64..=8), 0..60)
}

proptest! {
    #[test]
    fn prop_edge_count_equals_distinct_triples(edges in edge_strategy()) {
        let mut graph = graph_with(8);
        let mut distinct = std::collections::HashSet::new();
        for (ty, src, tgt) in &edges {
            graph.add_relation(REL_TYPES[*ty], EntityId(*src), EntityId(*tgt)).unwrap();
            distinct.insert((*ty, *src, *tgt));
        }
        prop_assert_eq!(graph.relation_count(), distinct.len());
        prop_assert_eq!(graph.relations().len(), distinct.len());
    }

    #[test]
    fn prop_adjacency_is_mirrored(edges in edge_strategy()) {
        let mut graph = graph_with(8);
        for (ty, src, tgt) in &edges {
            graph.add_relation(REL_TYPES[*ty], EntityId(*src), EntityId(*tgt)).unwrap();
        }
        for id in 1..=8 {
            let id = EntityId(id);
            for ty in REL_TYPES {
                for target in graph.targets(id, ty) {
                    prop_assert!(graph.sources(target, ty).any(|s| s == id));
                }
                for source in graph.sources(id, ty) {
                    prop_assert!(graph.targets(source, ty).any(|t| t == id));
                }
            }
        }
    }

    #[test]
    fn prop_snapshot_round_trip_preserves_edges(edges in edge_strategy()) {
        let mut graph = graph_with(8);
        for (ty, src, tgt) in &edges {
            graph.add_relation(REL_TYPES[*ty], EntityId(*src), EntityId(*tgt)).unwrap();
        }
        let rebuilt = AnnotationGraph::from_snapshot(graph.to_snapshot()).unwrap();
        prop_assert_eq!(rebuilt.relations(), graph.relations());
    }
}

#[test]
fn relation_to_unknown_entity_fails_without_side_effects() {
    let mut graph = graph_with(2);
    let err = graph
        .add_relation(RelationType::On, EntityId(1), EntityId(99))
        .unwrap_err();
    assert!(matches!(
        err,
        HeartError::GraphError(GraphError::EntityNotFound { id: EntityId(99) })
    ));
    assert_eq!(graph.relation_count(), 0);
    assert_eq!(graph.targets(EntityId(1), RelationType::On).count(), 0);
}

#[test]
fn attribute_on_unknown_entity_fails() {
    let mut graph = graph_with(1);
    assert!(graph.set_attribute(EntityId(5), "certainty", "positive").is_err());
    assert!(graph.attributes().is_empty());
}
