//! Key/value ("value") recovery.

use heart_core::models::RelationType;
use heart_core::{AnnotationGraph, HeartResult};

use crate::RecoveryReport;

/// Link each key entity to the value entity immediately following it in the
/// text when the two belong to the same family (`TestKey` → `TestVal`).
///
/// Assumes the graph is in span order.
pub fn recover_value(graph: &mut AnnotationGraph) -> HeartResult<RecoveryReport> {
    let pairs: Vec<_> = graph
        .entities()
        .windows(2)
        .filter(|w| w[0].tag.value_partner() == Some(w[1].tag))
        .map(|w| (w[0].id, w[1].id))
        .collect();

    let mut report = RecoveryReport::default();
    for (key, value) in pairs {
        if graph.add_relation(RelationType::Value, key, value)? {
            report.relations_added += 1;
        }
    }
    tracing::debug!(relations_added = report.relations_added, "recovered omitted value-relations");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use heart_core::models::{Entity, EntityId, Span, Tag};

    use super::*;

    fn doc(tags: &[Tag]) -> AnnotationGraph {
        let mut graph = AnnotationGraph::new("");
        for (i, &tag) in tags.iter().enumerate() {
            let id = i as i64 + 1;
            graph
                .add_entity(Entity::new(id, tag, Span::new(id * 10, id * 10 + 4), format!("e{id}")))
                .unwrap();
        }
        graph
    }

    #[test]
    fn adjacent_key_and_value_are_linked() {
        let mut graph = doc(&[Tag::TestKey, Tag::TestVal, Tag::MedicineKey, Tag::MedicineVal]);
        let report = recover_value(&mut graph).unwrap();
        assert_eq!(report.relations_added, 2);
        assert!(graph.has_edge(RelationType::Value, EntityId(1), EntityId(2)));
        assert!(graph.has_edge(RelationType::Value, EntityId(3), EntityId(4)));
    }

    #[test]
    fn mismatched_families_and_gaps_are_ignored() {
        let mut graph = doc(&[Tag::TestKey, Tag::MedicineVal, Tag::TestKey, Tag::Disease, Tag::TestVal]);
        let report = recover_value(&mut graph).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn existing_relation_is_not_duplicated() {
        let mut graph = doc(&[Tag::TestKey, Tag::TestVal]);
        graph.add_relation(RelationType::Value, EntityId(1), EntityId(2)).unwrap();
        let report = recover_value(&mut graph).unwrap();
        assert_eq!(report.relations_added, 0);
        assert_eq!(graph.relation_count(), 1);
    }
}
