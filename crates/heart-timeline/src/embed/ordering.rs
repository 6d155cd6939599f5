//! Region/value dependency order for a container's members.

use std::collections::{BTreeMap, BTreeSet};

use heart_core::dag::layered_toposort;
use heart_core::models::{EntityId, RelationType};
use heart_core::AnnotationGraph;

/// Order `members` so that region containers and keys come before the
/// entities they contain or qualify.
///
/// Circular region/value relations fall back to identity order.
pub fn region_value_order(graph: &AnnotationGraph, members: &BTreeSet<EntityId>) -> Vec<EntityId> {
    let deps: BTreeMap<EntityId, BTreeSet<EntityId>> = members
        .iter()
        .map(|&id| {
            let parents = graph
                .sources(id, RelationType::Region)
                .chain(graph.sources(id, RelationType::Value))
                .collect();
            (id, parents)
        })
        .collect();

    match layered_toposort(&deps) {
        Ok(order) => order.into_iter().filter(|id| members.contains(id)).collect(),
        Err(err) => {
            tracing::warn!(error = %err, "circular region/value relations, keeping identity order");
            members.iter().copied().collect()
        }
    }
}
