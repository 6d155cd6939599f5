//! Unplaced entities with their raw adjacency.

use std::collections::BTreeMap;

use heart_core::graph::Adjacency;
use heart_core::models::RelationType;
use heart_core::{AnnotationGraph, HeartResult, NodeRef};

use crate::output::{GarbageEntry, RelatedEntity};

pub fn garbage_entry(graph: &AnnotationGraph, node: &NodeRef<'_>) -> HeartResult<GarbageEntry> {
    Ok(GarbageEntry {
        id: node.id(),
        tag: node.tag(),
        text: node.text().to_string(),
        rels_to: related(graph, node.outgoing())?,
        rels_from: related(graph, node.incoming())?,
    })
}

fn related(
    graph: &AnnotationGraph,
    adjacency: Option<&Adjacency>,
) -> HeartResult<BTreeMap<RelationType, Vec<RelatedEntity>>> {
    let mut out = BTreeMap::new();
    for (&ty, ids) in adjacency.into_iter().flatten() {
        if ids.is_empty() {
            continue;
        }
        let entries = ids
            .iter()
            .map(|&id| {
                graph
                    .entity(id)
                    .map(|e| RelatedEntity(e.id, e.tag, e.text.clone()))
            })
            .collect::<HeartResult<Vec<_>>>()?;
        out.insert(ty, entries);
    }
    Ok(out)
}
