//! Layered topological ordering over dependency maps.
//!
//! `deps[n]` lists the nodes that must come before `n`. Nodes are emitted
//! level by level (all nodes whose prerequisites are already emitted), each
//! level in ascending key order. Self-dependencies are ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hash;

use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::errors::TemporalError;

pub fn layered_toposort<N>(deps: &BTreeMap<N, BTreeSet<N>>) -> Result<Vec<N>, TemporalError>
where
    N: Copy + Ord + Hash + std::fmt::Debug,
{
    let mut graph: DiGraphMap<N, ()> = DiGraphMap::new();
    for (&node, prerequisites) in deps {
        graph.add_node(node);
        for &before in prerequisites {
            if before != node {
                graph.add_edge(before, node, ());
            }
        }
    }

    let mut pending: BTreeMap<N, usize> = graph
        .nodes()
        .map(|n| (n, graph.neighbors_directed(n, Direction::Incoming).count()))
        .collect();
    let mut order = Vec::with_capacity(pending.len());

    loop {
        let level: Vec<N> = pending
            .iter()
            .filter(|(_, &indegree)| indegree == 0)
            .map(|(&n, _)| n)
            .collect();
        if level.is_empty() {
            break;
        }
        for n in &level {
            pending.remove(n);
        }
        for &n in &level {
            for next in graph.neighbors_directed(n, Direction::Outgoing) {
                if let Some(indegree) = pending.get_mut(&next) {
                    *indegree -= 1;
                }
            }
        }
        order.extend(level);
    }

    if !pending.is_empty() {
        let stuck: Vec<N> = pending.keys().copied().collect();
        return Err(TemporalError::CircularDependency {
            detail: format!("{} nodes unresolved: {:?}", stuck.len(), stuck),
        });
    }
    Ok(order)
}
