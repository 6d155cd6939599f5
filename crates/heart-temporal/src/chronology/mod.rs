//! Chronological ordering of time containers.
//!
//! Dated containers compare by calendar date. Undated ("relative") ones are
//! placed by the before/after/start/end relations between members, resolved
//! together with the dated chain by a layered topological sort.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use heart_core::dag::layered_toposort;
use heart_core::models::RelationType;
use heart_core::AnnotationGraph;

use crate::containers::TimeContainer;
use crate::patterns::calendar_date;
use crate::table::TimexTable;

/// Ordered containers. `degraded` is set when qualitative relations were
/// circular and only the date order could be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub containers: Vec<TimeContainer>,
    pub degraded: bool,
}

/// Position of a container in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Slot {
    Absolute(usize),
    Relative(usize),
}

pub struct ChronologicalResolver<'a> {
    graph: &'a AnnotationGraph,
    table: &'a TimexTable,
}

impl<'a> ChronologicalResolver<'a> {
    pub fn new(graph: &'a AnnotationGraph, table: &'a TimexTable) -> Self {
        Self { graph, table }
    }

    pub fn resolve(&self, containers: Vec<TimeContainer>) -> Resolution {
        let sorted = self.sort_by_date(containers);

        let (absolute, relative): (Vec<TimeContainer>, Vec<TimeContainer>) = sorted
            .iter()
            .cloned()
            .partition(|c| !self.table.value(c.head).is_empty());
        let deps = self.dependencies(&absolute, &relative);

        match layered_toposort(&deps) {
            Ok(order) => {
                let containers = order
                    .into_iter()
                    .map(|slot| match slot {
                        Slot::Absolute(i) => absolute[i].clone(),
                        Slot::Relative(i) => relative[i].clone(),
                    })
                    .collect();
                Resolution {
                    containers,
                    degraded: false,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "circular time relations, keeping date order");
                Resolution {
                    containers: sorted,
                    degraded: true,
                }
            }
        }
    }

    /// Stable insertion sort driven only by [`Self::precedes`]. The
    /// comparator is not a total order, so no sort relying on one is used.
    pub fn sort_by_date(&self, mut containers: Vec<TimeContainer>) -> Vec<TimeContainer> {
        for i in 1..containers.len() {
            let mut j = i;
            while j > 0 && self.precedes(&containers[j], &containers[j - 1]) {
                containers.swap(j, j - 1);
                j -= 1;
            }
        }
        containers
    }

    /// Whether `a` comes strictly before `b`.
    ///
    /// Two dated heads compare by date. Otherwise the first qualitative
    /// relation found between the members decides, and unrelated containers
    /// do not precede each other.
    pub fn precedes(&self, a: &TimeContainer, b: &TimeContainer) -> bool {
        let dates = (
            calendar_date(self.table.value(a.head)),
            calendar_date(self.table.value(b.head)),
        );
        if let (Some(da), Some(db)) = dates {
            return da < db;
        }
        match self.first_relation(a, b) {
            Some(RelationType::Before | RelationType::End) => return true,
            Some(RelationType::After | RelationType::Start) => return false,
            _ => {}
        }
        match self.first_relation(b, a) {
            Some(RelationType::Before | RelationType::End) => false,
            Some(RelationType::After | RelationType::Start) => true,
            _ => false,
        }
    }

    /// Whether relations say `a` happened after `b`.
    pub fn rel_after(&self, a: &TimeContainer, b: &TimeContainer) -> bool {
        self.has_relation(a, b, &[RelationType::After, RelationType::Start])
            || self.has_relation(b, a, &[RelationType::Before, RelationType::End])
    }

    /// The first qualitative relation type from `from`'s anchors into `to`'s.
    fn first_relation(&self, from: &TimeContainer, to: &TimeContainer) -> Option<RelationType> {
        from.t_ents.iter().find_map(|&id| {
            self.graph.outgoing(id).and_then(|adjacency| {
                adjacency
                    .iter()
                    .find(|(ty, targets)| ty.is_qualitative() && !targets.is_disjoint(&to.t_ents))
                    .map(|(&ty, _)| ty)
            })
        })
    }

    fn has_relation(&self, from: &TimeContainer, to: &TimeContainer, types: &[RelationType]) -> bool {
        from.t_ents.iter().any(|&id| {
            types.iter().any(|&ty| {
                self.graph
                    .targets(id, ty)
                    .any(|target| to.t_ents.contains(&target))
            })
        })
    }

    /// `deps[n]` lists the slots that must precede `n`: dated containers
    /// chained by date, and every container after whatever it is related
    /// to as happening earlier.
    fn dependencies(
        &self,
        absolute: &[TimeContainer],
        relative: &[TimeContainer],
    ) -> BTreeMap<Slot, BTreeSet<Slot>> {
        let mut deps: BTreeMap<Slot, BTreeSet<Slot>> = BTreeMap::new();

        for (i, abs) in absolute.iter().enumerate() {
            let entry = deps.entry(Slot::Absolute(i)).or_default();
            if i > 0 {
                entry.insert(Slot::Absolute(i - 1));
            }
            for (k, rel) in relative.iter().enumerate() {
                if self.rel_after(abs, rel) {
                    entry.insert(Slot::Relative(k));
                }
            }
        }

        for (i, rel) in relative.iter().enumerate() {
            let entry = deps.entry(Slot::Relative(i)).or_default();
            for (j, other) in relative.iter().enumerate() {
                if i != j && self.rel_after(rel, other) {
                    entry.insert(Slot::Relative(j));
                }
            }
            for (j, abs) in absolute.iter().enumerate() {
                if self.rel_after(rel, abs) {
                    entry.insert(Slot::Absolute(j));
                }
            }
        }
        deps
    }
}

#[cfg(test)]
mod tests {
    use heart_core::models::{attr, Entity, EntityId, Span, Tag};

    use super::*;

    fn graph(timexes: &[(i64, &str)], rels: &[(RelationType, i64, i64)]) -> AnnotationGraph {
        let mut graph = AnnotationGraph::new("");
        for (i, &(id, value)) in timexes.iter().enumerate() {
            let start = i as i64 * 10;
            graph
                .add_entity(Entity::new(id, Tag::Timex3, Span::new(start, start + 4), format!("t{id}")))
                .unwrap();
            graph.set_attribute(EntityId(id), attr::TIMEX_TYPE, "DATE").unwrap();
            graph.set_attribute(EntityId(id), attr::VALUE, value).unwrap();
        }
        for &(ty, s, t) in rels {
            graph.add_relation(ty, EntityId(s), EntityId(t)).unwrap();
        }
        graph
    }

    fn tc(id: i64) -> TimeContainer {
        TimeContainer {
            head: EntityId(id),
            t_ents: BTreeSet::from([EntityId(id)]),
            b_ents: BTreeSet::new(),
            splittable: false,
        }
    }

    fn heads(resolution: &Resolution) -> Vec<i64> {
        resolution.containers.iter().map(|c| c.head.0).collect()
    }

    #[test]
    fn dated_containers_sort_by_date() {
        let g = graph(&[(1, "2015-01-01"), (2, "2014-06-01"), (3, "2014-06-01T10:00")], &[]);
        let table = TimexTable::from_graph(&g);
        let resolver = ChronologicalResolver::new(&g, &table);

        let resolution = resolver.resolve(vec![tc(1), tc(2), tc(3)]);

        assert_eq!(heads(&resolution), vec![2, 3, 1]);
        assert!(!resolution.degraded);
    }

    #[test]
    fn relative_container_is_placed_by_relations() {
        let g = graph(
            &[(1, "2014-01-01"), (2, "2014-03-01"), (3, "")],
            &[(RelationType::After, 3, 1), (RelationType::Before, 3, 2)],
        );
        let table = TimexTable::from_graph(&g);
        let resolver = ChronologicalResolver::new(&g, &table);

        let resolution = resolver.resolve(vec![tc(3), tc(2), tc(1)]);

        assert_eq!(heads(&resolution), vec![1, 3, 2]);
    }

    #[test]
    fn relative_before_dated_comes_first() {
        let g = graph(&[(1, "2014-01-01"), (2, "")], &[(RelationType::Before, 2, 1)]);
        let table = TimexTable::from_graph(&g);
        let resolver = ChronologicalResolver::new(&g, &table);

        assert!(resolver.precedes(&tc(2), &tc(1)));
        assert!(!resolver.precedes(&tc(1), &tc(2)));
        assert_eq!(heads(&resolver.resolve(vec![tc(1), tc(2)])), vec![2, 1]);
    }

    #[test]
    fn circular_relations_degrade_without_panicking() {
        let g = graph(
            &[(1, ""), (2, "")],
            &[(RelationType::Before, 1, 2), (RelationType::Before, 2, 1)],
        );
        let table = TimexTable::from_graph(&g);
        let resolver = ChronologicalResolver::new(&g, &table);

        let resolution = resolver.resolve(vec![tc(1), tc(2)]);

        assert!(resolution.degraded);
        assert_eq!(resolution.containers.len(), 2);
    }

    #[test]
    fn unrelated_undated_containers_keep_their_order() {
        let g = graph(&[(1, ""), (2, ""), (3, "")], &[]);
        let table = TimexTable::from_graph(&g);
        let resolver = ChronologicalResolver::new(&g, &table);

        assert_eq!(heads(&resolver.resolve(vec![tc(2), tc(3), tc(1)])), vec![2, 3, 1]);
    }
}
