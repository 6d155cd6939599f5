//! Locating entities on the resolved timeline.

use std::collections::HashMap;

use heart_core::models::{EntityId, RelationType};
use heart_core::NodeRef;
use heart_temporal::TimeContainer;

/// Member → position lookup over the resolved container order.
#[derive(Debug, Clone, Default)]
pub struct ContainerIndex {
    heads: Vec<EntityId>,
    positions: HashMap<EntityId, usize>,
}

impl ContainerIndex {
    pub fn new(containers: &[TimeContainer]) -> Self {
        let mut positions = HashMap::new();
        for (pos, container) in containers.iter().enumerate() {
            for id in container.members() {
                positions.entry(id).or_insert(pos);
            }
        }
        Self {
            heads: containers.iter().map(|c| c.head).collect(),
            positions,
        }
    }

    /// Position of the container holding `id`.
    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Head of the container holding `id`.
    pub fn head_of(&self, id: EntityId) -> Option<EntityId> {
        self.position(id).map(|pos| self.heads[pos])
    }

    pub fn head(&self, pos: usize) -> EntityId {
        self.heads[pos]
    }

    pub fn last(&self) -> Option<usize> {
        self.heads.len().checked_sub(1)
    }
}

/// The container positions of an entity's temporal relations.
struct Anchors {
    on: Option<Option<usize>>,
    before: Option<Option<usize>>,
    after: Option<Option<usize>>,
    start: Option<Option<usize>>,
    end: Option<Option<usize>>,
}

impl Anchors {
    /// Outer `None`: no relation of the type. Inner `None`: its first target
    /// belongs to no container.
    fn of(node: &NodeRef<'_>, index: &ContainerIndex) -> Self {
        let pos = |ty: RelationType| node.targets(ty).next().map(|t| index.position(t));
        Self {
            on: pos(RelationType::On),
            before: pos(RelationType::Before),
            after: pos(RelationType::After),
            start: pos(RelationType::Start),
            end: pos(RelationType::End),
        }
    }
}

/// Infer `[start, end]` container positions from an entity's temporal
/// relations.
///
/// `local` is the container the entity was found in, used to repair
/// relation pairs that contradict the resolved order. A relation to an
/// expression outside every container, or a contradiction that cannot be
/// repaired, yields no span.
pub fn infer_timespan(node: &NodeRef<'_>, index: &ContainerIndex, local: Option<usize>) -> Option<(usize, usize)> {
    let last = index.last()?;
    let a = Anchors::of(node, index);

    match (a.start, a.end, a.before, a.after) {
        (Some(start), Some(end), _, _) => {
            let (s, e) = (start?, end?);
            (s < e).then_some((s, e))
        }
        (Some(start), None, Some(before), _) => {
            let (s, b) = (start?, before?);
            if s < b {
                return Some((s, b));
            }
            if let Some(on) = local {
                if s < on {
                    return Some((s, on));
                }
                if on < b {
                    return Some((on, b));
                }
            }
            Some((s, last))
        }
        (None, Some(end), _, Some(after)) => {
            let (af, e) = (after?, end?);
            if af < e {
                return Some((af, e));
            }
            match local {
                Some(on) if af < on => Some((af, on)),
                Some(on) if on < e => Some((on, e)),
                Some(_) => None,
                None => Some((af, last)),
            }
        }
        (Some(start), None, None, _) => {
            let s = start?;
            match local {
                Some(on) if s < on => Some((s, on)),
                _ => Some((s, last)),
            }
        }
        (None, Some(end), _, None) => {
            let e = end?;
            match local {
                Some(on) if on < e => Some((on, e)),
                _ => Some((0, e)),
            }
        }
        (None, None, _, Some(after)) => {
            let af = after?;
            match local {
                Some(on) if af < on => Some((af, on)),
                _ => Some((af, last)),
            }
        }
        (None, None, Some(before), None) => {
            let b = before?;
            match local {
                Some(on) if on < b => Some((on, b)),
                _ => Some((0, b)),
            }
        }
        (None, None, None, None) => match (local, a.on) {
            (Some(on), Some(_)) => Some((on, on)),
            (None, Some(on)) => on.map(|p| (p, p)),
            (_, None) => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use heart_core::models::{Entity, Span, Tag};
    use heart_core::AnnotationGraph;

    use super::*;

    /// Three containers headed by 1, 2, 3 (in that order) and a disease 10.
    fn setup(rels: &[(RelationType, i64)]) -> (AnnotationGraph, ContainerIndex) {
        let mut graph = AnnotationGraph::new("");
        for id in [1, 2, 3, 4] {
            graph
                .add_entity(Entity::new(id, Tag::Timex3, Span::new(id * 10, id * 10 + 2), "t"))
                .unwrap();
        }
        graph
            .add_entity(Entity::new(10, Tag::Disease, Span::new(100, 104), "d"))
            .unwrap();
        for &(ty, target) in rels {
            graph.add_relation(ty, EntityId(10), EntityId(target)).unwrap();
        }
        let containers: Vec<TimeContainer> = [1, 2, 3]
            .into_iter()
            .map(|id| TimeContainer {
                head: EntityId(id),
                t_ents: BTreeSet::from([EntityId(id)]),
                b_ents: BTreeSet::new(),
                splittable: false,
            })
            .collect();
        (graph, ContainerIndex::new(&containers))
    }

    fn span(rels: &[(RelationType, i64)], local: Option<usize>) -> Option<(usize, usize)> {
        let (graph, index) = setup(rels);
        let node = graph.node(EntityId(10)).unwrap();
        infer_timespan(&node, &index, local)
    }

    #[test]
    fn start_and_end_in_order() {
        assert_eq!(span(&[(RelationType::Start, 1), (RelationType::End, 3)], None), Some((0, 2)));
        assert_eq!(span(&[(RelationType::Start, 3), (RelationType::End, 1)], None), None);
    }

    #[test]
    fn contradictory_start_before_falls_back_to_local() {
        let rels = [(RelationType::Start, 2), (RelationType::Before, 1)];
        assert_eq!(span(&rels, Some(2)), Some((1, 2)));
        assert_eq!(span(&rels, None), Some((1, 2)));
        assert_eq!(span(&[(RelationType::Start, 1), (RelationType::Before, 3)], None), Some((0, 2)));
    }

    #[test]
    fn single_sided_relations_default_to_timeline_ends() {
        assert_eq!(span(&[(RelationType::Start, 2)], None), Some((1, 2)));
        assert_eq!(span(&[(RelationType::End, 2)], None), Some((0, 1)));
        assert_eq!(span(&[(RelationType::After, 1)], None), Some((0, 2)));
        assert_eq!(span(&[(RelationType::Before, 3)], None), Some((0, 2)));
        assert_eq!(span(&[(RelationType::Before, 3)], Some(1)), Some((1, 2)));
    }

    #[test]
    fn on_is_a_point() {
        assert_eq!(span(&[(RelationType::On, 2)], None), Some((1, 1)));
        assert_eq!(span(&[(RelationType::On, 2)], Some(0)), Some((0, 0)));
        assert_eq!(span(&[], Some(0)), None);
    }

    #[test]
    fn relation_outside_every_container_gives_no_span() {
        assert_eq!(span(&[(RelationType::Start, 4)], None), None);
        assert_eq!(span(&[(RelationType::On, 4)], None), None);
    }

    #[test]
    fn index_reports_heads_of_members() {
        let (_, index) = setup(&[]);
        assert_eq!(index.head_of(EntityId(2)), Some(EntityId(2)));
        assert_eq!(index.head_of(EntityId(4)), None);
        assert_eq!(index.last(), Some(2));
    }
}
