//! Clustering, merging and the split/merge fixpoint.

use std::collections::{BTreeSet, HashMap, VecDeque};

use heart_core::config::TemporalConfig;
use heart_core::models::{EntityId, RelationType};
use heart_core::{AnnotationGraph, HeartResult};

use crate::patterns::find_date;
use crate::table::TimexTable;

use super::draft::ContainerDraft;
use super::TimeContainer;

/// Builds the time containers of one document.
pub struct ContainerBuilder<'a> {
    pub(super) graph: &'a AnnotationGraph,
    config: &'a TemporalConfig,
}

impl<'a> ContainerBuilder<'a> {
    pub fn new(graph: &'a AnnotationGraph, config: &'a TemporalConfig) -> Self {
        Self { graph, config }
    }

    /// Cluster, merge, split until stable, then drop isolates.
    pub fn build(&self, table: &mut TimexTable) -> HeartResult<Vec<TimeContainer>> {
        let clustered = self.cluster(table)?;
        let initial = clustered.len();
        let mut containers = self.merge(clustered, table)?;

        let mut rounds = 0;
        while containers.iter().any(|c| c.splittable) {
            if rounds >= self.config.max_fixpoint_iterations {
                tracing::warn!(
                    rounds,
                    splittable = containers.iter().filter(|c| c.splittable).count(),
                    "split/merge did not converge, keeping containers as they are"
                );
                for container in &mut containers {
                    container.splittable = false;
                }
                break;
            }
            rounds += 1;
            let mut split = Vec::with_capacity(containers.len());
            for container in containers {
                split.extend(self.split(container, table)?);
            }
            containers = self.merge(split, table)?;
        }

        if self.config.drop_isolated_containers {
            containers.retain(|c| !self.is_isolate(c));
        }
        tracing::debug!(initial, rounds, containers = containers.len(), "time containers built");
        Ok(containers)
    }

    /// One container per connected component of "on" edges that contains a
    /// temporal expression.
    pub fn cluster(&self, table: &mut TimexTable) -> HeartResult<Vec<TimeContainer>> {
        let mut clustered: BTreeSet<EntityId> = BTreeSet::new();
        let mut containers = Vec::new();
        let pool: Vec<EntityId> = self
            .graph
            .entities()
            .iter()
            .filter(|e| e.tag.is_timex())
            .map(|e| e.id)
            .collect();

        for id in pool {
            if clustered.contains(&id) {
                continue;
            }
            let mut draft = ContainerDraft::default();
            self.pull(&mut draft, id, true, &BTreeSet::new(), None, table);
            clustered.extend(draft.members());
            draft.normalize(table);
            containers.push(draft.finalize(table, None)?);
        }
        Ok(containers)
    }

    /// Breadth-first pull of everything reachable over "on" edges.
    ///
    /// Incoming edges are always followed; outgoing ones only when
    /// `outgoing` is set. Identities in `excluded` are never pulled, and with
    /// a `scope` nothing outside it is.
    pub(super) fn pull(
        &self,
        draft: &mut ContainerDraft,
        start: EntityId,
        outgoing: bool,
        excluded: &BTreeSet<EntityId>,
        scope: Option<&BTreeSet<EntityId>>,
        table: &TimexTable,
    ) {
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            if draft.contains(id) || excluded.contains(&id) || scope.is_some_and(|s| !s.contains(&id)) {
                continue;
            }
            draft.add(id, self.graph, table);
            queue.extend(self.graph.sources(id, RelationType::On));
            if outgoing {
                queue.extend(self.graph.targets(id, RelationType::On));
            }
        }
    }

    /// Union containers whose heads share a date.
    ///
    /// Undated containers are never merged and come first; dated groups keep
    /// the order in which their date first appeared.
    pub fn merge(&self, containers: Vec<TimeContainer>, table: &mut TimexTable) -> HeartResult<Vec<TimeContainer>> {
        let mut undated = Vec::new();
        let mut groups: Vec<Vec<TimeContainer>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for container in containers {
            match find_date(table.value(container.head)).map(str::to_string) {
                Some(date) => {
                    let slot = *index.entry(date).or_insert_with(|| {
                        groups.push(Vec::new());
                        groups.len() - 1
                    });
                    groups[slot].push(container);
                }
                None => undated.push(container),
            }
        }

        let mut merged = undated;
        for mut group in groups {
            if group.len() == 1 {
                merged.extend(group.pop());
                continue;
            }
            let mut draft = ContainerDraft::default();
            for container in &group {
                for id in container.members() {
                    draft.add(id, self.graph, table);
                }
            }
            draft.normalize(table);
            merged.push(draft.finalize(table, None)?);
        }
        Ok(merged)
    }

    /// A container with no anchored entity whose anchors carry no
    /// qualitative relation contributes nothing to a timeline.
    pub fn is_isolate(&self, container: &TimeContainer) -> bool {
        container.b_ents.is_empty()
            && container.t_ents.iter().all(|&id| {
                !self
                    .graph
                    .node(id)
                    .is_ok_and(|node| node.has_qualitative_relation())
            })
    }
}
