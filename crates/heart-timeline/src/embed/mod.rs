//! Embedding of document entities under the resolved timeline.
//!
//! Every embed is recorded in a consumption ledger. Entities reached through
//! more than one path are pruned from the top level afterwards, so region and
//! value nesting wins over flat placement.

mod anatomy;
pub mod garbage;
pub mod ordering;
pub mod timespan;

use std::collections::{BTreeMap, HashMap};

use heart_core::config::TimelineConfig;
use heart_core::models::{EntityId, RelationType, Tag};
use heart_core::{AnnotationGraph, HeartResult, NodeRef};
use heart_temporal::patterns::starts_with_date;
use heart_temporal::{TimeContainer, TimexTable};

use crate::output::{EmbeddedEntity, GarbageEntry, RegionNode, TimeEntry, TimelineDocument, Timespan};

pub use timespan::{infer_timespan, ContainerIndex};

pub struct Embedder<'a> {
    graph: &'a AnnotationGraph,
    table: &'a TimexTable,
    containers: &'a [TimeContainer],
    config: &'a TimelineConfig,
    index: ContainerIndex,
    ledger: HashMap<EntityId, usize>,
    path: Vec<EntityId>,
}

impl<'a> Embedder<'a> {
    pub fn new(
        graph: &'a AnnotationGraph,
        table: &'a TimexTable,
        containers: &'a [TimeContainer],
        config: &'a TimelineConfig,
    ) -> Self {
        Self {
            graph,
            table,
            containers,
            config,
            index: ContainerIndex::new(containers),
            ledger: HashMap::new(),
            path: Vec::new(),
        }
    }

    pub fn embed(mut self) -> HeartResult<TimelineDocument> {
        let (graph, containers) = (self.graph, self.containers);
        let times = self.times();
        let mut entities = Vec::new();

        for (pos, container) in containers.iter().enumerate() {
            for &id in &container.t_ents {
                self.consume(id);
            }
            for id in ordering::region_value_order(graph, &container.b_ents) {
                if self.is_consumed(id) {
                    continue;
                }
                let node = graph.node(id)?;
                if matches!(node.tag(), Tag::Change | Tag::Feature) {
                    continue;
                }
                entities.push(self.embed_entity(node, Some(pos), None)?);
            }
        }

        let mut anatomy = Vec::new();
        for node in graph.nodes().filter(|n| n.tag() == Tag::Anatomical) {
            if !self.is_consumed(node.id()) {
                anatomy.push(self.embed_anatomy(node));
            }
        }

        let mut garbage: Vec<GarbageEntry> = Vec::new();
        for node in graph.nodes() {
            if self.is_consumed(node.id()) {
                continue;
            }
            let placed = !matches!(node.tag(), Tag::Change | Tag::Feature)
                && infer_timespan(&node, &self.index, None).is_some();
            if placed {
                entities.push(self.embed_entity(node, None, None)?);
            } else {
                garbage.push(garbage::garbage_entry(graph, &node)?);
            }
        }
        entities.retain(|e| self.times_consumed(e.id) <= 1);
        garbage.retain(|g| !self.is_consumed(g.id));

        tracing::debug!(
            times = times.len(),
            entities = entities.len(),
            anatomy = anatomy.len(),
            garbage = garbage.len(),
            "timeline embedded"
        );
        Ok(TimelineDocument {
            entities,
            times,
            anatomy,
            garbage: self.config.include_garbage.then_some(garbage),
            html: self.config.render_html.then(|| graph.render_html()),
        })
    }

    fn times(&self) -> Vec<TimeEntry> {
        self.containers
            .iter()
            .map(|c| {
                let value = self.table.value(c.head);
                TimeEntry {
                    id: c.head,
                    text: self.table.get(c.head).map(|r| r.text.clone()).unwrap_or_default(),
                    value: if starts_with_date(value) { value.to_string() } else { String::new() },
                    timex_type: self
                        .table
                        .timex_type(c.head)
                        .map(|t| t.as_str().to_string())
                        .unwrap_or_default(),
                }
            })
            .collect()
    }

    fn consume(&mut self, id: EntityId) {
        *self.ledger.entry(id).or_default() += 1;
    }

    fn is_consumed(&self, id: EntityId) -> bool {
        self.ledger.contains_key(&id)
    }

    fn times_consumed(&self, id: EntityId) -> usize {
        self.ledger.get(&id).copied().unwrap_or(0)
    }

    /// Embed `node` with its features, changes, values and regions.
    ///
    /// `local` is the position of the container the entity was found in;
    /// `anatomy` is the region parent's anatomy handed down the tree.
    fn embed_entity(
        &mut self,
        node: NodeRef<'a>,
        local: Option<usize>,
        anatomy: Option<EntityId>,
    ) -> HeartResult<EmbeddedEntity> {
        let graph = self.graph;
        self.consume(node.id());
        self.path.push(node.id());

        let (certainty, state) = match node.certainty() {
            Some(c) => (Some(c.to_string()), None),
            None => (None, node.state().map(str::to_string)),
        };
        let anatomy = anatomy.or_else(|| {
            node.sources(RelationType::Region)
                .filter(|&id| graph.entity(id).is_ok_and(|e| e.tag == Tag::Anatomical))
                .last()
        });

        let mut time = infer_timespan(&node, &self.index, local);
        let feature = self.features(&node);
        let (change, compared) = self.changes(&node)?;
        if let (Some(span), Some(earliest)) = (time.as_mut(), compared) {
            span.0 = earliest;
        }

        let mut value = Vec::new();
        let mut region: BTreeMap<String, Vec<RegionNode>> = BTreeMap::new();
        if self.path.len() <= self.config.max_embed_depth {
            for target in node.targets(RelationType::Value) {
                if !self.path.contains(&target) {
                    value.push(self.embed_entity(graph.node(target)?, local, None)?);
                }
            }
            for target in node.targets(RelationType::Region) {
                if self.path.contains(&target) {
                    continue;
                }
                let reg = graph.node(target)?;
                if reg.has_targets(RelationType::Region) {
                    let mut contained = Vec::new();
                    for inner in reg.targets(RelationType::Region) {
                        if !self.path.contains(&inner) {
                            contained.push(RegionNode::Entity(self.embed_entity(graph.node(inner)?, None, anatomy)?));
                        }
                    }
                    self.consume(reg.id());
                    region.insert(reg.text().to_string(), contained);
                } else if reg.tag() == Tag::Disease {
                    let nested = self.embed_entity(reg, None, anatomy)?;
                    region.insert(reg.text().to_string(), vec![RegionNode::Entity(nested)]);
                } else if reg.tag() == Tag::Anatomical {
                    let nested = self.embed_anatomy(reg);
                    region.insert(reg.text().to_string(), vec![RegionNode::Anatomy(nested)]);
                }
            }
        } else if node.has_targets(RelationType::Value) || node.has_targets(RelationType::Region) {
            tracing::warn!(entity = %node.id(), depth = self.path.len(), "embedding depth cap reached");
        }

        self.path.pop();
        Ok(EmbeddedEntity {
            id: node.id(),
            tag: node.tag(),
            text: node.text().to_string(),
            certainty,
            state,
            anatomy,
            time: time.map(|(start, end)| Timespan(self.index.head(start), self.index.head(end))),
            feature,
            change,
            region,
            value,
        })
    }
}
