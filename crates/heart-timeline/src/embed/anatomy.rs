//! Features, changes and anatomical regions.

use heart_core::models::{RelationType, Tag};
use heart_core::{HeartResult, NodeRef};

use crate::output::{AnatomyNode, ChangeNode};

use super::Embedder;

impl<'a> Embedder<'a> {
    pub(super) fn features(&mut self, node: &NodeRef<'a>) -> Vec<String> {
        let mut texts = Vec::new();
        for id in node.sources(RelationType::Feature) {
            if let Ok(feature) = self.graph.entity(id) {
                texts.push(feature.text.clone());
                self.consume(id);
            }
        }
        texts
    }

    /// Changes of `node`, with the earliest container position any of them
    /// is compared against.
    ///
    /// A change compared against something other than a temporal expression
    /// is left out and stays unconsumed.
    pub(super) fn changes(&mut self, node: &NodeRef<'a>) -> HeartResult<(Vec<ChangeNode>, Option<usize>)> {
        let mut changes = Vec::new();
        let mut earliest: Option<usize> = None;
        for id in node.sources(RelationType::Change) {
            let change = self.graph.node(id)?;
            let compare = match change.targets(RelationType::Compare).next() {
                Some(target) => {
                    if self.graph.entity(target)?.tag != Tag::Timex3 {
                        continue;
                    }
                    if let Some(pos) = self.index.position(target) {
                        earliest = Some(earliest.map_or(pos, |e| e.min(pos)));
                    }
                    self.index.head_of(target)
                }
                None => None,
            };
            changes.push(ChangeNode {
                text: change.text().to_string(),
                compare,
            });
            self.consume(id);
        }
        Ok((changes, earliest))
    }

    pub(super) fn embed_anatomy(&mut self, node: NodeRef<'a>) -> AnatomyNode {
        self.consume(node.id());
        let feature = self.features(&node);

        let mut change = Vec::new();
        for id in node.sources(RelationType::Change) {
            if let Ok(entity) = self.graph.entity(id) {
                change.push(ChangeNode {
                    text: entity.text.clone(),
                    compare: None,
                });
                self.consume(id);
            }
        }

        let graph = self.graph;
        AnatomyNode {
            id: node.id(),
            text: node.text().to_string(),
            feature,
            change: (!change.is_empty()).then_some(change),
            contain: node
                .targets(RelationType::Region)
                .filter(|&id| graph.entity(id).is_ok_and(|e| e.tag == Tag::Anatomical))
                .collect(),
        }
    }
}
