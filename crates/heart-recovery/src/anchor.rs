//! Temporal-anchor ("on") recovery.

use heart_core::config::RecoveryConfig;
use heart_core::models::{attr, EntityId, RelationType};
use heart_core::{AnnotationGraph, HeartResult, NodeRef};

use crate::RecoveryReport;

/// Relation types that already place an entity in time.
const TIME_RELATIONS: [RelationType; 4] = [
    RelationType::Before,
    RelationType::After,
    RelationType::Start,
    RelationType::End,
];

/// The running "current time" while scanning the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnchorScope {
    Unknown,
    Dct,
    Timex(EntityId),
}

/// Anchor every unanchored, time-specific entity to the most recent
/// explicit anchor that precedes it in the text.
///
/// Assumes the graph is in span order.
pub fn recover_on(graph: &mut AnnotationGraph, config: &RecoveryConfig) -> HeartResult<RecoveryReport> {
    let mut report = RecoveryReport::default();
    let mut scope = AnchorScope::Unknown;

    for id in graph.ids() {
        let node = graph.node(id)?;
        if node.tag().is_timex() {
            continue;
        }
        let dct_rel = node.attr(attr::DCT_REL);

        if dct_rel == Some(RelationType::On.as_str()) {
            scope = AnchorScope::Dct;
            continue;
        }
        if node.has_targets(RelationType::On) {
            scope = earliest_anchor(graph, &node)?;
            continue;
        }
        if scope == AnchorScope::Unknown || !is_anchorable(&node, dct_rel.is_some(), config) {
            continue;
        }

        match scope {
            AnchorScope::Dct => {
                let previous = graph.set_attribute(id, attr::DCT_REL, RelationType::On.as_str())?;
                if previous.is_none() {
                    report.attributes_set += 1;
                }
            }
            AnchorScope::Timex(target) => {
                if graph.add_relation(RelationType::On, id, target)? {
                    report.relations_added += 1;
                }
            }
            AnchorScope::Unknown => {}
        }
    }

    tracing::debug!(
        relations_added = report.relations_added,
        attributes_set = report.attributes_set,
        "recovered omitted on-relations"
    );
    Ok(report)
}

/// The anchor target occurring first in the text (span start, then identity).
fn earliest_anchor(graph: &AnnotationGraph, node: &NodeRef<'_>) -> HeartResult<AnchorScope> {
    let mut best: Option<(i64, EntityId)> = None;
    for target in node.targets(RelationType::On) {
        let key = (graph.entity(target)?.span.start, target);
        if best.map_or(true, |b| key < b) {
            best = Some(key);
        }
    }
    Ok(match best {
        Some((_, id)) if id.is_sentinel() => AnchorScope::Dct,
        Some((_, id)) => AnchorScope::Timex(id),
        None => AnchorScope::Unknown,
    })
}

fn is_anchorable(node: &NodeRef<'_>, has_dct_rel: bool, config: &RecoveryConfig) -> bool {
    if has_dct_rel || config.excluded_tags.contains(&node.tag()) {
        return false;
    }
    if TIME_RELATIONS.iter().any(|&ty| node.has_targets(ty)) {
        return false;
    }
    let nonspecific_certainty = node
        .certainty()
        .is_some_and(|c| config.nonspecific_certainty.iter().any(|n| n == c));
    let nonspecific_state = node
        .state()
        .is_some_and(|s| config.nonspecific_state.iter().any(|n| n == s));
    !(nonspecific_certainty || nonspecific_state)
}
