//! # heart-recovery
//!
//! Completes relations that annotators were allowed to omit under the
//! nearest-antecedent convention. Both passes walk entities in text order and
//! never add a relation that already exists.

pub mod anchor;
pub mod key_value;

use serde::Serialize;

use heart_core::config::RecoveryConfig;
use heart_core::{AnnotationGraph, HeartResult};

pub use anchor::recover_on;
pub use key_value::recover_value;

/// What a recovery pass synthesized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecoveryReport {
    pub relations_added: usize,
    pub attributes_set: usize,
}

impl RecoveryReport {
    pub fn merge(self, other: RecoveryReport) -> RecoveryReport {
        RecoveryReport {
            relations_added: self.relations_added + other.relations_added,
            attributes_set: self.attributes_set + other.attributes_set,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.relations_added == 0 && self.attributes_set == 0
    }
}

/// Sort the graph into text order and run the enabled passes.
///
/// A lookup failure aborts the whole recovery; already-synthesized relations
/// are not rolled back, so callers discard the document on error.
pub fn recover_all(graph: &mut AnnotationGraph, config: &RecoveryConfig) -> HeartResult<RecoveryReport> {
    graph.sort_by_span();
    let mut report = RecoveryReport::default();
    if config.recover_on {
        report = report.merge(recover_on(graph, config)?);
    }
    if config.recover_value {
        report = report.merge(recover_value(graph)?);
    }
    tracing::debug!(
        relations_added = report.relations_added,
        attributes_set = report.attributes_set,
        "omission recovery finished"
    );
    Ok(report)
}
