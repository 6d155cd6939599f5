//! Time-container configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Upper bound on split/merge rounds before splittable flags are cleared.
    pub max_fixpoint_iterations: usize,
    /// Drop containers with no anchored entities and no qualitative relations.
    pub drop_isolated_containers: bool,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            max_fixpoint_iterations: 64,
            drop_isolated_containers: true,
        }
    }
}
