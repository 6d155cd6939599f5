//! Omission recovery configuration.

use serde::{Deserialize, Serialize};

use crate::models::Tag;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub recover_on: bool,
    pub recover_value: bool,
    /// Tags never given an inferred temporal anchor.
    pub excluded_tags: Vec<Tag>,
    /// Certainty values marking an entity as non-specific (no inferred anchor).
    pub nonspecific_certainty: Vec<String>,
    /// State values marking an entity as non-specific (no inferred anchor).
    pub nonspecific_state: Vec<String>,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            recover_on: true,
            recover_value: true,
            excluded_tags: vec![Tag::Anatomical, Tag::Feature, Tag::Pending],
            nonspecific_certainty: vec!["general".to_string()],
            nonspecific_state: vec!["other".to_string()],
        }
    }
}
