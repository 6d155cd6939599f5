//! Timeline embedding configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub include_garbage: bool,
    pub render_html: bool,
    /// Nesting depth at which value/region embedding stops.
    pub max_embed_depth: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            include_garbage: true,
            render_html: true,
            max_embed_depth: 32,
        }
    }
}
