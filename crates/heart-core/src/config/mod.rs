pub mod recovery_config;
pub mod temporal_config;
pub mod timeline_config;

use serde::{Deserialize, Serialize};

use crate::errors::{HeartError, HeartResult};

pub use recovery_config::RecoveryConfig;
pub use temporal_config::TemporalConfig;
pub use timeline_config::TimelineConfig;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HeartConfig {
    pub recovery: RecoveryConfig,
    pub temporal: TemporalConfig,
    pub timeline: TimelineConfig,
}

impl HeartConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> HeartResult<Self> {
        toml::from_str(toml_str).map_err(|e| HeartError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = HeartConfig::from_toml("[timeline]\ninclude_garbage = false\n").unwrap();
        assert!(!config.timeline.include_garbage);
        assert_eq!(
            config.temporal.max_fixpoint_iterations,
            TemporalConfig::default().max_fixpoint_iterations
        );
        assert!(config.recovery.recover_on);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = HeartConfig::from_toml("[temporal]\nmax_fixpoint_iterations = \"many\"\n").unwrap_err();
        assert!(matches!(err, HeartError::ConfigError(_)));
        assert!(!err.is_recoverable());
    }
}
