//! Session configuration

use std::path::PathBuf;

use googl_core::fuzzy::{EngineConfig, Metric, DEFAULT_CUTOFF};
use googl_core::knowledge::DEFAULT_PATH;

use crate::error::{Error, Result};

/// Settings for one console session
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Location of the knowledge base file
    pub knowledge_path: PathBuf,
    /// Minimum similarity for a stored question to count as a match
    pub cutoff: f64,
    /// Similarity metric used for question lookup
    pub metric: Metric,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            knowledge_path: PathBuf::from(DEFAULT_PATH),
            cutoff: DEFAULT_CUTOFF,
            metric: Metric::default(),
        }
    }
}

impl BotConfig {
    /// Reject settings the matcher cannot work with
    pub fn validate(self) -> Result<Self> {
        if !(0.0..=1.0).contains(&self.cutoff) {
            return Err(Error::Config(format!(
                "cutoff must be within [0, 1], got {}",
                self.cutoff
            )));
        }
        Ok(self)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            cutoff: self.cutoff,
            metric: self.metric,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_console_contract() {
        let config = BotConfig::default();
        assert_eq!(config.knowledge_path, PathBuf::from("knowledge_base.json"));
        assert_eq!(config.engine_config(), EngineConfig::default());
    }

    #[test]
    fn test_cutoff_out_of_range() {
        let config = BotConfig {
            cutoff: 1.5,
            ..BotConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = BotConfig {
            cutoff: f64::NAN,
            ..BotConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
