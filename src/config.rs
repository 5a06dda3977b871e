//! Engine configuration

use crate::error::{Error, Result};
use crate::scoring::DEFAULT_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Optional relevance gate in front of extraction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoringConfig {
    pub enabled: bool,
    /// Minimum score to pass; equal passes
    pub threshold: i32,
    /// Leading body characters fed to the scorer
    pub body_chars: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: DEFAULT_THRESHOLD,
            body_chars: 5000,
        }
    }
}

/// Settings for a scan.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    /// Skip messages that match no sender/subject profile
    pub require_source_match: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            require_source_match: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Config)
    }

    /// Enable the scoring gate at `threshold`
    #[must_use]
    pub const fn with_scoring(mut self, threshold: i32) -> Self {
        self.scoring.enabled = true;
        self.scoring.threshold = threshold;
        self
    }
}
